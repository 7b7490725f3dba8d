//! Generic attribute metadata and dispatch.
//!
//! Each object type publishes a schema: a static table of [`AttrEntry`]
//! describing attribute id, value type, create/set/get flags and the
//! getter/setter callbacks that implement it. The functions here validate
//! caller attribute lists against that table and dispatch to the callbacks,
//! so object implementations only supply the callbacks themselves.
//!
//! # Example
//!
//! ```
//! use sonic_sai::attr::{self, AttrEntry, AttrFlags, AttrValue, AttrValueType, Attribute, CommonApi};
//! use sonic_sai::{RawSaiObjectId, SaiResult};
//!
//! struct Ctx;
//!
//! fn answer_get(_: &Ctx, _: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
//!     *value = AttrValue::S32(42);
//!     Ok(())
//! }
//!
//! static SCHEMA: [AttrEntry<Ctx>; 1] = [AttrEntry {
//!     id: 0,
//!     name: "ANSWER",
//!     value_type: AttrValueType::S32,
//!     flags: AttrFlags::READ_ONLY,
//!     getter: Some(answer_get),
//!     setter: None,
//! }];
//!
//! let mut attrs = [Attribute::new(0, AttrValue::S32(0))];
//! attr::get_attributes(&Ctx, 1, "obj", &SCHEMA, &mut attrs).unwrap();
//! assert_eq!(attrs[0].value, AttrValue::S32(42));
//! ```

use crate::error::{SaiError, SaiResult, SaiStatus};
use crate::types::RawSaiObjectId;
use log::{debug, error};
use std::fmt::{self, Write};

/// Attribute identifier within one object type.
pub type AttrId = u32;

/// Value type declared in a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrValueType {
    S32,
    ObjectId,
    ObjectList,
    VlanList,
}

impl fmt::Display for AttrValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttrValueType::S32 => "s32",
            AttrValueType::ObjectId => "oid",
            AttrValueType::ObjectList => "objlist",
            AttrValueType::VlanList => "vlanlist",
        };
        write!(f, "{}", s)
    }
}

/// Caller-owned list with a fixed capacity.
///
/// Getters fill it through [`AttrList::fill`]; a result larger than the
/// capacity fails with `BufferOverflow` and leaves the list untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttrList<T> {
    capacity: u32,
    items: Vec<T>,
}

impl<T: Clone> AttrList<T> {
    /// Creates an empty list able to receive `capacity` entries.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Creates a list holding `items`, with capacity equal to its length.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            capacity: u32::try_from(items.len()).unwrap_or(u32::MAX),
            items,
        }
    }

    /// Number of entries the caller can receive.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Entries currently held.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fails with `BufferOverflow` unless `required` entries fit.
    pub fn ensure_capacity(&self, required: usize) -> SaiResult<()> {
        if required > self.capacity as usize {
            return Err(SaiError::BufferOverflow {
                required: u32::try_from(required).unwrap_or(u32::MAX),
            });
        }
        Ok(())
    }

    /// Replaces the content with `src` if it fits.
    pub fn fill(&mut self, src: &[T]) -> SaiResult<()> {
        self.ensure_capacity(src.len())?;
        self.items.clear();
        self.items.extend_from_slice(src);
        Ok(())
    }
}

/// Attribute value (`sai_attribute_value_t`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    S32(i32),
    ObjectId(RawSaiObjectId),
    ObjectList(AttrList<RawSaiObjectId>),
    VlanList(AttrList<u16>),
}

impl AttrValue {
    /// Returns the value type of this value.
    pub fn value_type(&self) -> AttrValueType {
        match self {
            AttrValue::S32(_) => AttrValueType::S32,
            AttrValue::ObjectId(_) => AttrValueType::ObjectId,
            AttrValue::ObjectList(_) => AttrValueType::ObjectList,
            AttrValue::VlanList(_) => AttrValueType::VlanList,
        }
    }

    pub fn as_s32(&self) -> Option<i32> {
        match self {
            AttrValue::S32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<RawSaiObjectId> {
        match self {
            AttrValue::ObjectId(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object_list_mut(&mut self) -> Option<&mut AttrList<RawSaiObjectId>> {
        match self {
            AttrValue::ObjectList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vlan_list_mut(&mut self) -> Option<&mut AttrList<u16>> {
        match self {
            AttrValue::VlanList(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::S32(v) => write!(f, "{}", v),
            AttrValue::ObjectId(v) => write!(f, "0x{:x}", v),
            AttrValue::ObjectList(l) => write!(f, "{} oids", l.len()),
            AttrValue::VlanList(l) => write!(f, "{} vlans", l.len()),
        }
    }
}

/// An (id, value) pair as passed by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: AttrId,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(id: AttrId, value: AttrValue) -> Self {
        Self { id, value }
    }
}

/// Operation an attribute list is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonApi {
    Create,
    Set,
    Get,
}

impl fmt::Display for CommonApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommonApi::Create => "create",
            CommonApi::Set => "set",
            CommonApi::Get => "get",
        };
        write!(f, "{}", s)
    }
}

/// Attribute capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrFlags {
    pub mandatory_on_create: bool,
    pub valid_for_create: bool,
    pub valid_for_set: bool,
    pub valid_for_get: bool,
}

impl AttrFlags {
    /// Read-only attribute.
    pub const READ_ONLY: Self = Self {
        mandatory_on_create: false,
        valid_for_create: false,
        valid_for_set: false,
        valid_for_get: true,
    };

    /// Mandatory on create, immutable afterwards.
    pub const MANDATORY_CREATE_ONLY: Self = Self {
        mandatory_on_create: true,
        valid_for_create: true,
        valid_for_set: false,
        valid_for_get: true,
    };

    /// Mandatory on create, settable afterwards.
    pub const MANDATORY_CREATE_AND_SET: Self = Self {
        mandatory_on_create: true,
        valid_for_create: true,
        valid_for_set: true,
        valid_for_get: true,
    };

    fn allows(&self, api: CommonApi) -> bool {
        match api {
            CommonApi::Create => self.valid_for_create,
            CommonApi::Set => self.valid_for_set,
            CommonApi::Get => self.valid_for_get,
        }
    }
}

/// Getter callback: fills `value` for the object `key`.
pub type AttrGetter<C> = fn(&C, RawSaiObjectId, &mut AttrValue) -> SaiResult<()>;

/// Setter callback: applies `value` to the object `key`.
pub type AttrSetter<C> = fn(&C, RawSaiObjectId, &AttrValue) -> SaiResult<()>;

/// One schema row: metadata plus callbacks for a single attribute.
pub struct AttrEntry<C: 'static> {
    pub id: AttrId,
    pub name: &'static str,
    pub value_type: AttrValueType,
    pub flags: AttrFlags,
    pub getter: Option<AttrGetter<C>>,
    pub setter: Option<AttrSetter<C>>,
}

fn lookup<C>(schema: &[AttrEntry<C>], id: AttrId) -> Option<&AttrEntry<C>> {
    schema.iter().find(|entry| entry.id == id)
}

/// Returns the schema name of `id`, or a placeholder for unknown ids.
pub fn attr_name<C>(schema: &[AttrEntry<C>], id: AttrId) -> String {
    lookup(schema, id)
        .map(|entry| entry.name.to_string())
        .unwrap_or_else(|| format!("attr #{}", id))
}

/// Validates an attribute list against `schema` for `api`.
///
/// Checks, in order: every id is known, no id repeats, every value has the
/// declared type, every attribute is valid for `api`, and (on create) every
/// mandatory attribute is present.
pub fn check_attribs<C>(
    attrs: &[Attribute],
    schema: &[AttrEntry<C>],
    api: CommonApi,
) -> SaiResult<()> {
    for (idx, attr) in attrs.iter().enumerate() {
        let entry = lookup(schema, attr.id).ok_or_else(|| {
            error!("Unknown attribute #{} passed to {}", attr.id, api);
            SaiError::invalid_attribute(format!("attr #{}", attr.id), "unknown attribute")
        })?;

        if attrs[..idx].iter().any(|prev| prev.id == attr.id) {
            error!("Attribute {} passed twice", entry.name);
            return Err(SaiError::invalid_attribute(entry.name, "duplicate attribute"));
        }

        if attr.value.value_type() != entry.value_type {
            error!(
                "Attribute {} expects {} value, got {}",
                entry.name,
                entry.value_type,
                attr.value.value_type()
            );
            return Err(SaiError::InvalidAttrValue {
                attr: entry.name.to_string(),
            });
        }

        if !entry.flags.allows(api) {
            error!("Attribute {} is not valid for {}", entry.name, api);
            return Err(SaiError::invalid_attribute(
                entry.name,
                format!("not valid for {}", api),
            ));
        }
    }

    if api == CommonApi::Create {
        if let Some(missing) = schema
            .iter()
            .filter(|entry| entry.flags.mandatory_on_create)
            .find(|entry| !attrs.iter().any(|attr| attr.id == entry.id))
        {
            error!("Missing mandatory attribute {} on create", missing.name);
            return Err(SaiError::MandatoryAttributeMissing {
                attr: missing.name.to_string(),
            });
        }
    }

    Ok(())
}

/// Finds the value of attribute `id` in a caller list.
pub fn find_attrib(attrs: &[Attribute], id: AttrId) -> Option<&AttrValue> {
    attrs.iter().find(|attr| attr.id == id).map(|attr| &attr.value)
}

/// Validates `attrs` for get and runs each getter in order.
///
/// Stops at the first failing getter; attributes after it are untouched.
pub fn get_attributes<C>(
    ctx: &C,
    key: RawSaiObjectId,
    key_str: &str,
    schema: &[AttrEntry<C>],
    attrs: &mut [Attribute],
) -> SaiResult<()> {
    check_attribs(attrs, schema, CommonApi::Get)?;

    for attr in attrs.iter_mut() {
        let entry = lookup(schema, attr.id).ok_or_else(|| {
            SaiError::invalid_attribute(format!("attr #{}", attr.id), "unknown attribute")
        })?;
        let getter = entry.getter.ok_or_else(|| {
            error!("{}: {} has no getter", key_str, entry.name);
            SaiError::from_status(SaiStatus::AttrNotImplemented)
        })?;

        if let Err(e) = getter(ctx, key, &mut attr.value) {
            error!("Failed getting {} of {}: {}", entry.name, key_str, e);
            return Err(e);
        }
        debug!("Got {} of {} = {}", entry.name, key_str, attr.value);
    }

    Ok(())
}

/// Validates `attr` for set and runs its setter.
pub fn set_attribute<C>(
    ctx: &C,
    key: RawSaiObjectId,
    key_str: &str,
    schema: &[AttrEntry<C>],
    attr: &Attribute,
) -> SaiResult<()> {
    check_attribs(std::slice::from_ref(attr), schema, CommonApi::Set)?;

    let entry = lookup(schema, attr.id).ok_or_else(|| {
        SaiError::invalid_attribute(format!("attr #{}", attr.id), "unknown attribute")
    })?;
    let setter = entry.setter.ok_or_else(|| {
        error!("{}: {} has no setter", key_str, entry.name);
        SaiError::from_status(SaiStatus::AttrNotImplemented)
    })?;

    debug!("Set {} of {} = {}", entry.name, key_str, attr.value);
    setter(ctx, key, &attr.value).inspect_err(|e| {
        error!("Failed setting {} of {}: {}", entry.name, key_str, e);
    })
}

/// Formats an attribute list as `NAME=value` pairs for logging.
pub fn attrs_to_string<C>(attrs: &[Attribute], schema: &[AttrEntry<C>]) -> String {
    let mut out = String::new();
    for (idx, attr) in attrs.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}={}", attr_name(schema, attr.id), attr.value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Default)]
    struct Ctx {
        level: Cell<i32>,
    }

    const ATTR_NAME: AttrId = 0;
    const ATTR_LEVEL: AttrId = 1;
    const ATTR_MEMBERS: AttrId = 2;

    fn name_get(_: &Ctx, key: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
        *value = AttrValue::ObjectId(key + 1);
        Ok(())
    }

    fn level_get(ctx: &Ctx, _: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
        *value = AttrValue::S32(ctx.level.get());
        Ok(())
    }

    fn level_set(ctx: &Ctx, _: RawSaiObjectId, value: &AttrValue) -> SaiResult<()> {
        let level = value
            .as_s32()
            .ok_or_else(|| SaiError::invalid_parameter("level"))?;
        ctx.level.set(level);
        Ok(())
    }

    fn members_get(_: &Ctx, _: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
        let list = value
            .as_object_list_mut()
            .ok_or_else(|| SaiError::invalid_parameter("members"))?;
        list.fill(&[10, 20, 30])
    }

    fn schema() -> [AttrEntry<Ctx>; 3] {
        [
            AttrEntry {
                id: ATTR_NAME,
                name: "NAME",
                value_type: AttrValueType::ObjectId,
                flags: AttrFlags::MANDATORY_CREATE_ONLY,
                getter: Some(name_get),
                setter: None,
            },
            AttrEntry {
                id: ATTR_LEVEL,
                name: "LEVEL",
                value_type: AttrValueType::S32,
                flags: AttrFlags::MANDATORY_CREATE_AND_SET,
                getter: Some(level_get),
                setter: Some(level_set),
            },
            AttrEntry {
                id: ATTR_MEMBERS,
                name: "MEMBERS",
                value_type: AttrValueType::ObjectList,
                flags: AttrFlags::READ_ONLY,
                getter: Some(members_get),
                setter: None,
            },
        ]
    }

    #[test]
    fn test_create_requires_mandatory() {
        let schema = schema();
        let attrs = [Attribute::new(ATTR_NAME, AttrValue::ObjectId(1))];
        assert_eq!(
            check_attribs(&attrs, &schema, CommonApi::Create),
            Err(SaiError::MandatoryAttributeMissing {
                attr: "LEVEL".to_string()
            })
        );
    }

    #[test]
    fn test_create_rejects_read_only() {
        let schema = schema();
        let attrs = [
            Attribute::new(ATTR_NAME, AttrValue::ObjectId(1)),
            Attribute::new(ATTR_LEVEL, AttrValue::S32(1)),
            Attribute::new(ATTR_MEMBERS, AttrValue::ObjectList(AttrList::with_capacity(1))),
        ];
        let err = check_attribs(&attrs, &schema, CommonApi::Create).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttribute);
    }

    #[test]
    fn test_unknown_duplicate_and_type_errors() {
        let schema = schema();

        let unknown = [Attribute::new(99, AttrValue::S32(0))];
        assert_eq!(
            check_attribs(&unknown, &schema, CommonApi::Get).unwrap_err().status(),
            SaiStatus::InvalidAttribute
        );

        let dup = [
            Attribute::new(ATTR_LEVEL, AttrValue::S32(0)),
            Attribute::new(ATTR_LEVEL, AttrValue::S32(0)),
        ];
        assert_eq!(
            check_attribs(&dup, &schema, CommonApi::Get).unwrap_err().status(),
            SaiStatus::InvalidAttribute
        );

        let wrong_type = [Attribute::new(ATTR_LEVEL, AttrValue::ObjectId(0))];
        assert_eq!(
            check_attribs(&wrong_type, &schema, CommonApi::Get).unwrap_err().status(),
            SaiStatus::InvalidAttrValue
        );
    }

    #[test]
    fn test_get_dispatch() {
        let ctx = Ctx::default();
        ctx.level.set(7);
        let schema = schema();

        let mut attrs = [
            Attribute::new(ATTR_NAME, AttrValue::ObjectId(0)),
            Attribute::new(ATTR_LEVEL, AttrValue::S32(0)),
            Attribute::new(ATTR_MEMBERS, AttrValue::ObjectList(AttrList::with_capacity(3))),
        ];
        get_attributes(&ctx, 41, "obj 41", &schema, &mut attrs).unwrap();

        assert_eq!(attrs[0].value, AttrValue::ObjectId(42));
        assert_eq!(attrs[1].value, AttrValue::S32(7));
        assert_eq!(
            attrs[2].value,
            AttrValue::ObjectList(AttrList::from_items(vec![10, 20, 30]))
        );
    }

    #[test]
    fn test_get_overflow_leaves_list_untouched() {
        let ctx = Ctx::default();
        let schema = schema();
        let mut attrs = [Attribute::new(
            ATTR_MEMBERS,
            AttrValue::ObjectList(AttrList::with_capacity(2)),
        )];

        let err = get_attributes(&ctx, 1, "obj", &schema, &mut attrs).unwrap_err();
        assert_eq!(err, SaiError::BufferOverflow { required: 3 });
        assert_eq!(
            attrs[0].value,
            AttrValue::ObjectList(AttrList::with_capacity(2))
        );
    }

    #[test]
    fn test_set_dispatch() {
        let ctx = Ctx::default();
        let schema = schema();

        set_attribute(&ctx, 1, "obj", &schema, &Attribute::new(ATTR_LEVEL, AttrValue::S32(3)))
            .unwrap();
        assert_eq!(ctx.level.get(), 3);

        let err = set_attribute(
            &ctx,
            1,
            "obj",
            &schema,
            &Attribute::new(ATTR_NAME, AttrValue::ObjectId(5)),
        )
        .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttribute);
    }

    #[test]
    fn test_attrs_to_string() {
        let schema = schema();
        let attrs = [
            Attribute::new(ATTR_NAME, AttrValue::ObjectId(0x10)),
            Attribute::new(ATTR_LEVEL, AttrValue::S32(2)),
        ];
        assert_eq!(attrs_to_string(&attrs, &schema), "NAME=0x10, LEVEL=2");
    }
}
