//! Type-safe SAI object ID wrappers and the object-id codec.
//!
//! A raw object ID is an opaque 64-bit handle. Internally it packs the
//! object type tag together with a small payload:
//!
//! ```text
//!  63        56 55                     32 31                        0
//! +------------+-------------------------+---------------------------+
//! | object type|        ext (24 bit)     |        data (32 bit)      |
//! +------------+-------------------------+---------------------------+
//! ```
//!
//! `data` carries the primary identifier (STP instance id, logical port).
//! `ext` carries a secondary one for composite objects such as STP ports.

use crate::error::{SaiError, SaiResult};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

const TYPE_SHIFT: u32 = 56;
const EXT_SHIFT: u32 = 32;
const EXT_MASK: u64 = 0x00FF_FFFF;
const DATA_MASK: u64 = 0xFFFF_FFFF;

/// SAI object type tags (`sai_object_type_t`) used by this workspace.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaiObjectType {
    Null = 0,
    Port = 1,
    Stp = 16,
    StpPort = 46,
}

impl SaiObjectType {
    /// Parses a type tag; unknown tags return `None`.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(SaiObjectType::Null),
            1 => Some(SaiObjectType::Port),
            16 => Some(SaiObjectType::Stp),
            46 => Some(SaiObjectType::StpPort),
            _ => None,
        }
    }

    /// Extracts the type tag of a raw object ID.
    pub fn of(raw: RawSaiObjectId) -> Option<Self> {
        Self::from_raw((raw >> TYPE_SHIFT) as u8)
    }
}

impl fmt::Display for SaiObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiObjectType::Null => "SAI_OBJECT_TYPE_NULL",
            SaiObjectType::Port => "SAI_OBJECT_TYPE_PORT",
            SaiObjectType::Stp => "SAI_OBJECT_TYPE_STP",
            SaiObjectType::StpPort => "SAI_OBJECT_TYPE_STP_PORT",
        };
        write!(f, "{}", s)
    }
}

/// Payload of an object ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectKey {
    /// Primary identifier.
    pub data: u32,
    /// Secondary identifier, at most 24 bits.
    pub ext: u32,
}

impl ObjectKey {
    /// Key with only the primary identifier set.
    pub const fn data(data: u32) -> Self {
        Self { data, ext: 0 }
    }

    /// Key with both identifiers set.
    pub const fn with_ext(data: u32, ext: u32) -> Self {
        Self { data, ext }
    }
}

/// Marker trait for SAI object kinds.
///
/// Each SAI object type implements this trait to enable compile-time
/// type checking of object IDs.
pub trait SaiObjectKind: Send + Sync + 'static {
    /// Returns the SAI object type name for debugging.
    fn type_name() -> &'static str;

    /// Returns the type tag encoded into IDs of this kind.
    fn object_type() -> SaiObjectType;
}

/// A type-safe SAI object ID.
///
/// The phantom type parameter `T` indicates what kind of SAI object this
/// ID refers to, so a port handle cannot be passed where an STP instance
/// handle is expected.
///
/// # Examples
///
/// ```
/// use sonic_sai::{ObjectKey, PortOid, StpOid};
///
/// let stp = StpOid::encode(ObjectKey::data(3)).unwrap();
/// assert_eq!(stp.key().data, 3);
///
/// // A raw STP handle does not decode as a port.
/// assert!(PortOid::try_from_raw(stp.as_raw()).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// The null object ID (SAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self {
        raw: 0,
        _marker: PhantomData,
    };

    /// Encodes a payload into an ID of kind `T`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `key.ext` does not fit in 24 bits.
    pub fn encode(key: ObjectKey) -> SaiResult<Self> {
        let ext = u64::from(key.ext);
        if ext > EXT_MASK {
            return Err(SaiError::invalid_parameter(format!(
                "{} ext 0x{:x} exceeds 24 bits",
                T::type_name(),
                key.ext
            )));
        }

        let raw = (u64::from(T::object_type() as u8) << TYPE_SHIFT)
            | (ext << EXT_SHIFT)
            | u64::from(key.data);
        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }

    /// Decodes a raw handle, checking that it carries the type tag of `T`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for null handles, unknown tags, and handles
    /// of another object type.
    pub fn try_from_raw(raw: RawSaiObjectId) -> SaiResult<Self> {
        match SaiObjectType::of(raw) {
            Some(found) if found == T::object_type() && found != SaiObjectType::Null => Ok(Self {
                raw,
                _marker: PhantomData,
            }),
            _ => Err(SaiError::invalid_parameter(format!(
                "object 0x{:016x} is not of type {}",
                raw,
                T::object_type()
            ))),
        }
    }

    /// Returns the payload carried by this ID.
    pub const fn key(&self) -> ObjectKey {
        ObjectKey {
            data: (self.raw & DATA_MASK) as u32,
            ext: ((self.raw >> EXT_SHIFT) & EXT_MASK) as u32,
        }
    }

    /// Returns the raw object ID value.
    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }

    /// Returns true if this is a null object ID.
    pub const fn is_null(&self) -> bool {
        self.raw == 0
    }
}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:016x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> Default for SaiObjectId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

// ============================================================================
// Object Kind Markers
// ============================================================================

macro_rules! define_object_kind {
    ($name:ident, $type_name:literal, $oid_alias:ident, $object_type:expr) => {
        #[doc = concat!("Marker type for SAI ", $type_name, " objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            fn type_name() -> &'static str {
                $type_name
            }

            fn object_type() -> SaiObjectType {
                $object_type
            }
        }

        #[doc = concat!("Type alias for ", $type_name, " object IDs.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(PortKind, "Port", PortOid, SaiObjectType::Port);
define_object_kind!(StpKind, "Stp", StpOid, SaiObjectType::Stp);
define_object_kind!(StpPortKind, "StpPort", StpPortOid, SaiObjectType::StpPort);
