//! STP port objects.
//!
//! An STP port is the (instance, port) pair carried in its handle. Creating
//! one programs the port state and returns the handle; nothing is stored,
//! so there is nothing to remove. Accessors read through to the SDK for
//! whatever pair the handle names, including pairs never created.

use crate::api::StpApi;
use crate::audit::{AuditCategory, AuditRecord};
use crate::logging::SOURCE;
use crate::oid;
use crate::state::StpPortState;
use sonic_sai::api::mstp::MstpInstanceId;
use sonic_sai::attr::{
    self, AttrEntry, AttrFlags, AttrId, AttrValue, AttrValueType, Attribute, CommonApi,
};
use sonic_sai::{RawSaiObjectId, SaiError, SaiResult, StpPortOid};
use sonic_types::LogicalPortId;

/// Instance handle (`SAI_STP_PORT_ATTR_STP`).
pub const STP_PORT_ATTR_STP: AttrId = 0;
/// Port handle (`SAI_STP_PORT_ATTR_PORT`).
pub const STP_PORT_ATTR_PORT: AttrId = 1;
/// Port state (`SAI_STP_PORT_ATTR_STATE`).
pub const STP_PORT_ATTR_STATE: AttrId = 2;

pub(crate) static STP_PORT_ATTRIBS: [AttrEntry<StpApi>; 3] = [
    AttrEntry {
        id: STP_PORT_ATTR_STP,
        name: "SAI_STP_PORT_ATTR_STP",
        value_type: AttrValueType::ObjectId,
        flags: AttrFlags::MANDATORY_CREATE_ONLY,
        getter: Some(stp_id_get),
        setter: None,
    },
    AttrEntry {
        id: STP_PORT_ATTR_PORT,
        name: "SAI_STP_PORT_ATTR_PORT",
        value_type: AttrValueType::ObjectId,
        flags: AttrFlags::MANDATORY_CREATE_ONLY,
        getter: Some(port_id_get),
        setter: None,
    },
    AttrEntry {
        id: STP_PORT_ATTR_STATE,
        name: "SAI_STP_PORT_ATTR_STATE",
        value_type: AttrValueType::S32,
        flags: AttrFlags::MANDATORY_CREATE_AND_SET,
        getter: Some(state_get),
        setter: Some(state_set),
    },
];

fn mandatory<T>(value: Option<T>, id: AttrId) -> SaiResult<T> {
    value.ok_or_else(|| SaiError::MandatoryAttributeMissing {
        attr: attr::attr_name(&STP_PORT_ATTRIBS, id),
    })
}

fn program_state(
    api: &StpApi,
    action: &str,
    inst: MstpInstanceId,
    port: LogicalPortId,
    state: StpPortState,
) -> SaiResult<()> {
    let hw_state = state.to_hardware();
    let object_id = format!("stp_port_{}_{}", inst, port);

    if let Err(e) = api.sdk.set_port_state(inst, port, hw_state) {
        stp_error!("Failed to set stp port state ({}) - {}", hw_state, e);
        let e = SaiError::from(e);
        audit_log!(AuditRecord::new(AuditCategory::ResourceModify, SOURCE, action)
            .with_object_id(object_id)
            .with_object_type("stp_port")
            .with_error(e.to_string()));
        return Err(e);
    }

    audit_log!(AuditRecord::new(AuditCategory::ResourceModify, SOURCE, action)
        .with_object_id(object_id)
        .with_object_type("stp_port")
        .with_details(serde_json::json!({
            "instance": inst.as_u16(),
            "port": port.as_u32(),
            "state": state.to_string(),
        })));
    Ok(())
}

impl StpApi {
    /// Creates an STP port: programs `STATE` for the (`STP`, `PORT`) pair
    /// and returns the pair's handle.
    ///
    /// Creating the same pair again reprograms the state and returns the
    /// same handle.
    pub fn create_stp_port(&self, attrs: &[Attribute]) -> SaiResult<StpPortOid> {
        attr::check_attribs(attrs, &STP_PORT_ATTRIBS, CommonApi::Create)?;

        stp_notice!(
            "Create STP Port, {}",
            attr::attrs_to_string(attrs, &STP_PORT_ATTRIBS)
        );

        let stp = mandatory(
            attr::find_attrib(attrs, STP_PORT_ATTR_STP).and_then(AttrValue::as_oid),
            STP_PORT_ATTR_STP,
        )?;
        let port = mandatory(
            attr::find_attrib(attrs, STP_PORT_ATTR_PORT).and_then(AttrValue::as_oid),
            STP_PORT_ATTR_PORT,
        )?;
        let state = mandatory(
            attr::find_attrib(attrs, STP_PORT_ATTR_STATE).and_then(AttrValue::as_s32),
            STP_PORT_ATTR_STATE,
        )?;

        let inst = oid::decode_instance(stp)?;
        let port = oid::decode_port(port)?;
        let state = StpPortState::validate(state)?;

        program_state(self, "create_stp_port", inst, port, state)?;

        let stp_port = oid::encode_instance_port(inst, port)?;
        stp_notice!("Created STP Port {}", oid::stp_port_key_str(stp_port.as_raw()));
        Ok(stp_port)
    }

    /// STP ports own nothing, so removal is not supported.
    pub fn remove_stp_port(&self, stp_port: RawSaiObjectId) -> SaiResult<()> {
        stp_debug!("Remove STP port 0x{:x} is not supported", stp_port);
        Err(SaiError::not_supported("STP port removal"))
    }

    /// Bulk STP port creation is not implemented.
    pub fn create_stp_ports(&self, _attrs: &[Vec<Attribute>]) -> SaiResult<Vec<StpPortOid>> {
        Err(SaiError::not_implemented("bulk STP port creation"))
    }

    /// Bulk STP port removal is not implemented.
    pub fn remove_stp_ports(&self, _stp_ports: &[RawSaiObjectId]) -> SaiResult<()> {
        Err(SaiError::not_implemented("bulk STP port removal"))
    }

    /// Sets an STP port attribute. Only `STATE` is settable.
    pub fn set_stp_port_attribute(&self, stp_port: RawSaiObjectId, attr: &Attribute) -> SaiResult<()> {
        let key_str = oid::stp_port_key_str(stp_port);
        attr::set_attribute(self, stp_port, &key_str, &STP_PORT_ATTRIBS, attr)
    }

    /// Reads STP port attributes into `attrs`.
    pub fn get_stp_port_attribute(
        &self,
        stp_port: RawSaiObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let key_str = oid::stp_port_key_str(stp_port);
        attr::get_attributes(self, stp_port, &key_str, &STP_PORT_ATTRIBS, attrs)
    }
}

fn stp_id_get(_: &StpApi, stp_port: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
    let (inst, _) = oid::decode_instance_port(stp_port)?;
    *value = AttrValue::ObjectId(oid::encode_instance(inst)?.as_raw());
    Ok(())
}

fn port_id_get(_: &StpApi, stp_port: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
    let (_, port) = oid::decode_instance_port(stp_port)?;
    *value = AttrValue::ObjectId(oid::encode_port(port)?.as_raw());
    Ok(())
}

fn state_get(api: &StpApi, stp_port: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
    let (inst, port) = oid::decode_instance_port(stp_port)?;

    let hw_state = api.sdk.port_state(inst, port).inspect_err(|e| {
        stp_error!("Failed to get stp state - {}", e);
    })?;

    *value = AttrValue::S32(StpPortState::from_hardware(hw_state)?.as_raw());
    Ok(())
}

fn state_set(api: &StpApi, stp_port: RawSaiObjectId, value: &AttrValue) -> SaiResult<()> {
    let (inst, port) = oid::decode_instance_port(stp_port)?;
    let raw = value
        .as_s32()
        .ok_or_else(|| SaiError::invalid_parameter("s32 value expected"))?;
    let state = StpPortState::validate(raw)?;

    program_state(api, "set_stp_port_state", inst, port, state)
}
