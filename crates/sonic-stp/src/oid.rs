//! STP object identities.
//!
//! - instance: `STP` handle, payload = instance id
//! - instance-port: `STP_PORT` handle, payload = logical port, ext = instance
//!   id. Nothing is stored for it; the handle is the object.
//! - port: `PORT` handle, payload = logical port

use sonic_sai::api::mstp::MstpInstanceId;
use sonic_sai::{ObjectKey, PortOid, RawSaiObjectId, SaiError, SaiResult, StpOid, StpPortOid};
use sonic_types::LogicalPortId;

fn instance_from_payload(raw: u32, handle: RawSaiObjectId) -> SaiResult<MstpInstanceId> {
    u16::try_from(raw).map(MstpInstanceId::new).map_err(|_| {
        SaiError::invalid_parameter(format!(
            "STP instance id {} of object 0x{:x} out of range",
            raw, handle
        ))
    })
}

pub fn encode_instance(inst: MstpInstanceId) -> SaiResult<StpOid> {
    StpOid::encode(ObjectKey::data(u32::from(inst.as_u16())))
}

pub fn decode_instance(handle: RawSaiObjectId) -> SaiResult<MstpInstanceId> {
    let oid = StpOid::try_from_raw(handle)?;
    instance_from_payload(oid.key().data, handle)
}

pub fn encode_instance_port(inst: MstpInstanceId, port: LogicalPortId) -> SaiResult<StpPortOid> {
    StpPortOid::encode(ObjectKey::with_ext(port.as_u32(), u32::from(inst.as_u16())))
}

pub fn decode_instance_port(handle: RawSaiObjectId) -> SaiResult<(MstpInstanceId, LogicalPortId)> {
    let key = StpPortOid::try_from_raw(handle)?.key();
    let inst = instance_from_payload(key.ext, handle)?;
    Ok((inst, LogicalPortId::new(key.data)))
}

pub fn encode_port(port: LogicalPortId) -> SaiResult<PortOid> {
    PortOid::encode(ObjectKey::data(port.as_u32()))
}

pub fn decode_port(handle: RawSaiObjectId) -> SaiResult<LogicalPortId> {
    Ok(LogicalPortId::new(PortOid::try_from_raw(handle)?.key().data))
}

/// Log key of an instance handle.
pub fn stp_key_str(handle: RawSaiObjectId) -> String {
    match decode_instance(handle) {
        Ok(inst) => format!("STP instance id [{}]", inst),
        Err(_) => "Invalid STP instance id".to_string(),
    }
}

/// Log key of an instance-port handle.
pub fn stp_port_key_str(handle: RawSaiObjectId) -> String {
    match decode_instance_port(handle) {
        Ok((inst, port)) => format!("STP Port ({}, {})", inst, port),
        Err(_) => "Invalid STP Port id".to_string(),
    }
}
