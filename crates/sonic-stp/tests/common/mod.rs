//! Shared setup for the STP integration tests.

#![allow(dead_code)]

use sonic_sai::api::mstp::{MstpInstanceId, SoftMstp};
use sonic_sai::attr::{AttrList, AttrValue, Attribute};
use sonic_sai::{RawSaiObjectId, SaiResult};
use sonic_stp::oid;
use sonic_stp::{StpApi, StpConfig, STP_ATTR_PORT_LIST, STP_ATTR_VLAN_LIST};
use sonic_types::{LogicalPortId, VlanId};
use std::sync::Arc;

/// An initialized API over a software SDK with instance ids `1..=max`.
pub fn setup(max: u16) -> (StpApi, Arc<SoftMstp>) {
    sonic_stp::logging::init_tracing("warn");
    let sdk = Arc::new(SoftMstp::new());
    let api = StpApi::new(StpConfig::with_instance_range(1, max), sdk.clone())
        .expect("valid test config");
    api.initialize().expect("initialize");
    (api, sdk)
}

pub fn vlan(id: u16) -> VlanId {
    VlanId::new(id).expect("valid VLAN id")
}

pub fn port(raw: u32) -> RawSaiObjectId {
    oid::encode_port(LogicalPortId::new(raw))
        .expect("port handle")
        .as_raw()
}

pub fn instance_of(stp: RawSaiObjectId) -> MstpInstanceId {
    oid::decode_instance(stp).expect("instance handle")
}

pub fn stp_port(inst: MstpInstanceId, raw: u32) -> RawSaiObjectId {
    oid::encode_instance_port(inst, LogicalPortId::new(raw))
        .expect("STP port handle")
        .as_raw()
}

/// Reads the instance port list with room for `capacity` entries.
pub fn port_list(api: &StpApi, stp: RawSaiObjectId, capacity: u32) -> SaiResult<Vec<RawSaiObjectId>> {
    let mut attrs = [Attribute::new(
        STP_ATTR_PORT_LIST,
        AttrValue::ObjectList(AttrList::with_capacity(capacity)),
    )];
    api.get_stp_attribute(stp, &mut attrs)?;
    match &attrs[0].value {
        AttrValue::ObjectList(list) => Ok(list.items().to_vec()),
        other => panic!("unexpected value {}", other),
    }
}

/// Reads the instance VLAN list with room for `capacity` entries.
pub fn vlan_list(api: &StpApi, stp: RawSaiObjectId, capacity: u32) -> SaiResult<Vec<u16>> {
    let mut attrs = [Attribute::new(
        STP_ATTR_VLAN_LIST,
        AttrValue::VlanList(AttrList::with_capacity(capacity)),
    )];
    api.get_stp_attribute(stp, &mut attrs)?;
    match &attrs[0].value {
        AttrValue::VlanList(list) => Ok(list.items().to_vec()),
        other => panic!("unexpected value {}", other),
    }
}
