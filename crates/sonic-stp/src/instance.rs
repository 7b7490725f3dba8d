//! STP instance objects: lifecycle and attributes.
//!
//! An instance exists exactly while its id is allocated. Removal is refused
//! for the default instance and for instances that still have VLANs; a
//! hardware delete failure leaves the id allocated.

use crate::api::StpApi;
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::logging::SOURCE;
use crate::oid;
use sonic_sai::api::mstp::MstpInstanceId;
use sonic_sai::attr::{
    self, AttrEntry, AttrFlags, AttrId, AttrValue, AttrValueType, Attribute, CommonApi,
};
use sonic_sai::{RawSaiObjectId, SaiError, SaiResult, StpOid};
use std::collections::HashSet;

/// VLANs bound to the instance (`SAI_STP_ATTR_VLAN_LIST`).
pub const STP_ATTR_VLAN_LIST: AttrId = 0;
/// STP ports of the instance (`SAI_STP_ATTR_PORT_LIST`).
pub const STP_ATTR_PORT_LIST: AttrId = 1;

pub(crate) static STP_ATTRIBS: [AttrEntry<StpApi>; 2] = [
    AttrEntry {
        id: STP_ATTR_VLAN_LIST,
        name: "SAI_STP_ATTR_VLAN_LIST",
        value_type: AttrValueType::VlanList,
        flags: AttrFlags::READ_ONLY,
        getter: Some(vlanlist_get),
        setter: None,
    },
    AttrEntry {
        id: STP_ATTR_PORT_LIST,
        name: "SAI_STP_ATTR_PORT_LIST",
        value_type: AttrValueType::ObjectList,
        flags: AttrFlags::READ_ONLY,
        getter: Some(ports_get),
        setter: None,
    },
];

fn audit_object(inst: MstpInstanceId) -> String {
    format!("stp_{}", inst)
}

impl StpApi {
    /// Creates an STP instance.
    ///
    /// # Errors
    ///
    /// - attribute validation errors
    /// - `Uninitialized` before [`StpApi::initialize`]
    /// - `TableFull` when no instance id is free
    /// - the translated SDK error if the hardware instance cannot be added;
    ///   the id is released again
    pub fn create_stp(&self, attrs: &[Attribute]) -> SaiResult<StpOid> {
        attr::check_attribs(attrs, &STP_ATTRIBS, CommonApi::Create).inspect_err(|_| {
            stp_error!("Failed attribs check");
        })?;

        let mut db = self.db.write();
        db.stp.default_stp()?;

        let inst = db.stp.instances.allocate().inspect_err(|_| {
            stp_error!("Failed to generate STP instance id");
        })?;
        stp_debug!("Creating new STP instance [{}]", inst);

        let result = oid::encode_instance(inst)
            .and_then(|oid| self.sdk.add_instance(inst).map(|()| oid).map_err(SaiError::from));
        let oid = match result {
            Ok(oid) => oid,
            Err(e) => {
                stp_error!("Failed to create STP instance [{}]: {}", inst, e);
                db.stp.instances.free(inst);
                drop(db);
                audit_log!(AuditRecord::new(AuditCategory::ResourceCreate, SOURCE, "create_stp")
                    .with_object_id(audit_object(inst))
                    .with_object_type("stp_instance")
                    .with_error(e.to_string()));
                return Err(e);
            }
        };
        drop(db);

        stp_notice!("Created STP instance [{}], oid {}", inst, oid);
        audit_log!(AuditRecord::new(AuditCategory::ResourceCreate, SOURCE, "create_stp")
            .with_object_id(audit_object(inst))
            .with_object_type("stp_instance")
            .with_details(serde_json::json!({
                "instance": inst.as_u16(),
                "oid": oid.as_raw(),
            })));

        Ok(oid)
    }

    /// Removes an STP instance.
    ///
    /// The store write lock is held from the checks until the id is
    /// released, so a concurrent remove or create of the same id waits.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `stp` is not an instance handle
    /// - `Uninitialized` before [`StpApi::initialize`]
    /// - `InvalidObjectId` for the default instance
    /// - `NotFound` if the id is not allocated, including a second removal
    ///   of the same handle
    /// - `ObjectInUse` while VLANs are bound to it
    /// - the translated SDK error if the count query or hardware delete
    ///   fails; the id stays allocated
    pub fn remove_stp(&self, stp: RawSaiObjectId) -> SaiResult<()> {
        let inst = oid::decode_instance(stp).inspect_err(|_| {
            stp_error!("Failed to get STP instance id of object [{:x}]", stp);
        })?;

        stp_notice!("Removing STP number [{}]", inst);

        let mut db = self.db.write();
        let default_id = db.stp.default_stp()?;
        if inst == default_id {
            drop(db);
            stp_error!("Removing default STP is not permitted");
            audit_log!(AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "remove_stp")
                .with_outcome(AuditOutcome::Denied)
                .with_object_id(audit_object(inst))
                .with_object_type("stp_instance")
                .with_error("default STP instance"));
            return Err(SaiError::invalid_object_id(format!(
                "STP instance {} is the default instance",
                inst
            )));
        }

        if !db.stp.instances.is_used(inst) {
            stp_error!("STP number [{}] does not exist", inst);
            return Err(SaiError::NotFound {
                item: format!("STP instance {}", inst),
            });
        }

        let vlan_count = self.sdk.instance_vlan_count(inst).inspect_err(|e| {
            stp_error!("{}", e);
        })?;
        if vlan_count != 0 {
            stp_error!(
                "Failed to remove STP number [{}]: it still has {} VLANs",
                inst,
                vlan_count
            );
            return Err(SaiError::object_in_use(format!("STP instance {}", inst)));
        }

        if let Err(e) = self.sdk.delete_instance(inst) {
            drop(db);
            stp_error!("{}", e);
            let e = SaiError::from(e);
            audit_log!(AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "remove_stp")
                .with_object_id(audit_object(inst))
                .with_object_type("stp_instance")
                .with_error(e.to_string()));
            return Err(e);
        }

        db.stp.instances.free(inst);
        drop(db);

        audit_log!(AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "remove_stp")
            .with_object_id(audit_object(inst))
            .with_object_type("stp_instance")
            .with_details(serde_json::json!({ "instance": inst.as_u16() })));

        Ok(())
    }

    /// Sets an instance attribute. No instance attribute is settable.
    pub fn set_stp_attribute(&self, stp: RawSaiObjectId, attr: &Attribute) -> SaiResult<()> {
        let key_str = oid::stp_key_str(stp);
        attr::set_attribute(self, stp, &key_str, &STP_ATTRIBS, attr)
    }

    /// Reads instance attributes into `attrs`.
    pub fn get_stp_attribute(&self, stp: RawSaiObjectId, attrs: &mut [Attribute]) -> SaiResult<()> {
        let key_str = oid::stp_key_str(stp);
        attr::get_attributes(self, stp, &key_str, &STP_ATTRIBS, attrs)
    }
}

/// Decodes an instance handle and checks the id against the table range.
fn checked_instance(api: &StpApi, stp: RawSaiObjectId) -> SaiResult<MstpInstanceId> {
    let inst = oid::decode_instance(stp).inspect_err(|_| {
        stp_error!("Failed to get stp_id of object [{:x}]", stp);
    })?;

    if !api.db.read().stp.instances.in_range(inst) {
        stp_error!(
            "Invalid STP id {}: should be within a range [{} - {}]",
            inst,
            api.config.instance_id_min,
            api.config.instance_id_max
        );
        return Err(SaiError::invalid_parameter(format!(
            "STP instance id {} out of range",
            inst
        )));
    }

    Ok(inst)
}

/// `SAI_STP_ATTR_VLAN_LIST` getter.
///
/// Fails with `BufferOverflow` before reading the list when the caller
/// capacity is below the live VLAN count.
fn vlanlist_get(api: &StpApi, stp: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
    let inst = checked_instance(api, stp)?;
    let list = value
        .as_vlan_list_mut()
        .ok_or_else(|| SaiError::invalid_parameter("VLAN list value expected"))?;

    let _db = api.db.read();

    let count = api.sdk.instance_vlan_count(inst)?;
    list.ensure_capacity(count as usize).inspect_err(|_| {
        stp_error!("Not enough memory to store {} VLANs", count);
    })?;

    let vlans: Vec<u16> = api
        .sdk
        .instance_vlans(inst)?
        .iter()
        .map(|vlan| vlan.as_u16())
        .collect();
    list.fill(&vlans)
}

/// `SAI_STP_ATTR_PORT_LIST` getter.
///
/// Walks every VLAN bound to the instance and every member of those VLANs
/// twice under one read lock: once to size the scratch buffer (a port in N
/// of the VLANs counts N times), once to collect STP port handles. A port
/// in several VLANs is reported once, at its first position.
fn ports_get(api: &StpApi, stp: RawSaiObjectId, value: &mut AttrValue) -> SaiResult<()> {
    let inst = checked_instance(api, stp)?;
    let list = value
        .as_object_list_mut()
        .ok_or_else(|| SaiError::invalid_parameter("object list value expected"))?;

    let db = api.db.read();

    let total: usize = db
        .vlans
        .vlans_of(inst)
        .map(|vlan| db.vlans.members(vlan).len())
        .sum();
    if total == 0 {
        return list.fill(&[]);
    }

    let mut ports = Vec::with_capacity(total);
    let mut seen = HashSet::with_capacity(total);
    for vlan in db.vlans.vlans_of(inst) {
        for port in db.vlans.members(vlan) {
            let oid = oid::encode_instance_port(inst, *port)?.as_raw();
            if seen.insert(oid) {
                ports.push(oid);
            }
        }
    }

    stp_debug!(
        "STP [{}] has {} ports ({} VLAN memberships)",
        inst,
        ports.len(),
        total
    );
    list.fill(&ports)
}
