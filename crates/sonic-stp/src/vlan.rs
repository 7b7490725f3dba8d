//! VLAN to instance bindings and VLAN port membership.
//!
//! Each VLAN is bound to at most one instance. The binding is kept both in
//! the SDK (the instance VLAN list) and in [`VlanDb`], which is what the
//! port-list getter walks.

use crate::api::StpApi;
use crate::db::SaiDbInner;
use crate::oid;
use sonic_sai::api::mstp::{MstpInstanceId, MstpSdk};
use sonic_sai::{RawSaiObjectId, SaiError, SaiResult};
use sonic_types::{LogicalPortId, VlanId};

#[derive(Debug, Clone, Default)]
struct VlanEntry {
    stp: Option<MstpInstanceId>,
    members: Vec<LogicalPortId>,
}

/// Per-VLAN binding table, one entry per VLAN id.
#[derive(Debug, Clone)]
pub struct VlanDb {
    entries: Vec<VlanEntry>,
}

impl Default for VlanDb {
    fn default() -> Self {
        Self::new()
    }
}

impl VlanDb {
    /// All VLANs unbound, without members.
    pub fn new() -> Self {
        Self {
            entries: vec![VlanEntry::default(); VlanId::COUNT],
        }
    }

    fn entry(&self, vlan: VlanId) -> &VlanEntry {
        &self.entries[vlan.index()]
    }

    fn entry_mut(&mut self, vlan: VlanId) -> &mut VlanEntry {
        &mut self.entries[vlan.index()]
    }

    /// Marks every VLAN unbound. Membership is kept.
    pub fn reset_bindings(&mut self) {
        for entry in &mut self.entries {
            entry.stp = None;
        }
    }

    pub fn stp_of(&self, vlan: VlanId) -> Option<MstpInstanceId> {
        self.entry(vlan).stp
    }

    pub fn set_stp(&mut self, vlan: VlanId, stp: Option<MstpInstanceId>) {
        self.entry_mut(vlan).stp = stp;
    }

    /// VLANs bound to `inst`, ascending.
    pub fn vlans_of(&self, inst: MstpInstanceId) -> impl Iterator<Item = VlanId> + '_ {
        VlanId::all().filter(move |vlan| self.stp_of(*vlan) == Some(inst))
    }

    /// Member ports of `vlan` in the order they were added.
    pub fn members(&self, vlan: VlanId) -> &[LogicalPortId] {
        &self.entry(vlan).members
    }

    /// Adds a member; returns false if it was already one.
    pub fn add_member(&mut self, vlan: VlanId, port: LogicalPortId) -> bool {
        let members = &mut self.entry_mut(vlan).members;
        if members.contains(&port) {
            return false;
        }
        members.push(port);
        true
    }

    /// Removes a member; returns false if it was not one.
    pub fn remove_member(&mut self, vlan: VlanId, port: LogicalPortId) -> bool {
        let members = &mut self.entry_mut(vlan).members;
        let before = members.len();
        members.retain(|member| *member != port);
        members.len() != before
    }
}

/// Moves `vlan` onto `inst`, in the SDK first and then in the table.
///
/// If the add to `inst` fails after `vlan` left its previous instance, it
/// is put back on that instance. Should that fail too, `vlan` is left
/// unbound.
///
/// Caller holds the store write lock.
pub(crate) fn bind_locked(
    db: &mut SaiDbInner,
    sdk: &dyn MstpSdk,
    vlan: VlanId,
    inst: MstpInstanceId,
) -> SaiResult<()> {
    let previous = db.vlans.stp_of(vlan);
    if previous == Some(inst) {
        return Ok(());
    }

    if let Some(prev) = previous {
        sdk.remove_instance_vlans(prev, &[vlan])?;
        db.vlans.set_stp(vlan, None);
    }

    if let Err(e) = sdk.add_instance_vlans(inst, &[vlan]) {
        stp_error!("Failed to add VLAN {} to STP [{}]: {}", vlan, inst, e);
        if let Some(prev) = previous {
            restore_binding(db, sdk, vlan, prev);
        }
        return Err(e.into());
    }
    db.vlans.set_stp(vlan, Some(inst));

    stp_debug!("Bound VLAN {} to STP [{}]", vlan, inst);
    Ok(())
}

fn restore_binding(db: &mut SaiDbInner, sdk: &dyn MstpSdk, vlan: VlanId, prev: MstpInstanceId) {
    match sdk.add_instance_vlans(prev, &[vlan]) {
        Ok(()) => {
            db.vlans.set_stp(vlan, Some(prev));
            stp_notice!("Restored VLAN {} on STP [{}]", vlan, prev);
        }
        Err(e) => {
            stp_error!("Failed to restore VLAN {} on STP [{}], VLAN left unbound: {}", vlan, prev, e);
        }
    }
}

impl StpApi {
    /// Binds `vlan` to the instance `stp`, moving it off its previous one.
    pub fn bind_vlan(&self, vlan: VlanId, stp: RawSaiObjectId) -> SaiResult<()> {
        let inst = oid::decode_instance(stp)?;

        let mut db = self.db.write();
        if !db.stp.instances.is_used(inst) {
            stp_error!("Cannot bind VLAN {} to unknown STP [{}]", vlan, inst);
            return Err(SaiError::NotFound {
                item: format!("STP instance {}", inst),
            });
        }

        bind_locked(&mut db, self.sdk.as_ref(), vlan, inst)
    }

    /// Removes `vlan` from its instance. Unbound VLANs are left as they are.
    pub fn unbind_vlan(&self, vlan: VlanId) -> SaiResult<()> {
        let mut db = self.db.write();
        let Some(inst) = db.vlans.stp_of(vlan) else {
            return Ok(());
        };

        self.sdk.remove_instance_vlans(inst, &[vlan])?;
        db.vlans.set_stp(vlan, None);

        stp_debug!("Unbound VLAN {} from STP [{}]", vlan, inst);
        Ok(())
    }

    /// Instance `vlan` is bound to.
    pub fn vlan_binding(&self, vlan: VlanId) -> Option<MstpInstanceId> {
        self.db.read().vlans.stp_of(vlan)
    }

    /// Adds the port handle `port` to `vlan`. Adding an existing member is a
    /// no-op.
    pub fn add_vlan_member(&self, vlan: VlanId, port: RawSaiObjectId) -> SaiResult<()> {
        let port = oid::decode_port(port)?;
        if self.db.write().vlans.add_member(vlan, port) {
            stp_debug!("Added port {} to VLAN {}", port, vlan);
        }
        Ok(())
    }

    /// Removes the port handle `port` from `vlan`.
    pub fn remove_vlan_member(&self, vlan: VlanId, port: RawSaiObjectId) -> SaiResult<()> {
        let port = oid::decode_port(port)?;
        if !self.db.write().vlans.remove_member(vlan, port) {
            return Err(SaiError::NotFound {
                item: format!("port {} in VLAN {}", port, vlan),
            });
        }
        stp_debug!("Removed port {} from VLAN {}", port, vlan);
        Ok(())
    }
}
