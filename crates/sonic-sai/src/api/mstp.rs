//! MSTP collaborator of the switch SDK.
//!
//! [`MstpSdk`] is the narrow set of SDK calls the STP layer needs: global
//! mode, instance add/delete, per-instance VLAN lists and per-(instance,
//! port) forwarding state. SDK statuses ([`SxStatus`]) are translated into
//! SAI errors in exactly one place, `From<SdkError> for SaiError`.
//!
//! [`SoftMstp`] is an in-memory implementation used when no hardware SDK is
//! attached and by tests. It can be told to fail the next call of a given
//! operation so rollback paths can be exercised.

use crate::error::{SaiError, SaiStatus};
use log::debug;
use parking_lot::Mutex;
use sonic_types::{LogicalPortId, VlanId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// MSTP instance id as understood by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MstpInstanceId(u16);

impl MstpInstanceId {
    pub const fn new(raw: u16) -> Self {
        MstpInstanceId(raw)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for MstpInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Switch-wide spanning tree mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MstpMode {
    #[default]
    Disabled,
    Stp,
    Rstp,
    Mstp,
}

/// Hardware forwarding state of a port within an instance.
///
/// Kept as a raw value because the SDK may report states the STP layer
/// does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HwPortState(u32);

impl HwPortState {
    pub const DISCARDING: Self = HwPortState(1);
    pub const LEARNING: Self = HwPortState(2);
    pub const FORWARDING: Self = HwPortState(3);

    pub const fn from_raw(raw: u32) -> Self {
        HwPortState(raw)
    }

    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HwPortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HwPortState::DISCARDING => write!(f, "DISCARDING"),
            HwPortState::LEARNING => write!(f, "LEARNING"),
            HwPortState::FORWARDING => write!(f, "FORWARDING"),
            HwPortState(raw) => write!(f, "UNKNOWN({})", raw),
        }
    }
}

/// SDK status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SxStatus {
    Error,
    NoResources,
    NoMemory,
    ParamError,
    ParamExceedsRange,
    EntryNotFound,
    EntryAlreadyExists,
    ResourceInUse,
    Unsupported,
    NotInitialized,
    Timeout,
}

impl fmt::Display for SxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SxStatus::Error => "Internal error",
            SxStatus::NoResources => "No resources",
            SxStatus::NoMemory => "No memory",
            SxStatus::ParamError => "Parameter error",
            SxStatus::ParamExceedsRange => "Parameter exceeds range",
            SxStatus::EntryNotFound => "Entry not found",
            SxStatus::EntryAlreadyExists => "Entry already exists",
            SxStatus::ResourceInUse => "Resource in use",
            SxStatus::Unsupported => "Unsupported",
            SxStatus::NotInitialized => "Not initialized",
            SxStatus::Timeout => "Timeout",
        };
        write!(f, "{}", s)
    }
}

/// SDK call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MstpOp {
    ModeSet,
    InstanceAdd,
    InstanceDelete,
    VlanListGet,
    VlanListAdd,
    VlanListDelete,
    PortStateGet,
    PortStateSet,
    LogVerbositySet,
}

impl fmt::Display for MstpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MstpOp::ModeSet => "mstp_mode_set",
            MstpOp::InstanceAdd => "mstp_inst_add",
            MstpOp::InstanceDelete => "mstp_inst_delete",
            MstpOp::VlanListGet => "mstp_inst_vlan_list_get",
            MstpOp::VlanListAdd => "mstp_inst_vlan_list_add",
            MstpOp::VlanListDelete => "mstp_inst_vlan_list_delete",
            MstpOp::PortStateGet => "mstp_inst_port_state_get",
            MstpOp::PortStateSet => "mstp_inst_port_state_set",
            MstpOp::LogVerbositySet => "mstp_log_verbosity_set",
        };
        write!(f, "{}", s)
    }
}

/// A failed SDK call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{op} failed: {status}")]
pub struct SdkError {
    pub op: MstpOp,
    pub status: SxStatus,
}

impl SdkError {
    pub fn new(op: MstpOp, status: SxStatus) -> Self {
        Self { op, status }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

impl From<SdkError> for SaiError {
    fn from(err: SdkError) -> Self {
        let item = err.op.to_string();
        match err.status {
            SxStatus::EntryNotFound => SaiError::NotFound { item },
            SxStatus::EntryAlreadyExists => SaiError::AlreadyExists { item },
            SxStatus::ResourceInUse => SaiError::ObjectInUse { object: item },
            SxStatus::ParamError | SxStatus::ParamExceedsRange => {
                SaiError::invalid_parameter(err.to_string())
            }
            SxStatus::Unsupported => SaiError::not_supported(item),
            SxStatus::NoResources => SaiError::from_status(SaiStatus::InsufficientResources),
            SxStatus::NoMemory => SaiError::from_status(SaiStatus::NoMemory),
            SxStatus::NotInitialized => SaiError::Uninitialized,
            SxStatus::Error | SxStatus::Timeout => SaiError::from_status(SaiStatus::Failure),
        }
    }
}

/// SDK log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SdkVerbosity {
    None,
    Error,
    #[default]
    Warning,
    Notice,
    Info,
    Debug,
    Funcs,
}

/// MSTP calls of the switch SDK.
pub trait MstpSdk: Send + Sync {
    /// Sets the switch-wide spanning tree mode.
    fn set_mode(&self, mode: MstpMode) -> SdkResult<()>;

    /// Creates a hardware instance.
    fn add_instance(&self, inst: MstpInstanceId) -> SdkResult<()>;

    /// Deletes a hardware instance. Fails while VLANs are mapped to it.
    fn delete_instance(&self, inst: MstpInstanceId) -> SdkResult<()>;

    /// Number of VLANs mapped to an instance.
    fn instance_vlan_count(&self, inst: MstpInstanceId) -> SdkResult<u32>;

    /// VLANs mapped to an instance, in ascending order.
    fn instance_vlans(&self, inst: MstpInstanceId) -> SdkResult<Vec<VlanId>>;

    /// Maps VLANs to an instance, moving them off any other instance.
    fn add_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()>;

    /// Unmaps VLANs from an instance.
    fn remove_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()>;

    /// Reads the forwarding state of a port in an instance.
    fn port_state(&self, inst: MstpInstanceId, port: LogicalPortId) -> SdkResult<HwPortState>;

    /// Programs the forwarding state of a port in an instance.
    fn set_port_state(
        &self,
        inst: MstpInstanceId,
        port: LogicalPortId,
        state: HwPortState,
    ) -> SdkResult<()>;

    /// Sets the verbosity of the SDK MSTP module.
    fn set_log_verbosity(&self, level: SdkVerbosity) -> SdkResult<()>;
}

#[derive(Debug, Default)]
struct SoftMstpInner {
    mode: MstpMode,
    verbosity: SdkVerbosity,
    instances: BTreeMap<MstpInstanceId, Vec<VlanId>>,
    port_states: HashMap<(MstpInstanceId, LogicalPortId), HwPortState>,
    faults: HashMap<MstpOp, SxStatus>,
}

impl SoftMstpInner {
    fn check_fault(&mut self, op: MstpOp) -> SdkResult<()> {
        match self.faults.remove(&op) {
            Some(status) => Err(SdkError::new(op, status)),
            None => Ok(()),
        }
    }

    fn vlans_of(&self, op: MstpOp, inst: MstpInstanceId) -> SdkResult<&Vec<VlanId>> {
        self.instances
            .get(&inst)
            .ok_or(SdkError::new(op, SxStatus::EntryNotFound))
    }
}

/// In-memory MSTP model.
///
/// Ports that were never programmed read back as discarding.
#[derive(Debug, Default)]
pub struct SoftMstp {
    inner: Mutex<SoftMstpInner>,
}

impl SoftMstp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `op` fail with `status`.
    pub fn fail_next(&self, op: MstpOp, status: SxStatus) {
        self.inner.lock().faults.insert(op, status);
    }

    pub fn has_instance(&self, inst: MstpInstanceId) -> bool {
        self.inner.lock().instances.contains_key(&inst)
    }

    pub fn instance_count(&self) -> usize {
        self.inner.lock().instances.len()
    }

    pub fn mode(&self) -> MstpMode {
        self.inner.lock().mode
    }

    pub fn verbosity(&self) -> SdkVerbosity {
        self.inner.lock().verbosity
    }

    /// Overrides a port state without fault checks, e.g. to simulate a
    /// state the STP layer does not handle.
    pub fn force_port_state(&self, inst: MstpInstanceId, port: LogicalPortId, state: HwPortState) {
        self.inner.lock().port_states.insert((inst, port), state);
    }
}

impl MstpSdk for SoftMstp {
    fn set_mode(&self, mode: MstpMode) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::ModeSet)?;
        inner.mode = mode;
        debug!("soft mstp: mode {:?}", mode);
        Ok(())
    }

    fn add_instance(&self, inst: MstpInstanceId) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::InstanceAdd)?;
        if inner.instances.contains_key(&inst) {
            return Err(SdkError::new(MstpOp::InstanceAdd, SxStatus::EntryAlreadyExists));
        }
        inner.instances.insert(inst, Vec::new());
        debug!("soft mstp: added instance {}", inst);
        Ok(())
    }

    fn delete_instance(&self, inst: MstpInstanceId) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::InstanceDelete)?;
        if !inner.vlans_of(MstpOp::InstanceDelete, inst)?.is_empty() {
            return Err(SdkError::new(MstpOp::InstanceDelete, SxStatus::ResourceInUse));
        }
        inner.instances.remove(&inst);
        inner.port_states.retain(|(i, _), _| *i != inst);
        debug!("soft mstp: deleted instance {}", inst);
        Ok(())
    }

    fn instance_vlan_count(&self, inst: MstpInstanceId) -> SdkResult<u32> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::VlanListGet)?;
        let count = inner.vlans_of(MstpOp::VlanListGet, inst)?.len();
        u32::try_from(count).map_err(|_| SdkError::new(MstpOp::VlanListGet, SxStatus::Error))
    }

    fn instance_vlans(&self, inst: MstpInstanceId) -> SdkResult<Vec<VlanId>> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::VlanListGet)?;
        Ok(inner.vlans_of(MstpOp::VlanListGet, inst)?.clone())
    }

    fn add_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::VlanListAdd)?;
        inner.vlans_of(MstpOp::VlanListAdd, inst)?;

        for list in inner.instances.values_mut() {
            list.retain(|vid| !vlans.contains(vid));
        }
        if let Some(list) = inner.instances.get_mut(&inst) {
            list.extend_from_slice(vlans);
            list.sort_unstable();
            list.dedup();
        }
        Ok(())
    }

    fn remove_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::VlanListDelete)?;
        inner.vlans_of(MstpOp::VlanListDelete, inst)?;
        if let Some(list) = inner.instances.get_mut(&inst) {
            list.retain(|vid| !vlans.contains(vid));
        }
        Ok(())
    }

    fn port_state(&self, inst: MstpInstanceId, port: LogicalPortId) -> SdkResult<HwPortState> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::PortStateGet)?;
        inner.vlans_of(MstpOp::PortStateGet, inst)?;
        Ok(inner
            .port_states
            .get(&(inst, port))
            .copied()
            .unwrap_or(HwPortState::DISCARDING))
    }

    fn set_port_state(
        &self,
        inst: MstpInstanceId,
        port: LogicalPortId,
        state: HwPortState,
    ) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::PortStateSet)?;
        inner.vlans_of(MstpOp::PortStateSet, inst)?;
        inner.port_states.insert((inst, port), state);
        Ok(())
    }

    fn set_log_verbosity(&self, level: SdkVerbosity) -> SdkResult<()> {
        let mut inner = self.inner.lock();
        inner.check_fault(MstpOp::LogVerbositySet)?;
        inner.verbosity = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inst(id: u16) -> MstpInstanceId {
        MstpInstanceId::new(id)
    }

    fn vlan(id: u16) -> VlanId {
        VlanId::new(id).unwrap()
    }

    #[test]
    fn test_instance_add_delete() {
        let sdk = SoftMstp::new();
        sdk.add_instance(inst(1)).unwrap();
        assert_eq!(
            sdk.add_instance(inst(1)),
            Err(SdkError::new(MstpOp::InstanceAdd, SxStatus::EntryAlreadyExists))
        );
        sdk.delete_instance(inst(1)).unwrap();
        assert!(!sdk.has_instance(inst(1)));
        assert_eq!(
            sdk.delete_instance(inst(1)),
            Err(SdkError::new(MstpOp::InstanceDelete, SxStatus::EntryNotFound))
        );
    }

    #[test]
    fn test_vlans_move_between_instances() {
        let sdk = SoftMstp::new();
        sdk.add_instance(inst(1)).unwrap();
        sdk.add_instance(inst(2)).unwrap();

        sdk.add_instance_vlans(inst(1), &[vlan(20), vlan(10)]).unwrap();
        assert_eq!(sdk.instance_vlans(inst(1)).unwrap(), vec![vlan(10), vlan(20)]);

        sdk.add_instance_vlans(inst(2), &[vlan(10)]).unwrap();
        assert_eq!(sdk.instance_vlans(inst(1)).unwrap(), vec![vlan(20)]);
        assert_eq!(sdk.instance_vlan_count(inst(2)).unwrap(), 1);

        assert_eq!(
            sdk.delete_instance(inst(2)),
            Err(SdkError::new(MstpOp::InstanceDelete, SxStatus::ResourceInUse))
        );
        sdk.remove_instance_vlans(inst(2), &[vlan(10)]).unwrap();
        sdk.delete_instance(inst(2)).unwrap();
    }

    #[test]
    fn test_port_state_defaults_to_discarding() {
        let sdk = SoftMstp::new();
        let port = LogicalPortId::new(0x10100);
        sdk.add_instance(inst(3)).unwrap();
        assert_eq!(sdk.port_state(inst(3), port).unwrap(), HwPortState::DISCARDING);

        sdk.set_port_state(inst(3), port, HwPortState::FORWARDING).unwrap();
        assert_eq!(sdk.port_state(inst(3), port).unwrap(), HwPortState::FORWARDING);
    }

    #[test]
    fn test_fault_is_one_shot() {
        let sdk = SoftMstp::new();
        sdk.fail_next(MstpOp::InstanceAdd, SxStatus::NoResources);
        assert_eq!(
            sdk.add_instance(inst(1)),
            Err(SdkError::new(MstpOp::InstanceAdd, SxStatus::NoResources))
        );
        sdk.add_instance(inst(1)).unwrap();
    }

    #[test]
    fn test_sdk_error_translation() {
        let status = |s| SaiError::from(SdkError::new(MstpOp::InstanceAdd, s)).status();
        assert_eq!(status(SxStatus::EntryNotFound), SaiStatus::ItemNotFound);
        assert_eq!(status(SxStatus::EntryAlreadyExists), SaiStatus::ItemAlreadyExists);
        assert_eq!(status(SxStatus::ResourceInUse), SaiStatus::ObjectInUse);
        assert_eq!(status(SxStatus::ParamError), SaiStatus::InvalidParameter);
        assert_eq!(status(SxStatus::NoResources), SaiStatus::InsufficientResources);
        assert_eq!(status(SxStatus::Unsupported), SaiStatus::NotSupported);
        assert_eq!(status(SxStatus::Error), SaiStatus::Failure);
    }
}
