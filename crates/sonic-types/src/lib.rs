//! Common SONiC types for the switch control plane.
//!
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`LogicalPortId`]: SDK logical port numbers

mod port;
mod vlan;

pub use port::LogicalPortId;
pub use vlan::{VlanId, VlanIdIter};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("invalid logical port: {0}")]
    InvalidLogicalPort(String),
}
