//! Switch SDK collaborators consumed by the SAI layer.
//!
//! - [`mstp`]: MSTP instances, VLAN mapping and per-port forwarding state

pub mod mstp;

pub use mstp::{MstpSdk, SoftMstp};
