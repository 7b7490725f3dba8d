//! SAI STP: spanning tree instances and STP ports over the MSTP SDK.
//!
//! [`StpApi`] implements the SAI STP API for one switch:
//!
//! - STP instances: ids come from a fixed range, the default instance is
//!   created at initialization and cannot be removed, and an instance with
//!   VLANs bound to it cannot be removed either
//! - STP ports: a handle carrying (instance, logical port); creating one
//!   programs the port state in hardware, nothing else is stored
//! - the instance port list, derived on demand from the VLANs bound to the
//!   instance and their member ports
//!
//! All state lives in one [`SaiDb`] behind a reader/writer lock.
//!
//! # Example
//!
//! ```
//! use sonic_sai::api::mstp::SoftMstp;
//! use sonic_stp::{StpApi, StpConfig};
//! use std::sync::Arc;
//!
//! let api = StpApi::new(StpConfig::default(), Arc::new(SoftMstp::new())).unwrap();
//! api.initialize().unwrap();
//!
//! let stp = api.create_stp(&[]).unwrap();
//! api.remove_stp(stp.as_raw()).unwrap();
//! ```

#[macro_use]
pub mod logging;
#[macro_use]
pub mod audit;

pub mod alloc;
pub mod api;
pub mod config;
pub mod db;
mod init;
pub mod instance;
pub mod oid;
pub mod port;
pub mod state;
pub mod vlan;

pub use api::StpApi;
pub use config::{ConfigError, StpConfig};
pub use db::SaiDb;
pub use instance::{STP_ATTR_PORT_LIST, STP_ATTR_VLAN_LIST};
pub use logging::LogLevel;
pub use port::{STP_PORT_ATTR_PORT, STP_PORT_ATTR_STATE, STP_PORT_ATTR_STP};
pub use state::StpPortState;
