//! SAI (Switch Abstraction Interface) building blocks.
//!
//! This crate provides the pieces shared by SAI object implementations:
//!
//! - [`error`]: `sai_status_t` codes and the [`SaiError`] type every
//!   operation returns
//! - [`types`]: type-safe object IDs and the object-id codec
//! - [`attr`]: attribute schemas and validate/get/set dispatch
//! - [`api`]: switch SDK collaborators (MSTP)
//!
//! # Example
//!
//! ```
//! use sonic_sai::{ObjectKey, SaiStatus, StpOid, StpPortOid};
//!
//! let stp = StpOid::encode(ObjectKey::data(2)).unwrap();
//! let err = StpPortOid::try_from_raw(stp.as_raw()).unwrap_err();
//! assert_eq!(err.status(), SaiStatus::InvalidParameter);
//! ```

pub mod api;
pub mod attr;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use types::{
    ObjectKey, PortKind, PortOid, RawSaiObjectId, SaiObjectId, SaiObjectKind, SaiObjectType,
    StpKind, StpOid, StpPortKind, StpPortOid,
};

pub use error::{status_of, SaiError, SaiResult, SaiStatus};
