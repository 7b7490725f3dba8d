//! SAI error types and status handling.
//!
//! Every public SAI operation in this workspace returns [`SaiResult`]. The
//! error side always maps back to exactly one [`SaiStatus`], which is what
//! the switch stack above us ultimately consumes.

use std::fmt;
use thiserror::Error;

/// SAI status codes matching the SAI C API.
///
/// These values correspond to `sai_status_t` in the SAI header files.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaiStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    InvalidPortNumber = -9,
    InvalidPortMember = -10,
    InvalidVlanId = -11,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    AddrNotFound = -16,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    InvalidNvData = -20,
    NvStorageFull = -21,
    SwUpgradeVersionMismatch = -22,
    NotExecuted = -23,
    InvalidAttribute = 0x0001_0000,
    InvalidAttrValue = 0x0002_0000,
    AttrNotImplemented = 0x0003_0000,
    UnknownAttribute = 0x0004_0000,
    AttrNotSupported = 0x0005_0000,
}

impl SaiStatus {
    /// Creates a SaiStatus from a raw i32 value.
    ///
    /// Unknown codes collapse to [`SaiStatus::Failure`].
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => SaiStatus::Success,
            -2 => SaiStatus::NotSupported,
            -3 => SaiStatus::NoMemory,
            -4 => SaiStatus::InsufficientResources,
            -5 => SaiStatus::InvalidParameter,
            -6 => SaiStatus::ItemAlreadyExists,
            -7 => SaiStatus::ItemNotFound,
            -8 => SaiStatus::BufferOverflow,
            -9 => SaiStatus::InvalidPortNumber,
            -10 => SaiStatus::InvalidPortMember,
            -11 => SaiStatus::InvalidVlanId,
            -12 => SaiStatus::Uninitialized,
            -13 => SaiStatus::TableFull,
            -14 => SaiStatus::MandatoryAttributeMissing,
            -15 => SaiStatus::NotImplemented,
            -16 => SaiStatus::AddrNotFound,
            -17 => SaiStatus::ObjectInUse,
            -18 => SaiStatus::InvalidObjectType,
            -19 => SaiStatus::InvalidObjectId,
            -20 => SaiStatus::InvalidNvData,
            -21 => SaiStatus::NvStorageFull,
            -22 => SaiStatus::SwUpgradeVersionMismatch,
            -23 => SaiStatus::NotExecuted,
            0x0001_0000 => SaiStatus::InvalidAttribute,
            0x0002_0000 => SaiStatus::InvalidAttrValue,
            0x0003_0000 => SaiStatus::AttrNotImplemented,
            0x0004_0000 => SaiStatus::UnknownAttribute,
            0x0005_0000 => SaiStatus::AttrNotSupported,
            _ => SaiStatus::Failure,
        }
    }

    /// Returns the raw `sai_status_t` value.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> SaiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SaiError::from_status(self))
        }
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiStatus::Success => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::NotSupported => "SAI_STATUS_NOT_SUPPORTED",
            SaiStatus::NoMemory => "SAI_STATUS_NO_MEMORY",
            SaiStatus::InsufficientResources => "SAI_STATUS_INSUFFICIENT_RESOURCES",
            SaiStatus::InvalidParameter => "SAI_STATUS_INVALID_PARAMETER",
            SaiStatus::ItemAlreadyExists => "SAI_STATUS_ITEM_ALREADY_EXISTS",
            SaiStatus::ItemNotFound => "SAI_STATUS_ITEM_NOT_FOUND",
            SaiStatus::BufferOverflow => "SAI_STATUS_BUFFER_OVERFLOW",
            SaiStatus::InvalidPortNumber => "SAI_STATUS_INVALID_PORT_NUMBER",
            SaiStatus::InvalidPortMember => "SAI_STATUS_INVALID_PORT_MEMBER",
            SaiStatus::InvalidVlanId => "SAI_STATUS_INVALID_VLAN_ID",
            SaiStatus::Uninitialized => "SAI_STATUS_UNINITIALIZED",
            SaiStatus::TableFull => "SAI_STATUS_TABLE_FULL",
            SaiStatus::MandatoryAttributeMissing => "SAI_STATUS_MANDATORY_ATTRIBUTE_MISSING",
            SaiStatus::NotImplemented => "SAI_STATUS_NOT_IMPLEMENTED",
            SaiStatus::AddrNotFound => "SAI_STATUS_ADDR_NOT_FOUND",
            SaiStatus::ObjectInUse => "SAI_STATUS_OBJECT_IN_USE",
            SaiStatus::InvalidObjectType => "SAI_STATUS_INVALID_OBJECT_TYPE",
            SaiStatus::InvalidObjectId => "SAI_STATUS_INVALID_OBJECT_ID",
            SaiStatus::InvalidNvData => "SAI_STATUS_INVALID_NV_DATA",
            SaiStatus::NvStorageFull => "SAI_STATUS_NV_STORAGE_FULL",
            SaiStatus::SwUpgradeVersionMismatch => "SAI_STATUS_SW_UPGRADE_VERSION_MISMATCH",
            SaiStatus::NotExecuted => "SAI_STATUS_NOT_EXECUTED",
            SaiStatus::InvalidAttribute => "SAI_STATUS_INVALID_ATTRIBUTE_0",
            SaiStatus::InvalidAttrValue => "SAI_STATUS_INVALID_ATTR_VALUE_0",
            SaiStatus::AttrNotImplemented => "SAI_STATUS_ATTR_NOT_IMPLEMENTED_0",
            SaiStatus::UnknownAttribute => "SAI_STATUS_UNKNOWN_ATTRIBUTE_0",
            SaiStatus::AttrNotSupported => "SAI_STATUS_ATTR_NOT_SUPPORTED_0",
        };
        write!(f, "{}", s)
    }
}

/// Error type for SAI operations.
///
/// Each variant corresponds to one [`SaiStatus`], see [`SaiError::status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    /// A status with no more specific variant.
    #[error("SAI operation failed: {status}")]
    Status { status: SaiStatus },

    /// The operation is not supported for this object type.
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    /// The operation is intentionally not implemented.
    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    /// Invalid parameter passed to a SAI API.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The object ID is well formed but refers to an object that may not
    /// be operated on.
    #[error("Invalid object id: {message}")]
    InvalidObjectId { message: String },

    /// Attribute is unknown, duplicated, or not valid for the operation.
    #[error("Invalid attribute {attr}: {message}")]
    InvalidAttribute { attr: String, message: String },

    /// Attribute value has the wrong type.
    #[error("Invalid value for attribute {attr}")]
    InvalidAttrValue { attr: String },

    /// A mandatory-on-create attribute was not passed.
    #[error("Mandatory attribute missing: {attr}")]
    MandatoryAttributeMissing { attr: String },

    /// The requested item was not found.
    #[error("Item not found: {item}")]
    NotFound { item: String },

    /// The item already exists.
    #[error("Item already exists: {item}")]
    AlreadyExists { item: String },

    /// A bounded table has no free slot.
    #[error("Table full: {table}")]
    TableFull { table: String },

    /// Object is in use and cannot be removed.
    #[error("Object in use: {object}")]
    ObjectInUse { object: String },

    /// Caller supplied list is too small; nothing was written.
    #[error("Buffer overflow: {required} entries required")]
    BufferOverflow { required: u32 },

    /// SAI context is not initialized.
    #[error("SAI not initialized")]
    Uninitialized,
}

impl SaiError {
    /// Creates an error from a SAI status code.
    pub fn from_status(status: SaiStatus) -> Self {
        match status {
            SaiStatus::Uninitialized => SaiError::Uninitialized,
            _ => SaiError::Status { status },
        }
    }

    /// Returns the SAI status this error is reported as.
    pub fn status(&self) -> SaiStatus {
        match self {
            SaiError::Status { status } => *status,
            SaiError::NotSupported { .. } => SaiStatus::NotSupported,
            SaiError::NotImplemented { .. } => SaiStatus::NotImplemented,
            SaiError::InvalidParameter { .. } => SaiStatus::InvalidParameter,
            SaiError::InvalidObjectId { .. } => SaiStatus::InvalidObjectId,
            SaiError::InvalidAttribute { .. } => SaiStatus::InvalidAttribute,
            SaiError::InvalidAttrValue { .. } => SaiStatus::InvalidAttrValue,
            SaiError::MandatoryAttributeMissing { .. } => SaiStatus::MandatoryAttributeMissing,
            SaiError::NotFound { .. } => SaiStatus::ItemNotFound,
            SaiError::AlreadyExists { .. } => SaiStatus::ItemAlreadyExists,
            SaiError::TableFull { .. } => SaiStatus::TableFull,
            SaiError::ObjectInUse { .. } => SaiStatus::ObjectInUse,
            SaiError::BufferOverflow { .. } => SaiStatus::BufferOverflow,
            SaiError::Uninitialized => SaiStatus::Uninitialized,
        }
    }

    /// Creates a not supported error with a feature description.
    pub fn not_supported(feature: impl Into<String>) -> Self {
        SaiError::NotSupported {
            feature: feature.into(),
        }
    }

    /// Creates a not implemented error with a feature description.
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        SaiError::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Creates an invalid parameter error with a message.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        SaiError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates an invalid object id error with a message.
    pub fn invalid_object_id(message: impl Into<String>) -> Self {
        SaiError::InvalidObjectId {
            message: message.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attribute(attr: impl Into<String>, message: impl Into<String>) -> Self {
        SaiError::InvalidAttribute {
            attr: attr.into(),
            message: message.into(),
        }
    }

    /// Creates a table full error.
    pub fn table_full(table: impl Into<String>) -> Self {
        SaiError::TableFull {
            table: table.into(),
        }
    }

    /// Creates an object in use error.
    pub fn object_in_use(object: impl Into<String>) -> Self {
        SaiError::ObjectInUse {
            object: object.into(),
        }
    }
}

impl From<SaiError> for SaiStatus {
    fn from(err: SaiError) -> Self {
        err.status()
    }
}

/// Result type for SAI operations.
pub type SaiResult<T> = Result<T, SaiError>;

/// Collapses a [`SaiResult`] into the status code reported to C callers.
pub fn status_of<T>(result: &SaiResult<T>) -> SaiStatus {
    match result {
        Ok(_) => SaiStatus::Success,
        Err(e) => e.status(),
    }
}
