//! SDK logical port identifiers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical port number as assigned by the switch SDK.
///
/// This is the value carried inside port object IDs and passed to SDK
/// calls that operate on a single port. It is conventionally written in hex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogicalPortId(u32);

impl LogicalPortId {
    /// Creates a logical port ID from its raw SDK value.
    pub const fn new(raw: u32) -> Self {
        LogicalPortId(raw)
    }

    /// Returns the raw SDK value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LogicalPortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl FromStr for LogicalPortId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse::<u32>(),
        };

        parsed
            .map(LogicalPortId)
            .map_err(|_| ParseError::InvalidLogicalPort(s.to_string()))
    }
}

impl From<u32> for LogicalPortId {
    fn from(raw: u32) -> Self {
        LogicalPortId(raw)
    }
}

impl From<LogicalPortId> for u32 {
    fn from(port: LogicalPortId) -> u32 {
        port.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_is_hex() {
        assert_eq!(LogicalPortId::new(0x10100).to_string(), "0x10100");
    }

    #[test]
    fn test_parse() {
        assert_eq!("0x10100".parse::<LogicalPortId>().unwrap().as_u32(), 0x10100);
        assert_eq!("256".parse::<LogicalPortId>().unwrap().as_u32(), 256);
        assert!(matches!(
            "Ethernet0".parse::<LogicalPortId>(),
            Err(ParseError::InvalidLogicalPort(_))
        ));
    }
}
