//! VLAN ID type with validation.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// IEEE 802.1Q VLAN identifier (1-4094).
///
/// VLAN 0 (priority tagged) and VLAN 4095 are reserved.
///
/// # Examples
///
/// ```
/// use sonic_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.as_u16(), 100);
///
/// assert!(VlanId::new(0).is_err());
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID.
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID.
    pub const MAX: u16 = 4094;

    /// Number of VLAN IDs in the valid range.
    pub const COUNT: usize = (Self::MAX - Self::MIN + 1) as usize;

    /// Default VLAN ID (VLAN 1).
    pub const DEFAULT: VlanId = VlanId(1);

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the VLAN ID is not in the valid range (1-4094).
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if id >= Self::MIN && id <= Self::MAX {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is the default VLAN (VLAN 1).
    pub const fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT.0
    }

    /// Zero-based position of this VLAN in the valid range.
    ///
    /// Used by tables that keep one slot per VLAN.
    pub const fn index(&self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    /// Iterates over every valid VLAN ID in ascending order.
    pub fn all() -> VlanIdIter {
        VlanIdIter {
            inner: Self::MIN..=Self::MAX,
        }
    }
}

/// Iterator over the whole VLAN ID space, see [`VlanId::all`].
#[derive(Debug, Clone)]
pub struct VlanIdIter {
    inner: RangeInclusive<u16>,
}

impl Iterator for VlanIdIter {
    type Item = VlanId;

    fn next(&mut self) -> Option<VlanId> {
        self.inner.next().map(VlanId)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for VlanIdIter {}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "Vlan100" as written in CONFIG_DB keys
        let digits = match s.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("vlan") => &s[4..],
            _ => s,
        };

        let id: u16 = digits.parse().map_err(|_| ParseError::InvalidVlanId(0))?;
        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}
