//! STP port state translation.
//!
//! | SAI state  | hardware state |
//! |------------|----------------|
//! | LEARNING   | LEARNING       |
//! | FORWARDING | FORWARDING     |
//! | BLOCKING   | DISCARDING     |
//!
//! Any other hardware state is reported as an error, never mapped to a
//! guessed SAI state.

use sonic_sai::api::mstp::HwPortState;
use sonic_sai::{SaiError, SaiResult};
use std::fmt;

/// SAI STP port state (`sai_stp_port_state_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StpPortState {
    Learning = 0,
    Forwarding = 1,
    Blocking = 2,
}

impl StpPortState {
    /// Validates a raw attribute value.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for anything but the three SAI states.
    pub fn validate(raw: i32) -> SaiResult<Self> {
        match raw {
            0 => Ok(StpPortState::Learning),
            1 => Ok(StpPortState::Forwarding),
            2 => Ok(StpPortState::Blocking),
            _ => {
                stp_error!("Invalid port state passed: {}", raw);
                Err(SaiError::invalid_parameter(format!(
                    "invalid STP port state {}",
                    raw
                )))
            }
        }
    }

    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn to_hardware(self) -> HwPortState {
        match self {
            StpPortState::Learning => HwPortState::LEARNING,
            StpPortState::Forwarding => HwPortState::FORWARDING,
            StpPortState::Blocking => HwPortState::DISCARDING,
        }
    }

    /// # Errors
    ///
    /// `InvalidParameter` for hardware states with no SAI equivalent.
    pub fn from_hardware(state: HwPortState) -> SaiResult<Self> {
        match state {
            HwPortState::LEARNING => Ok(StpPortState::Learning),
            HwPortState::FORWARDING => Ok(StpPortState::Forwarding),
            HwPortState::DISCARDING => Ok(StpPortState::Blocking),
            other => {
                stp_error!("Invalid port state - {}", other.as_raw());
                Err(SaiError::invalid_parameter(format!(
                    "unsupported hardware port state {}",
                    other
                )))
            }
        }
    }
}

impl fmt::Display for StpPortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StpPortState::Learning => "SAI_STP_PORT_STATE_LEARNING",
            StpPortState::Forwarding => "SAI_STP_PORT_STATE_FORWARDING",
            StpPortState::Blocking => "SAI_STP_PORT_STATE_BLOCKING",
        };
        write!(f, "{}", s)
    }
}
