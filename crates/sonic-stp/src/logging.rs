//! Module verbosity and logging macros.
//!
//! Records go through `tracing`. On top of the subscriber filter, the STP
//! module keeps its own verbosity (default [`LogLevel::Warning`]) that can
//! be changed at runtime through `StpApi::set_log_level`; the `stp_*!`
//! macros drop records above it.

use serde::{Deserialize, Serialize};
use sonic_sai::api::mstp::SdkVerbosity;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Value of the `source` field on every record of this module.
pub const SOURCE: &str = "SaiStp";

/// Module verbosity, ordered from quietest to most verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    None = 0,
    Error = 1,
    #[default]
    Warning = 2,
    Notice = 3,
    Info = 4,
    Debug = 5,
}

impl LogLevel {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::None,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            3 => LogLevel::Notice,
            4 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// SDK verbosity with the same meaning.
    pub fn to_sdk(self) -> SdkVerbosity {
        match self {
            LogLevel::None => SdkVerbosity::None,
            LogLevel::Error => SdkVerbosity::Error,
            LogLevel::Warning => SdkVerbosity::Warning,
            LogLevel::Notice => SdkVerbosity::Notice,
            LogLevel::Info => SdkVerbosity::Info,
            LogLevel::Debug => SdkVerbosity::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::None => "none",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Notice => "notice",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(LogLevel::None),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "notice" => Ok(LogLevel::Notice),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(LogLevel::Warning as u8);

/// Current module verbosity.
pub fn verbosity() -> LogLevel {
    LogLevel::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

/// Replaces the module verbosity.
pub fn set_verbosity(level: LogLevel) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns true if records at `level` pass the module verbosity.
pub fn enabled(level: LogLevel) -> bool {
    level != LogLevel::None && level <= verbosity()
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, or `filter` when it is
/// unset. A subscriber that is already installed is kept.
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

#[macro_export]
macro_rules! stp_debug {
    ($($arg:tt)*) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Debug) {
            tracing::debug!(source = $crate::logging::SOURCE, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! stp_info {
    ($($arg:tt)*) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Info) {
            tracing::info!(source = $crate::logging::SOURCE, $($arg)*);
        }
    };
}

/// Normal but significant events. `tracing` has no notice level, so these
/// are info records tagged `severity = "notice"`.
#[macro_export]
macro_rules! stp_notice {
    ($($arg:tt)*) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Notice) {
            tracing::info!(source = $crate::logging::SOURCE, severity = "notice", $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! stp_warn {
    ($($arg:tt)*) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Warning) {
            tracing::warn!(source = $crate::logging::SOURCE, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! stp_error {
    ($($arg:tt)*) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Error) {
            tracing::error!(source = $crate::logging::SOURCE, $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_order() {
        assert!(LogLevel::None < LogLevel::Error);
        assert!(LogLevel::Warning < LogLevel::Notice);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("NOTICE".parse::<LogLevel>().unwrap(), LogLevel::Notice);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_raw_roundtrip() {
        for level in [
            LogLevel::None,
            LogLevel::Error,
            LogLevel::Warning,
            LogLevel::Notice,
            LogLevel::Info,
            LogLevel::Debug,
        ] {
            assert_eq!(LogLevel::from_u8(level as u8), level);
        }
    }

    #[test]
    fn test_sdk_mapping() {
        assert_eq!(LogLevel::None.to_sdk(), SdkVerbosity::None);
        assert_eq!(LogLevel::Notice.to_sdk(), SdkVerbosity::Notice);
        assert_eq!(LogLevel::Debug.to_sdk(), SdkVerbosity::Debug);
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("warn");
        init_tracing("debug");
    }
}
