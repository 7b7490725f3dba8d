//! Module verbosity. These tests change process-wide state.

mod common;

use pretty_assertions::assert_eq;
use serial_test::serial;
use sonic_sai::api::mstp::{MstpOp, SdkVerbosity, SoftMstp, SxStatus};
use sonic_stp::logging;
use sonic_stp::{LogLevel, StpApi, StpConfig};
use std::sync::Arc;

#[test]
#[serial]
fn test_set_log_level_reaches_sdk() {
    let (api, sdk) = common::setup(4);

    api.set_log_level(LogLevel::Debug).unwrap();
    assert_eq!(logging::verbosity(), LogLevel::Debug);
    assert_eq!(sdk.verbosity(), LogLevel::Debug.to_sdk());
    assert!(logging::enabled(LogLevel::Info));

    api.set_log_level(LogLevel::Error).unwrap();
    assert_eq!(logging::verbosity(), LogLevel::Error);
    assert_eq!(sdk.verbosity(), SdkVerbosity::Error);
    assert!(!logging::enabled(LogLevel::Warning));

    api.set_log_level(LogLevel::Warning).unwrap();
}

#[test]
#[serial]
fn test_sdk_rejection_is_reported() {
    let (api, sdk) = common::setup(4);
    sdk.fail_next(MstpOp::LogVerbositySet, SxStatus::ParamError);
    assert!(api.set_log_level(LogLevel::Info).is_err());
    api.set_log_level(LogLevel::Warning).unwrap();
}

#[test]
#[serial]
fn test_initialize_applies_configured_level() {
    let config = StpConfig {
        log_level: LogLevel::Notice,
        ..StpConfig::default()
    };
    let api = StpApi::new(config, Arc::new(SoftMstp::new())).unwrap();
    api.initialize().unwrap();
    assert_eq!(logging::verbosity(), LogLevel::Notice);

    logging::set_verbosity(LogLevel::Warning);
}
