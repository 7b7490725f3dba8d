//! The STP API handed to the switch stack.
//!
//! [`StpApi`] bundles the shared store, the MSTP SDK and the module
//! configuration. Its operations are spread over the modules that implement
//! them:
//!
//! | Operation | Module |
//! |-----------|--------|
//! | `initialize` | `init` |
//! | `create_stp`, `remove_stp`, `set/get_stp_attribute` | `instance` |
//! | `create_stp_port`, `remove_stp_port`, `set/get_stp_port_attribute`, `create/remove_stp_ports` | `port` |
//! | `bind_vlan`, `unbind_vlan`, `add/remove_vlan_member` | `vlan` |
//! | `set_log_level`, `default_stp` | here |

use crate::audit::{AuditCategory, AuditRecord};
use crate::config::{ConfigError, StpConfig};
use crate::db::SaiDb;
use crate::logging::{self, LogLevel, SOURCE};
use crate::oid;
use sonic_sai::api::mstp::{MstpInstanceId, MstpSdk};
use sonic_sai::{SaiError, SaiResult, StpOid};
use std::sync::Arc;

/// STP operations over one store and one SDK handle.
pub struct StpApi {
    pub(crate) config: StpConfig,
    pub(crate) db: Arc<SaiDb>,
    pub(crate) sdk: Arc<dyn MstpSdk>,
}

impl StpApi {
    /// Validates `config` and creates an API with a fresh store.
    pub fn new(config: StpConfig, sdk: Arc<dyn MstpSdk>) -> Result<Self, ConfigError> {
        config.validate()?;
        let db = Arc::new(SaiDb::new(&config));
        Ok(Self { config, db, sdk })
    }

    /// Creates an API over an existing store.
    ///
    /// The store must have been created from the same configuration.
    pub fn with_store(
        config: StpConfig,
        db: Arc<SaiDb>,
        sdk: Arc<dyn MstpSdk>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, db, sdk })
    }

    pub fn config(&self) -> &StpConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SaiDb> {
        &self.db
    }

    /// Sets the module verbosity and forwards it to the SDK MSTP module.
    pub fn set_log_level(&self, level: LogLevel) -> SaiResult<()> {
        let previous = logging::verbosity();
        logging::set_verbosity(level);

        let result = self
            .sdk
            .set_log_verbosity(level.to_sdk())
            .map_err(SaiError::from);
        audit_log!(log_level_record(previous, level, &result));
        result
    }

    /// Default instance id.
    ///
    /// # Errors
    ///
    /// `Uninitialized` before [`StpApi::initialize`] succeeded.
    pub fn default_stp(&self) -> SaiResult<MstpInstanceId> {
        self.db.read().stp.default_stp()
    }

    /// Handle of the default instance.
    pub fn default_stp_oid(&self) -> SaiResult<StpOid> {
        oid::encode_instance(self.default_stp()?)
    }
}

fn log_level_record(previous: LogLevel, level: LogLevel, result: &SaiResult<()>) -> AuditRecord {
    let record = AuditRecord::new(AuditCategory::ConfigurationChange, SOURCE, "set_log_level")
        .with_object_type("log_level")
        .with_details(serde_json::json!({
            "previous": previous.as_str(),
            "level": level.as_str(),
        }));
    match result {
        Ok(()) => record,
        Err(e) => record.with_error(e.to_string()),
    }
}
