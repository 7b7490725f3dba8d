//! STP module initialization, run once while the switch starts.

use crate::api::StpApi;
use crate::audit::{AuditCategory, AuditRecord};
use crate::db::SaiDbInner;
use crate::logging::{self, SOURCE};
use crate::vlan;
use sonic_sai::api::mstp::{MstpInstanceId, MstpMode, MstpSdk};
use sonic_sai::{SaiError, SaiResult};

/// Undoes a half-built default instance. Only the slot release is required;
/// a failed hardware delete is logged.
fn release_default(db: &mut SaiDbInner, sdk: &dyn MstpSdk, inst: MstpInstanceId) {
    if let Err(e) = sdk.delete_instance(inst) {
        stp_warn!("Failed to delete default STP [{}] after init failure: {}", inst, e);
    }
    db.stp.instances.free(inst);
}

impl StpApi {
    /// Puts the SDK in MSTP mode, creates the default instance and binds
    /// the default VLAN to it. Every other VLAN starts unbound.
    ///
    /// Runs under the store write lock, so of two concurrent calls exactly
    /// one creates the default instance. Any failure aborts initialization
    /// and leaves the module uninitialized.
    pub fn initialize(&self) -> SaiResult<()> {
        logging::set_verbosity(self.config.log_level);

        let mut db = self.db.write();
        if db.stp.default_id.is_some() {
            stp_error!("STP module already initialized");
            return Err(SaiError::AlreadyExists {
                item: "default STP instance".to_string(),
            });
        }

        self.sdk.set_mode(MstpMode::Mstp).inspect_err(|e| {
            stp_error!("{}", e);
        })?;

        stp_debug!("Generating default STP id");
        let inst = db.stp.instances.allocate().inspect_err(|_| {
            stp_error!("Failed to generate default STP id");
        })?;
        stp_debug!("Default STP id = {}", inst);

        if let Err(e) = self.sdk.add_instance(inst) {
            stp_error!("{}", e);
            db.stp.instances.free(inst);
            return Err(e.into());
        }

        db.vlans.reset_bindings();

        let default_vlan = self.config.default_vlan;
        if let Err(e) = vlan::bind_locked(&mut db, self.sdk.as_ref(), default_vlan, inst) {
            stp_error!("Failed to add VLAN {} to default STP", default_vlan);
            release_default(&mut db, self.sdk.as_ref(), inst);
            return Err(e);
        }

        db.stp.default_id = Some(inst);
        drop(db);

        audit_log!(AuditRecord::new(AuditCategory::SystemLifecycle, SOURCE, "stp_initialize")
            .with_object_id(format!("stp_{}", inst))
            .with_object_type("stp_instance")
            .with_details(serde_json::json!({
                "default_instance": inst.as_u16(),
                "default_vlan": default_vlan.as_u16(),
            })));

        Ok(())
    }
}
