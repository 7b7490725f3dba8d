//! Shared SAI store.
//!
//! One reader/writer lock guards the instance table, the default instance
//! id and the VLAN binding table. The store is handed to `StpApi` as an
//! `Arc`, so several APIs (or tests) can share one store, or use isolated
//! ones.

use crate::alloc::InstanceTable;
use crate::config::StpConfig;
use crate::vlan::VlanDb;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use sonic_sai::api::mstp::MstpInstanceId;
use sonic_sai::{SaiError, SaiResult};

/// STP part of the store.
#[derive(Debug)]
pub struct StpDb {
    pub instances: InstanceTable,
    /// Set once initialization completes.
    pub default_id: Option<MstpInstanceId>,
}

impl StpDb {
    /// Default instance id, or `Uninitialized` before initialization.
    pub fn default_stp(&self) -> SaiResult<MstpInstanceId> {
        self.default_id.ok_or(SaiError::Uninitialized)
    }
}

/// Everything behind the store lock.
#[derive(Debug)]
pub struct SaiDbInner {
    pub stp: StpDb,
    pub vlans: VlanDb,
}

/// The shared store.
#[derive(Debug)]
pub struct SaiDb {
    inner: RwLock<SaiDbInner>,
}

impl SaiDb {
    /// Creates an uninitialized store sized by `config`.
    pub fn new(config: &StpConfig) -> Self {
        Self {
            inner: RwLock::new(SaiDbInner {
                stp: StpDb {
                    instances: InstanceTable::new(config.instance_id_min, config.instance_id_max),
                    default_id: None,
                },
                vlans: VlanDb::new(),
            }),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SaiDbInner> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SaiDbInner> {
        self.inner.write()
    }
}
