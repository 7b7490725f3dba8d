//! Concurrent callers sharing one store.

mod common;

use common::{instance_of, setup};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use sonic_sai::api::mstp::{
    HwPortState, MstpInstanceId, MstpMode, MstpSdk, SdkResult, SdkVerbosity, SoftMstp,
};
use sonic_sai::{SaiResult, SaiStatus, StpOid};
use sonic_stp::{StpApi, StpConfig};
use sonic_types::{LogicalPortId, VlanId};
use std::collections::HashSet;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_creates_get_distinct_ids() {
    let (api, _) = setup(64);
    let api = Arc::new(api);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                (0..8)
                    .filter_map(|_| api.create_stp(&[]).ok())
                    .map(|oid| instance_of(oid.as_raw()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "instance {} allocated twice", id);
        }
    }

    // 64 slots, one taken by the default instance.
    assert_eq!(ids.len(), 63);
    assert!(!ids.contains(&api.default_stp().unwrap()));
    assert_eq!(api.create_stp(&[]).unwrap_err().status(), SaiStatus::TableFull);
}

#[test]
fn test_readers_run_alongside_writers() {
    let (api, _) = setup(16);
    let api = Arc::new(api);
    let default_oid = api.default_stp_oid().unwrap().as_raw();

    let writer = {
        let api = Arc::clone(&api);
        thread::spawn(move || {
            for _ in 0..50 {
                let oid = api.create_stp(&[]).unwrap();
                api.remove_stp(oid.as_raw()).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_eq!(common::vlan_list(&api, default_oid, 4).unwrap(), vec![1]);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(api.store().read().stp.instances.used_count(), 1);
}

#[test]
fn test_apis_sharing_a_store_share_the_id_table() {
    let (first, sdk) = setup(3);
    let second = StpApi::with_store(
        first.config().clone(),
        Arc::clone(first.store()),
        sdk,
    )
    .unwrap();

    let a = first.create_stp(&[]).unwrap();
    let b = second.create_stp(&[]).unwrap();
    assert_ne!(instance_of(a.as_raw()), instance_of(b.as_raw()));
    assert_eq!(second.default_stp().unwrap(), first.default_stp().unwrap());
    assert_eq!(first.create_stp(&[]).unwrap_err().status(), SaiStatus::TableFull);

    second.remove_stp(a.as_raw()).unwrap();
    assert!(!first.store().read().stp.instances.is_used(instance_of(a.as_raw())));
}

type Hook = Box<dyn FnOnce() + Send>;

/// Software SDK that runs a hook once, from inside the next VLAN count
/// query.
struct HookedMstp {
    inner: Arc<SoftMstp>,
    on_vlan_count: Mutex<Option<Hook>>,
}

impl HookedMstp {
    fn new(inner: Arc<SoftMstp>) -> Self {
        Self {
            inner,
            on_vlan_count: Mutex::new(None),
        }
    }

    fn set_hook(&self, hook: Hook) {
        *self.on_vlan_count.lock() = Some(hook);
    }
}

impl MstpSdk for HookedMstp {
    fn set_mode(&self, mode: MstpMode) -> SdkResult<()> {
        self.inner.set_mode(mode)
    }

    fn add_instance(&self, inst: MstpInstanceId) -> SdkResult<()> {
        self.inner.add_instance(inst)
    }

    fn delete_instance(&self, inst: MstpInstanceId) -> SdkResult<()> {
        self.inner.delete_instance(inst)
    }

    fn instance_vlan_count(&self, inst: MstpInstanceId) -> SdkResult<u32> {
        let hook = self.on_vlan_count.lock().take();
        if let Some(hook) = hook {
            hook();
        }
        self.inner.instance_vlan_count(inst)
    }

    fn instance_vlans(&self, inst: MstpInstanceId) -> SdkResult<Vec<VlanId>> {
        self.inner.instance_vlans(inst)
    }

    fn add_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()> {
        self.inner.add_instance_vlans(inst, vlans)
    }

    fn remove_instance_vlans(&self, inst: MstpInstanceId, vlans: &[VlanId]) -> SdkResult<()> {
        self.inner.remove_instance_vlans(inst, vlans)
    }

    fn port_state(&self, inst: MstpInstanceId, port: LogicalPortId) -> SdkResult<HwPortState> {
        self.inner.port_state(inst, port)
    }

    fn set_port_state(
        &self,
        inst: MstpInstanceId,
        port: LogicalPortId,
        state: HwPortState,
    ) -> SdkResult<()> {
        self.inner.set_port_state(inst, port, state)
    }

    fn set_log_verbosity(&self, level: SdkVerbosity) -> SdkResult<()> {
        self.inner.set_log_verbosity(level)
    }
}

#[test]
fn test_overlapping_removes_cannot_destroy_a_recreated_instance() {
    let soft = Arc::new(SoftMstp::new());
    let hooked = Arc::new(HookedMstp::new(Arc::clone(&soft)));
    let config = StpConfig::with_instance_range(1, 4);

    let first = StpApi::new(config.clone(), hooked.clone()).unwrap();
    first.initialize().unwrap();
    let second = Arc::new(
        StpApi::with_store(config, Arc::clone(first.store()), soft.clone()).unwrap(),
    );
    let victim = first.create_stp(&[]).unwrap();

    // While the first remove sits in its VLAN count query, a second caller
    // removes the same handle and creates a new instance. Give it a bounded
    // window to finish before letting the first remove continue.
    let (done_tx, done_rx) = mpsc::channel();
    let other: Arc<Mutex<Option<thread::JoinHandle<(SaiResult<()>, SaiResult<StpOid>)>>>> =
        Arc::new(Mutex::new(None));
    {
        let second = Arc::clone(&second);
        let other = Arc::clone(&other);
        hooked.set_hook(Box::new(move || {
            let handle = thread::spawn(move || {
                let removed = second.remove_stp(victim.as_raw());
                let created = second.create_stp(&[]);
                let _ = done_tx.send(());
                (removed, created)
            });
            *other.lock() = Some(handle);
            let _ = done_rx.recv_timeout(Duration::from_millis(200));
        }));
    }

    first.remove_stp(victim.as_raw()).unwrap();

    let handle = other.lock().take().expect("hook ran");
    let (removed, created) = handle.join().unwrap();

    assert_eq!(removed.unwrap_err().status(), SaiStatus::ItemNotFound);
    let recreated = created.unwrap();
    assert_eq!(recreated, victim);

    let inst = instance_of(recreated.as_raw());
    assert!(soft.has_instance(inst));
    assert!(first.store().read().stp.instances.is_used(inst));
}
