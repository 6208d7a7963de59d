use std::fs;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use shard_sidecar::Error;
use shard_sidecar::JobTargets;
use shard_sidecar::StoreConfig;
use shard_sidecar::TargetState;

use crate::common::gauge_value;
use crate::common::jobs;
use crate::common::start_manager;
use crate::common::target;

#[test]
fn targets_and_idle_window_survive_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store_dir = temp_dir.path().join("shard-0");

    let (manager, _) = start_manager(&store_dir);
    let idle_at = manager.current_snapshot().idle_at;
    assert!(idle_at.is_some());
    drop(manager);

    // An idle shard keeps its original idle stamp across restarts
    let (manager, _) = start_manager(&store_dir);
    assert_eq!(manager.current_snapshot().idle_at, idle_at);

    let desired = jobs(vec![
        (
            "node",
            vec![
                target(1, 100, TargetState::Normal),
                target(2, 200, TargetState::InTransfer),
            ],
        ),
        ("kube-state", vec![target(3, 3000, TargetState::Normal)]),
    ]);
    manager.update(desired.clone()).unwrap();
    drop(manager);

    let (manager, registry) = start_manager(&store_dir);
    let snapshot = manager.current_snapshot();
    assert_eq!(snapshot.targets, desired);
    assert_eq!(snapshot.idle_at, None);
    assert_eq!(snapshot.status[&2].state, TargetState::InTransfer);
    assert_eq!(snapshot.status[&3].series, 3000);
    assert_eq!(
        gauge_value(&registry, "kvass_sidecar_targets_total"),
        Some(3.0)
    );
}

#[test]
fn legacy_targets_file_is_migrated_on_first_start() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::with_store_dir(temp_dir.path());
    fs::write(
        config.legacy_store_path(),
        r#"{
            "node": [
                {"hash": 11, "labels": {"__address__": "node-11:9100"}, "series": 5, "totalSeries": 8, "state": ""}
            ],
            "empty": null
        }"#,
    )
    .unwrap();

    let (manager, _) = start_manager(temp_dir.path());

    let snapshot = manager.current_snapshot();
    assert_eq!(snapshot.targets["node"][0].total_series, 8);
    assert!(snapshot.targets["empty"].is_empty());
    assert_eq!(snapshot.status[&11].series, 5);
    assert!(config.store_path().is_file());

    // The current file now wins over the stale legacy one
    fs::write(config.legacy_store_path(), b"{}").unwrap();
    drop(manager);
    let (manager, _) = start_manager(temp_dir.path());
    assert!(manager.current_snapshot().status.contains_key(&11));
}

#[test]
fn rejected_update_is_not_persisted() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (manager, _) = start_manager(temp_dir.path());
    let accepted = jobs(vec![("node", vec![target(1, 10, TargetState::Normal)])]);
    manager.update(accepted.clone()).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    manager.add_update_callback(move |targets: &JobTargets| {
        counter.fetch_add(1, Ordering::SeqCst);
        if targets.contains_key("forbidden") {
            return Err("job not allowed on this shard".into());
        }
        Ok(())
    });

    let err = manager
        .update(jobs(vec![("forbidden", vec![target(9, 1, TargetState::Normal)])]))
        .unwrap_err();
    assert!(matches!(err, Error::Callback { index: 0, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    drop(manager);

    let (manager, _) = start_manager(temp_dir.path());
    assert_eq!(manager.current_snapshot().targets, accepted);
}

#[test]
fn corrupted_snapshot_blocks_start() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::with_store_dir(temp_dir.path());
    fs::write(config.store_path(), b"not json").unwrap();

    let manager =
        shard_sidecar::TargetsManager::new(&config, &prometheus::Registry::new()).unwrap();

    match manager.load() {
        Err(Error::Load(e)) => assert!(e.to_string().contains("kvass-shard.json")),
        other => panic!("unexpected result: {other:?}"),
    }
}
