use std::path::Path;

use prometheus::Registry;
use shard_sidecar::JobTargets;
use shard_sidecar::StoreConfig;
use shard_sidecar::Target;
use shard_sidecar::TargetState;
use shard_sidecar::TargetsManager;

pub fn target(
    hash: u64,
    series: i64,
    state: TargetState,
) -> Target {
    Target::new(hash, series, state)
        .with_label("__scheme__", "http")
        .with_label("__address__", format!("node-{hash}:9100"))
        .with_label("__metrics_path__", "/metrics")
}

pub fn jobs(entries: Vec<(&str, Vec<Target>)>) -> JobTargets {
    entries
        .into_iter()
        .map(|(job, targets)| (job.to_string(), targets))
        .collect()
}

/// A fresh manager on `store_dir`, as a restarted sidecar would build it.
pub fn start_manager(store_dir: &Path) -> (TargetsManager, Registry) {
    let registry = Registry::new();
    let manager = TargetsManager::new(&StoreConfig::with_store_dir(store_dir), &registry)
        .expect("build manager");
    manager.load().expect("load snapshot");
    (manager, registry)
}

pub fn gauge_value(
    registry: &Registry,
    name: &str,
) -> Option<f64> {
    registry
        .gather()
        .into_iter()
        .find(|family| family.get_name() == name)
        .and_then(|family| family.get_metric().first().map(|m| m.get_gauge().get_value()))
}
