// -
// Snapshot files

/// Current snapshot format, written on every successful update
pub(crate) const DEFAULT_STORE_FILE_NAME: &str = "kvass-shard.json";

/// Legacy target-only snapshot, read once for migration and never deleted
pub(crate) const DEFAULT_LEGACY_STORE_FILE_NAME: &str = "targets.json";

pub(crate) const DEFAULT_STORE_DIR: &str = "./data";

// -
// Metrics

pub(crate) const TARGETS_UPDATED_TOTAL: &str = "kvass_sidecar_targets_updated_total";
pub(crate) const TARGETS_TOTAL: &str = "kvass_sidecar_targets_total";
pub(crate) const SUCCESS_LABEL: &str = "success";

// -
// Target labels

pub(crate) const SCHEME_LABEL: &str = "__scheme__";
pub(crate) const ADDRESS_LABEL: &str = "__address__";
pub(crate) const METRICS_PATH_LABEL: &str = "__metrics_path__";

/// Number of recent scrapes used to estimate a target's series count
pub(crate) const SERIES_WINDOW: usize = 3;

/// Environment prefix for configuration overrides, e.g. `SIDECAR__STORE__STORE_DIR`
pub(crate) const ENV_PREFIX: &str = "SIDECAR";
