//! Targets assigned to this shard and the runtime status tracked for them.

mod scrape_status;
mod snapshot;
pub use scrape_status::*;
pub use snapshot::*;

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::ADDRESS_LABEL;
use crate::constants::METRICS_PATH_LABEL;
use crate::constants::SCHEME_LABEL;

/// Desired targets grouped by job name. Order inside a job is kept as given.
pub type JobTargets = BTreeMap<String, Vec<Target>>;

/// Lifecycle state of a target as decided by the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetState {
    /// Scraped by this shard as usual
    #[default]
    #[serde(rename = "")]
    Normal,
    /// Being handed over to another shard
    #[serde(rename = "in_transfer")]
    InTransfer,
}

impl fmt::Display for TargetState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TargetState::Normal => write!(f, "normal"),
            TargetState::InTransfer => write!(f, "in_transfer"),
        }
    }
}

/// A single scrape endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Stable identity, computed by the coordinator from the original labels and URL
    #[serde(alias = "Hash")]
    pub hash: u64,

    /// Labels after relabeling
    #[serde(default, alias = "Labels")]
    pub labels: BTreeMap<String, String>,

    /// Estimated series produced by one scrape
    #[serde(default, alias = "Series")]
    pub series: i64,

    /// Series before sample limits are applied
    #[serde(default, alias = "TotalSeries")]
    pub total_series: i64,

    #[serde(default, rename = "state", alias = "State", alias = "TargetState")]
    pub state: TargetState,
}

impl Target {
    pub fn new(
        hash: u64,
        series: i64,
        state: TargetState,
    ) -> Self {
        Self {
            hash,
            series,
            total_series: series,
            state,
            ..Default::default()
        }
    }

    pub fn with_label(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    pub fn with_total_series(
        mut self,
        total_series: i64,
    ) -> Self {
        self.total_series = total_series;
        self
    }

    /// Endpoint URL without query parameters, e.g. `http://10.0.0.1:9100/metrics`.
    pub fn no_param_url(&self) -> String {
        let label = |name: &str| self.labels.get(name).map(String::as_str).unwrap_or_default();
        let scheme = label(SCHEME_LABEL);
        let address = label(ADDRESS_LABEL);
        let path = label(METRICS_PATH_LABEL);

        if scheme.is_empty() {
            format!("{address}{path}")
        } else {
            format!("{scheme}://{address}{path}")
        }
    }
}
