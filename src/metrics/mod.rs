use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;

use crate::constants::SUCCESS_LABEL;
use crate::constants::TARGETS_TOTAL;
use crate::constants::TARGETS_UPDATED_TOTAL;
use crate::Result;

#[cfg(test)]
mod metrics_test;

/// The two instruments owned by a targets manager.
///
/// Each instance holds its own collectors, so several managers can live in
/// one process as long as they register into different registries.
#[derive(Debug, Clone)]
pub struct TargetsMetrics {
    targets_updated_total: IntCounterVec,
    targets_total: IntGauge,
}

impl TargetsMetrics {
    /// Creates the collectors and registers them into `registry`.
    ///
    /// A collector that is already registered is tolerated with a warning.
    pub fn new(registry: &Registry) -> Result<Self> {
        let metrics = Self::unregistered()?;
        metrics.register_into(registry);
        Ok(metrics)
    }

    /// Creates the collectors without exposing them anywhere.
    pub fn unregistered() -> Result<Self> {
        Ok(Self {
            targets_updated_total: IntCounterVec::new(
                Opts::new(TARGETS_UPDATED_TOTAL, "Number of target updates, by outcome"),
                &[SUCCESS_LABEL],
            )?,
            targets_total: IntGauge::new(TARGETS_TOTAL, "Number of targets tracked by this shard")?,
        })
    }

    fn register_into(
        &self,
        registry: &Registry,
    ) {
        if let Err(e) = registry.register(Box::new(self.targets_updated_total.clone())) {
            warn!("register {} failed: {}", TARGETS_UPDATED_TOTAL, e);
        }
        if let Err(e) = registry.register(Box::new(self.targets_total.clone())) {
            warn!("register {} failed: {}", TARGETS_TOTAL, e);
        }
    }

    /// Records one update attempt and the number of tracked status entries.
    pub fn record_update(
        &self,
        success: bool,
        tracked_targets: usize,
    ) {
        self.targets_updated_total
            .with_label_values(&[if success { "true" } else { "false" }])
            .inc();
        self.targets_total.set(tracked_targets as i64);
    }

    pub fn updates(
        &self,
        success: bool,
    ) -> u64 {
        self.targets_updated_total
            .with_label_values(&[if success { "true" } else { "false" }])
            .get()
    }

    pub fn tracked_targets(&self) -> i64 {
        self.targets_total.get()
    }
}
