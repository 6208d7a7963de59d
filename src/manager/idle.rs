use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use tracing::debug;

use crate::utils::time::Clock;

/// Keeps the single "idle since" timestamp in line with the status table.
#[derive(Clone)]
pub(crate) struct IdleTracker {
    clock: Arc<dyn Clock>,
}

impl IdleTracker {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Stamps `idle_at` when the shard just became empty, keeps an existing
    /// stamp while it stays empty and clears it once any target is tracked.
    pub(crate) fn track(
        &self,
        idle_at: &mut Option<DateTime<Utc>>,
        tracked_targets: usize,
    ) {
        match (tracked_targets, idle_at.is_some()) {
            (0, false) => {
                let now = self.clock.now();
                debug!("shard became idle at {}", now);
                *idle_at = Some(now);
            }
            (0, true) => {}
            (_, true) => {
                debug!("shard is busy again, clearing idle stamp");
                *idle_at = None;
            }
            (_, false) => {}
        }
    }
}
