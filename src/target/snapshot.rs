use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::JobTargets;
use super::ScrapeStatus;

/// Everything the shard knows about its assignment.
///
/// `targets` and `idle_at` are persisted; `status` is rebuilt on every load
/// and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetsSnapshot {
    /// All targets this shard is scraping, by job
    pub targets: JobTargets,
    /// When the shard last became empty; `None` while at least one target is assigned
    pub idle_at: Option<DateTime<Utc>>,
    /// Runtime status keyed by target hash
    pub status: HashMap<u64, ScrapeStatus>,
}

impl TargetsSnapshot {
    pub fn is_idle(&self) -> bool {
        self.idle_at.is_some()
    }

    /// How long the shard has been idle at `now`.
    pub fn idle_for(
        &self,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        self.idle_at.map(|at| now.signed_duration_since(at))
    }

    /// Number of target entries across all jobs, duplicates included.
    pub fn target_count(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }
}
