use std::sync::Arc;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

use crate::JobTargets;
use crate::MockClock;
use crate::Target;
use crate::TargetState;

/// 2024-03-01T12:00:00Z
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A clock that always answers `at`.
pub fn fixed_clock(at: DateTime<Utc>) -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_now().returning(move || at);
    Arc::new(clock)
}

pub fn normal(
    hash: u64,
    series: i64,
) -> Target {
    Target::new(hash, series, TargetState::Normal)
        .with_label("__scheme__", "http")
        .with_label("__address__", format!("10.0.0.{hash}:9100"))
        .with_label("__metrics_path__", "/metrics")
}

pub fn in_transfer(
    hash: u64,
    series: i64,
) -> Target {
    Target {
        state: TargetState::InTransfer,
        ..normal(hash, series)
    }
}

/// Builds a job map from `(job, targets)` pairs.
pub fn job_targets<const N: usize>(jobs: [(&str, Vec<Target>); N]) -> JobTargets {
    jobs.into_iter()
        .map(|(job, targets)| (job.to_string(), targets))
        .collect()
}
