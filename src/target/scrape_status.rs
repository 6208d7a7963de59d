use std::collections::VecDeque;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

use super::TargetState;
use crate::constants::SERIES_WINDOW;

/// Result of the last scrape of a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TargetHealth {
    #[default]
    Unknown,
    Good,
    Bad,
}

/// Runtime bookkeeping for one target hash. Lives across reconciliations as
/// long as the hash stays assigned; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeStatus {
    pub health: TargetHealth,
    pub last_error: Option<String>,
    pub last_scrape: Option<DateTime<Utc>>,
    pub last_scrape_duration: Duration,
    /// Series estimate: the maximum of the recent observations
    pub series: i64,
    pub state: TargetState,
    /// Scrape attempts since the entry was created or the target began transfer
    pub scrape_times: u64,
    last_series: VecDeque<i64>,
}

impl ScrapeStatus {
    /// Fresh status for a newly observed hash, seeded with the target's series.
    pub fn new(series: i64) -> Self {
        let mut last_series = VecDeque::with_capacity(SERIES_WINDOW);
        last_series.push_back(series);
        Self {
            health: TargetHealth::Unknown,
            last_error: None,
            last_scrape: None,
            last_scrape_duration: Duration::ZERO,
            series,
            state: TargetState::Normal,
            scrape_times: 0,
            last_series,
        }
    }

    /// Records one scrape attempt started at `start`.
    pub fn record_scrape(
        &mut self,
        start: DateTime<Utc>,
        duration: Duration,
        error: Option<String>,
    ) {
        self.scrape_times += 1;
        self.last_scrape = Some(start);
        self.last_scrape_duration = duration;
        self.health = if error.is_some() {
            TargetHealth::Bad
        } else {
            TargetHealth::Good
        };
        self.last_error = error;
    }

    /// Feeds the series count of the latest scrape into the estimate.
    pub fn update_series(
        &mut self,
        series: i64,
    ) {
        if self.last_series.len() == SERIES_WINDOW {
            self.last_series.pop_front();
        }
        self.last_series.push_back(series);
        self.series = self.last_series.iter().copied().max().unwrap_or(series);
    }
}
