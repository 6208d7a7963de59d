use chrono::DateTime;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;

/// Source of wall-clock time, injected so idle stamps are reproducible in tests.
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
