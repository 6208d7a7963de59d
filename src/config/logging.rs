use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| invalid(format!("log level {:?} is not a valid filter: {}", self.level, e)))
    }
}

fn default_level() -> String {
    "info".to_string()
}
