//! Local target-state reconciler of a metrics-scraping shard.
//!
//! A coordinator assigns scrape targets to this shard by sending the full
//! desired set. [`TargetsManager`] replaces its tracked set with it, carries
//! per-target [`ScrapeStatus`] over from the previous set, maintains the
//! shard idle timestamp, notifies registered [`UpdateObserver`]s and persists
//! the result so it survives restarts.
//!
//! ```ignore
//! let registry = prometheus::Registry::new();
//! let manager = TargetsManager::new(&StoreConfig::with_store_dir("/data"), &registry)?;
//! manager.add_update_callback(|targets: &JobTargets| {
//!     println!("{} jobs assigned", targets.len());
//!     Ok(())
//! });
//! manager.load()?;
//! manager.update(desired_targets)?;
//! ```

mod config;
mod constants;
mod errors;
mod manager;
mod metrics;
mod storage;
mod target;
pub mod utils;

pub use config::*;
pub use errors::*;
pub use manager::*;
pub use metrics::*;
pub use storage::*;
pub use target::*;
pub use utils::time::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
