//! Owner of the shard's local target state.
//!
//! Every operation takes one internal lock, so `load`, `update` and the
//! queries are serialized even when the manager is shared across threads.
//!
//! ## Update pipeline
//! 1. replace the target set and rebuild runtime status
//! 2. stamp or clear the idle timestamp
//! 3. notify observers in registration order
//! 4. persist the snapshot
//! 5. record metrics, whatever the outcome
//!
//! Persistence is write-behind: a failure in step 3 or 4 is returned to the
//! caller but steps 1 and 2 stay applied, so the live view always reflects
//! the latest desired input while disk and observers may lag behind until the
//! next successful update.

use std::sync::Arc;

use parking_lot::Mutex;
use prometheus::Registry;
use tracing::debug;
use tracing::error;
use tracing::info;

use super::idle::IdleTracker;
use super::observer::ObserverChain;
use super::reconciler::reconcile_status;
use crate::utils::time::Clock;
use crate::utils::time::SystemClock;
use crate::Error;
use crate::FileSnapshotStore;
use crate::JobTargets;
use crate::ObserverError;
use crate::Result;
use crate::ScrapeStatus;
use crate::SnapshotStore;
use crate::StoreConfig;
use crate::TargetsMetrics;
use crate::TargetsSnapshot;
use crate::UpdateObserver;

struct ManagerState {
    snapshot: TargetsSnapshot,
    observers: ObserverChain,
}

/// Tracks the targets assigned to this shard, their runtime status and the
/// shard idle window, and keeps them on disk across restarts.
pub struct TargetsManager {
    state: Mutex<ManagerState>,
    store: Box<dyn SnapshotStore>,
    idle: IdleTracker,
    metrics: TargetsMetrics,
}

impl std::fmt::Debug for TargetsManager {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TargetsManager")
            .field("jobs", &state.snapshot.targets.len())
            .field("tracked_targets", &state.snapshot.status.len())
            .field("idle_at", &state.snapshot.idle_at)
            .field("observers", &state.observers.len())
            .finish()
    }
}

impl TargetsManager {
    /// Manager backed by JSON files under `config.store_dir`, reporting into `registry`.
    pub fn new(
        config: &StoreConfig,
        registry: &Registry,
    ) -> Result<Self> {
        TargetsManagerBuilder::new(config).registry(registry).build()
    }

    /// Initializes state from disk, migrating the legacy file if that is all
    /// there is, and runs one full update so status, idle state, observers and
    /// the current-format file are consistent with what was loaded.
    pub fn load(&self) -> Result<()> {
        let mut state = self.state.lock();

        let stored = self.store.load().map_err(|e| {
            error!("load targets snapshot: {}", e);
            Error::Load(e)
        })?;

        let targets = match stored {
            Some(stored) => {
                state.snapshot.idle_at = stored.idle_at;
                stored.targets
            }
            None => JobTargets::new(),
        };

        self.update_locked(&mut state, targets)
    }

    /// Appends observers; they run on every later update in this order.
    pub fn register_observers<I>(
        &self,
        observers: I,
    ) where
        I: IntoIterator<Item = Box<dyn UpdateObserver>>,
    {
        self.state.lock().observers.register(observers);
    }

    pub fn register_observer(
        &self,
        observer: impl UpdateObserver,
    ) {
        let observer: Box<dyn UpdateObserver> = Box::new(observer);
        self.register_observers([observer]);
    }

    /// Appends a closure observer.
    pub fn add_update_callback<F>(
        &self,
        callback: F,
    ) where
        F: Fn(&JobTargets) -> std::result::Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.register_observer(callback);
    }

    /// Replaces the whole target set and runs the update pipeline.
    pub fn update(
        &self,
        targets: JobTargets,
    ) -> Result<()> {
        let mut state = self.state.lock();
        self.update_locked(&mut state, targets)
    }

    /// Owned copy of the current targets, idle stamp and status.
    pub fn current_snapshot(&self) -> TargetsSnapshot {
        self.state.lock().snapshot.clone()
    }

    /// Borrow-only access to the current snapshot under the lock.
    pub fn read_snapshot<R>(
        &self,
        f: impl FnOnce(&TargetsSnapshot) -> R,
    ) -> R {
        let state = self.state.lock();
        f(&state.snapshot)
    }

    /// Mutates the runtime status of one tracked target.
    ///
    /// Returns `false` when `hash` is not currently assigned to this shard.
    pub fn update_status(
        &self,
        hash: u64,
        f: impl FnOnce(&mut ScrapeStatus),
    ) -> bool {
        let mut state = self.state.lock();
        match state.snapshot.status.get_mut(&hash) {
            Some(status) => {
                f(status);
                true
            }
            None => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state.lock().snapshot.is_idle()
    }

    /// Instruments recorded by this manager.
    pub fn metrics(&self) -> &TargetsMetrics {
        &self.metrics
    }

    fn update_locked(
        &self,
        state: &mut ManagerState,
        targets: JobTargets,
    ) -> Result<()> {
        let result = self.apply_update(state, targets);
        self.metrics
            .record_update(result.is_ok(), state.snapshot.status.len());
        if let Err(e) = &result {
            error!("update targets: {}", e);
        }
        result
    }

    fn apply_update(
        &self,
        state: &mut ManagerState,
        targets: JobTargets,
    ) -> Result<()> {
        let snapshot = &mut state.snapshot;
        snapshot.targets = targets;

        let previous = std::mem::take(&mut snapshot.status);
        let (status, transfers) = reconcile_status(previous, &snapshot.targets);
        snapshot.status = status;
        for transfer in &transfers {
            info!(hash = transfer.hash, "{}/{} begin transfer", transfer.job, transfer.url);
        }

        self.idle.track(&mut snapshot.idle_at, snapshot.status.len());

        state.observers.dispatch(&state.snapshot.targets)?;

        self.store.save(&state.snapshot).map_err(Error::Persist)?;

        debug!(
            "targets updated: {} jobs, {} tracked targets",
            state.snapshot.targets.len(),
            state.snapshot.status.len()
        );
        Ok(())
    }
}

/// Assembles a [`TargetsManager`], defaulting to the file store, the system
/// clock and metrics that are not exposed through any registry.
pub struct TargetsManagerBuilder {
    config: StoreConfig,
    store: Option<Box<dyn SnapshotStore>>,
    clock: Option<Arc<dyn Clock>>,
    registry: Option<Registry>,
}

impl TargetsManagerBuilder {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
            store: None,
            clock: None,
            registry: None,
        }
    }

    /// Replaces the file store built from the config.
    pub fn store(
        mut self,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(
        mut self,
        clock: Arc<dyn Clock>,
    ) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Registry the update counter and target gauge are registered into.
    pub fn registry(
        mut self,
        registry: &Registry,
    ) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    pub fn build(self) -> Result<TargetsManager> {
        let store = match self.store {
            Some(store) => store,
            None => Box::new(FileSnapshotStore::new(&self.config)),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let metrics = match &self.registry {
            Some(registry) => TargetsMetrics::new(registry)?,
            None => TargetsMetrics::unregistered()?,
        };

        Ok(TargetsManager {
            state: Mutex::new(ManagerState {
                snapshot: TargetsSnapshot::default(),
                observers: ObserverChain::default(),
            }),
            store,
            idle: IdleTracker::new(clock),
            metrics,
        })
    }
}
