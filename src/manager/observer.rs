#[cfg(test)]
use mockall::automock;
use tracing::debug;
use tracing::warn;

use crate::Error;
use crate::JobTargets;
use crate::ObserverError;
use crate::Result;

/// Downstream consumer of every reconciled target set.
///
/// Observers run synchronously on the updating thread while the manager is
/// locked; they must not call back into the same manager.
#[cfg_attr(test, automock)]
pub trait UpdateObserver: Send + Sync + 'static {
    fn on_targets_updated(
        &self,
        targets: &JobTargets,
    ) -> std::result::Result<(), ObserverError>;
}

impl<F> UpdateObserver for F
where
    F: Fn(&JobTargets) -> std::result::Result<(), ObserverError> + Send + Sync + 'static,
{
    fn on_targets_updated(
        &self,
        targets: &JobTargets,
    ) -> std::result::Result<(), ObserverError> {
        self(targets)
    }
}

/// Observers in registration order.
#[derive(Default)]
pub(crate) struct ObserverChain {
    observers: Vec<Box<dyn UpdateObserver>>,
}

impl ObserverChain {
    pub(crate) fn register<I>(
        &mut self,
        observers: I,
    ) where
        I: IntoIterator<Item = Box<dyn UpdateObserver>>,
    {
        self.observers.extend(observers);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Runs every observer in order and stops at the first failure.
    pub(crate) fn dispatch(
        &self,
        targets: &JobTargets,
    ) -> Result<()> {
        for (index, observer) in self.observers.iter().enumerate() {
            if let Err(source) = observer.on_targets_updated(targets) {
                warn!(
                    "observer #{} rejected targets update, skipping {} remaining",
                    index,
                    self.observers.len() - index - 1
                );
                return Err(Error::Callback { index, source });
            }
        }
        debug!("notified {} observers", self.observers.len());
        Ok(())
    }
}
