use std::collections::HashMap;

use crate::JobTargets;
use crate::ScrapeStatus;
use crate::TargetState;

/// A target that started moving to another shard in this reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransferNotice {
    pub(crate) job: String,
    pub(crate) hash: u64,
    pub(crate) url: String,
}

/// Rebuilds the status table for `desired`.
///
/// Known hashes keep their entry, new hashes get a fresh one seeded from the
/// target's series, and hashes missing from `desired` are dropped. The only
/// counter reset happens when a hash moves from `Normal` to `InTransfer`.
pub(crate) fn reconcile_status(
    mut previous: HashMap<u64, ScrapeStatus>,
    desired: &JobTargets,
) -> (HashMap<u64, ScrapeStatus>, Vec<TransferNotice>) {
    let mut status: HashMap<u64, ScrapeStatus> = HashMap::with_capacity(previous.len());
    let mut transfers = Vec::new();

    for (job, targets) in desired {
        for target in targets {
            let entry = status.entry(target.hash).or_insert_with(|| {
                previous
                    .remove(&target.hash)
                    .unwrap_or_else(|| ScrapeStatus::new(target.series))
            });

            match (entry.state, target.state) {
                (TargetState::Normal, TargetState::InTransfer) => {
                    entry.scrape_times = 0;
                    transfers.push(TransferNotice {
                        job: job.clone(),
                        hash: target.hash,
                        url: target.no_param_url(),
                    });
                }
                (TargetState::Normal, TargetState::Normal)
                | (TargetState::InTransfer, TargetState::InTransfer)
                | (TargetState::InTransfer, TargetState::Normal) => {}
            }

            entry.state = target.state;
        }
    }

    (status, transfers)
}
