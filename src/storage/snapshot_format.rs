//! On-disk snapshot formats, tried in priority order when loading.
//!
//! - [`CurrentFormat`]: `{"Targets": {job: [target]}, "IdleAt": rfc3339 | null}`
//! - [`LegacyFormat`]: `{job: [target]}`, read only for migration
//!
//! Both accept `null` where older writers emitted nil maps or lists.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::JobTargets;
use crate::Target;
use crate::TargetsSnapshot;

/// The persisted part of a [`TargetsSnapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSnapshot {
    pub targets: JobTargets,
    pub idle_at: Option<DateTime<Utc>>,
}

/// One readable snapshot layout bound to its file.
pub trait SnapshotFormat: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn path(&self) -> &Path;

    fn decode(
        &self,
        data: &[u8],
    ) -> serde_json::Result<StoredSnapshot>;
}

type WireJobTargets = BTreeMap<String, Option<Vec<Target>>>;

fn from_wire(targets: Option<WireJobTargets>) -> JobTargets {
    targets
        .unwrap_or_default()
        .into_iter()
        .map(|(job, targets)| (job, targets.unwrap_or_default()))
        .collect()
}

#[derive(Deserialize)]
struct CurrentFile {
    #[serde(rename = "Targets", default)]
    targets: Option<WireJobTargets>,
    #[serde(rename = "IdleAt", default)]
    idle_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CurrentFileRef<'a> {
    #[serde(rename = "Targets")]
    targets: &'a JobTargets,
    #[serde(rename = "IdleAt")]
    idle_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CurrentFormat {
    path: PathBuf,
}

impl CurrentFormat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serializes targets and idle timestamp; runtime status is left out.
    pub fn encode(
        &self,
        snapshot: &TargetsSnapshot,
    ) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&CurrentFileRef {
            targets: &snapshot.targets,
            idle_at: snapshot.idle_at,
        })
    }
}

impl SnapshotFormat for CurrentFormat {
    fn name(&self) -> &'static str {
        "current"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn decode(
        &self,
        data: &[u8],
    ) -> serde_json::Result<StoredSnapshot> {
        let file: CurrentFile = serde_json::from_slice(data)?;
        Ok(StoredSnapshot {
            targets: from_wire(file.targets),
            idle_at: file.idle_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LegacyFormat {
    path: PathBuf,
}

impl LegacyFormat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotFormat for LegacyFormat {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Only targets are known; idle state is derived on the next update.
    fn decode(
        &self,
        data: &[u8],
    ) -> serde_json::Result<StoredSnapshot> {
        let targets: Option<WireJobTargets> = serde_json::from_slice(data)?;
        Ok(StoredSnapshot {
            targets: from_wire(targets),
            idle_at: None,
        })
    }
}
