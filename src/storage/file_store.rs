use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::debug;
use tracing::info;

use super::CurrentFormat;
use super::LegacyFormat;
use super::SnapshotFormat;
use super::StoredSnapshot;
use crate::utils::file_io::create_dir_if_not_exist;
use crate::utils::file_io::read_if_exists;
use crate::utils::file_io::write_file;
use crate::utils::file_io::write_file_atomic;
use crate::StorageError;
use crate::StoreConfig;
use crate::TargetsSnapshot;

/// Durable home of the shard snapshot.
#[cfg_attr(test, automock)]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Returns the newest readable snapshot, or `None` when nothing was ever stored.
    fn load(&self) -> Result<Option<StoredSnapshot>, StorageError>;

    /// Persists targets and idle timestamp in the current format.
    fn save(
        &self,
        snapshot: &TargetsSnapshot,
    ) -> Result<(), StorageError>;
}

/// JSON files under a single store directory.
pub struct FileSnapshotStore {
    store_dir: PathBuf,
    writer: CurrentFormat,
    /// Readers in priority order; the first existing file wins
    readers: Vec<Box<dyn SnapshotFormat>>,
    atomic_write: bool,
}

impl std::fmt::Debug for FileSnapshotStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("FileSnapshotStore")
            .field("store_dir", &self.store_dir)
            .field(
                "readers",
                &self.readers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("atomic_write", &self.atomic_write)
            .finish()
    }
}

impl FileSnapshotStore {
    pub fn new(config: &StoreConfig) -> Self {
        let writer = CurrentFormat::new(config.store_path());
        let readers: Vec<Box<dyn SnapshotFormat>> = vec![
            Box::new(writer.clone()),
            Box::new(LegacyFormat::new(config.legacy_store_path())),
        ];
        Self {
            store_dir: config.store_dir.clone(),
            writer,
            readers,
            atomic_write: config.atomic_write,
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<StoredSnapshot>, StorageError> {
        for reader in &self.readers {
            let path = reader.path();
            let Some(data) = read_if_exists(path)? else {
                debug!("no {} snapshot at {:?}", reader.name(), path);
                continue;
            };

            let snapshot = reader.decode(&data).map_err(|e| StorageError::Decode {
                path: path.to_path_buf(),
                source: e,
            })?;
            info!(
                "loaded {} snapshot from {:?}: {} jobs",
                reader.name(),
                path,
                snapshot.targets.len()
            );
            return Ok(Some(snapshot));
        }

        info!("no snapshot found under {:?}, starting empty", self.store_dir);
        Ok(None)
    }

    fn save(
        &self,
        snapshot: &TargetsSnapshot,
    ) -> Result<(), StorageError> {
        create_dir_if_not_exist(&self.store_dir)?;

        let data = self.writer.encode(snapshot)?;
        let path = self.writer.path();
        if self.atomic_write {
            write_file_atomic(path, &data)?;
        } else {
            write_file(path, &data)?;
        }

        debug!("saved snapshot to {:?} ({} bytes)", path, data.len());
        Ok(())
    }
}
