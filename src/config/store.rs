use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::constants::DEFAULT_LEGACY_STORE_FILE_NAME;
use crate::constants::DEFAULT_STORE_DIR;
use crate::constants::DEFAULT_STORE_FILE_NAME;
use crate::Result;

/// Where the shard snapshot lives and how it is written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding both the current and the legacy snapshot files
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// File name of the current-format snapshot
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// File name of the legacy target-only snapshot, read for migration
    #[serde(default = "default_legacy_file_name")]
    pub legacy_file_name: String,

    /// Write through a temp file and rename it over the snapshot
    #[serde(default = "default_atomic_write")]
    pub atomic_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            file_name: default_file_name(),
            legacy_file_name: default_legacy_file_name(),
            atomic_write: default_atomic_write(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `store_dir` with default file names.
    pub fn with_store_dir(store_dir: impl AsRef<Path>) -> Self {
        Self {
            store_dir: store_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_dir.join(&self.file_name)
    }

    pub fn legacy_store_path(&self) -> PathBuf {
        self.store_dir.join(&self.legacy_file_name)
    }

    /// Validates store configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - `store_dir` is empty
    /// - a file name is empty or contains a path separator
    /// - current and legacy file names collide
    pub fn validate(&self) -> Result<()> {
        if self.store_dir.as_os_str().is_empty() {
            return Err(invalid("store_dir path cannot be empty"));
        }

        validate_file_name(&self.file_name, "file_name")?;
        validate_file_name(&self.legacy_file_name, "legacy_file_name")?;

        if self.file_name == self.legacy_file_name {
            return Err(invalid(format!(
                "file_name and legacy_file_name must differ, both are {}",
                self.file_name
            )));
        }

        Ok(())
    }
}

fn validate_file_name(
    name: &str,
    field: &str,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(format!("{field} cannot be empty")));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(invalid(format!(
            "{field} must be a plain file name, got {name:?}"
        )));
    }
    Ok(())
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_DIR)
}

fn default_file_name() -> String {
    DEFAULT_STORE_FILE_NAME.to_string()
}

fn default_legacy_file_name() -> String {
    DEFAULT_LEGACY_STORE_FILE_NAME.to_string()
}

fn default_atomic_write() -> bool {
    true
}
