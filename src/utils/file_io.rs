use std::fs::create_dir_all;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use tracing::error;

use crate::StorageError;

/// Creates the directory `dir` and all missing parents.
pub(crate) fn create_dir_if_not_exist(dir: &Path) -> Result<(), StorageError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    create_dir_all(dir).map_err(|e| {
        error!("Failed to create store directory {:?}: {:?}", dir, e);
        StorageError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        }
    })?;
    debug!("created store directory: {:?}", dir);
    Ok(())
}

/// Reads the whole file, mapping "does not exist" to `Ok(None)`.
pub(crate) fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Replaces `path` with `buf` in place.
pub(crate) fn write_file(
    path: &Path,
    buf: &[u8],
) -> Result<(), StorageError> {
    std::fs::write(path, buf).map_err(|e| StorageError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes `buf` to a temp file next to `path`, syncs it, then renames it over
/// `path`. Readers observe either the old or the new content, never a prefix.
pub(crate) fn write_file_atomic(
    path: &Path,
    buf: &[u8],
) -> Result<(), StorageError> {
    let write_err = |e: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(buf).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
