use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Create `dir` and its parents if missing; an existing non-directory is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PersistError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `content` to `target` in one step.
///
/// The bytes go to a temp file beside the target which is synced and then
/// renamed over it, so readers see either the old file or the complete new
/// one. A missing parent directory is created first.
pub fn write_atomic(target: &Path, content: &str) -> Result<PathBuf, PersistError> {
    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_output_dir(dir)?;

    let failed = |source: io::Error| PersistError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(content.as_bytes()).map_err(failed)?;
    tmp.as_file_mut().sync_all().map_err(failed)?;
    tmp.persist(target).map_err(|err| failed(err.error))?;
    Ok(target.to_path_buf())
}
