//! engine::persistent
//!
//! Location and removal of persistent data.
//!
//! # Overview
//!
//! Persistent data records what the player has seen and chosen across
//! play sessions. It lives in the savedir as a `persistent` file, with
//! rotated copies named `persistent.*`. The front-end only needs to know
//! where it is and how to delete it; reading and writing it belongs to
//! the save system.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

/// Errors from persistent-data operations.
#[derive(Debug, Error)]
pub enum PersistentError {
    #[error("failed to scan savedir '{path}': {source}")]
    Scan { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// Handle on the persistent data belonging to one savedir.
#[derive(Debug, Clone)]
pub struct Persistent {
    savedir: PathBuf,
    should_save: bool,
}

impl Persistent {
    /// Persistent data routing for a savedir.
    pub fn new(savedir: PathBuf) -> Self {
        Persistent {
            savedir,
            should_save: true,
        }
    }

    /// The savedir this handle routes into.
    pub fn savedir(&self) -> &PathBuf {
        &self.savedir
    }

    /// Whether the save system may write persistent data back out.
    pub fn should_save(&self) -> bool {
        self.should_save
    }

    /// Stop the save system writing persistent data for the rest of the
    /// process. Used after deletion so shutdown does not resurrect it.
    pub fn disable_saving(&mut self) {
        self.should_save = false;
    }

    /// Delete every persistent file in the savedir.
    ///
    /// Returns the paths that were removed. A missing savedir counts as
    /// already clean.
    ///
    /// # Errors
    ///
    /// Returns [`PersistentError`] when the savedir cannot be scanned or
    /// a file cannot be removed.
    pub fn unlink_all(&self) -> Result<Vec<PathBuf>, PersistentError> {
        let mut removed = Vec::new();

        let entries = match fs::read_dir(&self.savedir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(removed),
            Err(err) => {
                return Err(PersistentError::Scan {
                    path: self.savedir.clone(),
                    source: err,
                })
            }
        };

        for entry in entries {
            let entry = entry.map_err(|err| PersistentError::Scan {
                path: self.savedir.clone(),
                source: err,
            })?;

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name != "persistent" && !name.starts_with("persistent.") {
                continue;
            }

            let path = entry.path();
            fs::remove_file(&path).map_err(|err| PersistentError::Remove {
                path: path.clone(),
                source: err,
            })?;
            info!(path = %path.display(), "removed persistent data");
            removed.push(path);
        }

        Ok(removed)
    }
}
