//! engine::config
//!
//! Startup configuration decided by the front-end.
//!
//! # Overview
//!
//! The front-end translates the final argument parse into a [`Config`]
//! that the rest of the engine consumes. Nothing here reads files; the
//! values come from the command line and from platform conventions.
//!
//! # Savedir Resolution
//!
//! Resolved in this order (first match wins):
//! 1. `--savedir DIRECTORY`, taken verbatim
//! 2. The platform data directory, under `vireo/{project}` where
//!    `{project}` is the base directory's file name (`default` when the
//!    base directory is empty)
//!
//! Resolution never creates directories; that is left to whichever
//! subsystem first writes into the savedir.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform data directory to hold save data")]
    NoDataDir,
}

/// Startup settings handed from the front-end to the engine.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory containing the project to run.
    pub basedir: PathBuf,
    /// Directory holding saves and persistent data.
    pub savedir: PathBuf,
    /// Start in safe mode, skipping user customizations.
    pub safe_mode: bool,
    /// Recompile scripts as they load.
    pub compile: bool,
    /// Recompile embedded bytecode as it loads.
    pub compile_python: bool,
    /// Keep compiled script files whose source is gone.
    pub keep_orphan_rpyc: bool,
    /// Report errors by opening them in a text editor.
    pub errors_in_editor: bool,
    /// Show the frame-timing profile overlay.
    pub profile: bool,
    /// Log image cache activity.
    pub debug_image_cache: bool,
    /// A `file:line` location to warp to once startup finishes.
    pub warp_spec: Option<String>,
}

impl Config {
    /// Create a config for a project directory with everything else at
    /// its defaults.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Config {
            basedir: basedir.into(),
            ..Config::default()
        }
    }
}

/// Resolve the save-data directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoDataDir`] when no directory was requested
/// and the platform reports no data directory.
pub fn resolve_savedir(requested: Option<&str>, basedir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = requested {
        return Ok(PathBuf::from(dir));
    }

    let project = basedir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_owned());

    let data = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(data.join("vireo").join(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_savedir_wins() {
        let got = resolve_savedir(Some("/tmp/saves"), Path::new("/games/mygame")).unwrap();
        assert_eq!(got, PathBuf::from("/tmp/saves"));
    }

    #[test]
    fn default_savedir_lands_under_platform_data_dir() {
        let Some(data) = dirs::data_dir() else {
            return;
        };
        let got = resolve_savedir(None, Path::new("/games/mygame")).unwrap();
        assert_eq!(got, data.join("vireo").join("mygame"));
    }

    #[test]
    fn empty_basedir_resolves_to_default_project() {
        let Some(data) = dirs::data_dir() else {
            return;
        };
        let got = resolve_savedir(None, Path::new("")).unwrap();
        assert_eq!(got, data.join("vireo").join("default"));
    }
}
