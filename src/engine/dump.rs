//! engine::dump
//!
//! JSON dump of startup state.
//!
//! # Overview
//!
//! `--json-dump FILE` asks the engine to describe itself to a file that
//! editors and build tools read. The front-end contributes the part it
//! knows at startup: version, project, resolved command, and the
//! registered command names. The script pipeline's dumper extends the
//! same file with script data once scripts are loaded, honoring the
//! recorded include flags.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors from writing the dump file.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to create dump file '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write dump file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Startup state as the front-end sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Dump {
    /// Engine version string.
    pub version: String,
    /// When this dump was generated.
    pub generated: DateTime<Utc>,
    /// Project directory the process was started for.
    pub basedir: String,
    /// The command that was dispatched.
    pub command: String,
    /// Registered command names, filtered per `include_private`.
    pub commands: Vec<String>,
    /// Underscore-prefixed names were included.
    pub include_private: bool,
    /// The script dumper should include engine-provided names.
    pub include_common: bool,
}

impl Dump {
    /// Assemble a dump from the startup context.
    ///
    /// Command names beginning with `_` are engine-private and omitted
    /// unless `include_private` is set.
    pub fn new(
        basedir: &str,
        command: &str,
        commands: &[String],
        include_private: bool,
        include_common: bool,
    ) -> Self {
        let commands = commands
            .iter()
            .filter(|name| include_private || !name.starts_with('_'))
            .cloned()
            .collect();

        Dump {
            version: super::VERSION.to_owned(),
            generated: Utc::now(),
            basedir: basedir.to_owned(),
            command: command.to_owned(),
            commands,
            include_private,
            include_common,
        }
    }

    /// Write the dump as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError`] when the file cannot be created or
    /// serialization fails.
    pub fn write(&self, path: &Path) -> Result<(), DumpError> {
        let file = File::create(path).map_err(|err| DumpError::Create {
            path: path.to_path_buf(),
            source: err,
        })?;
        serde_json::to_writer_pretty(file, self).map_err(|err| DumpError::Write {
            path: path.to_path_buf(),
            source: err,
        })?;
        Ok(())
    }
}
