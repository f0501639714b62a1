//! engine
//!
//! The narrow engine surface the startup front-end needs.
//!
//! # Overview
//!
//! The front-end decides how the process starts; everything that happens
//! afterwards (script loading, rendering, saving) consumes what it
//! decided. This module holds the pieces of that boundary:
//!
//! - [`session`] - Markers that survive an in-process reload
//! - [`config`] - Startup settings handed to the rest of the engine
//! - [`persistent`] - Persistent-data location and removal
//! - [`lint`] - Structural checks on a project directory
//! - [`dump`] - JSON dump of startup state
//!
//! # Invariants
//!
//! - Nothing here parses arguments; the values arrive already decided
//! - Nothing here creates directories during resolution; only commands
//!   that write do

pub mod config;
pub mod dump;
pub mod lint;
pub mod persistent;
pub mod session;

// Re-exports for convenience
pub use config::{resolve_savedir, Config, ConfigError};
pub use dump::{Dump, DumpError};
pub use lint::LintReport;
pub use persistent::{Persistent, PersistentError};
pub use session::Session;

use tracing::info;

/// Version string reported by logs and the JSON dump.
pub const VERSION: &str = concat!("Vireo ", env!("CARGO_PKG_VERSION"));

/// Hand control to the game loading pipeline.
///
/// This is the boundary of the front-end: by the time it is called, the
/// argument vector has been parsed twice, the dispatched handler asked
/// for a normal start, and `config` holds everything the pipeline needs.
pub fn start(config: &Config) {
    info!(
        version = VERSION,
        basedir = %config.basedir.display(),
        savedir = %config.savedir.display(),
        compile = config.compile,
        safe_mode = config.safe_mode,
        "handing off to the game loading pipeline"
    );
}
