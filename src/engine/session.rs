//! engine::session
//!
//! Markers that survive an in-process reload.
//!
//! # Overview
//!
//! The engine can tear down and rebuild the script state without leaving
//! the process. Anything that must be remembered across such a reload,
//! but not across process restarts, lives here. The front-end reads these
//! markers while parsing (compile forcing) and writes them when a command
//! consumes a once-per-process side effect (the warp target).

use std::ffi::OsString;

/// Session state threaded from bootstrap through dispatch.
///
/// A fresh process starts with everything unset. A reload keeps the same
/// `Session` value and re-runs bootstrap against it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// An in-process reload is underway; scripts were already compiled
    /// by the pass that started the process.
    pub reloading: bool,

    /// A subsystem requested recompilation earlier in this process.
    pub compile_requested: bool,

    /// The warp target was already applied; `run` must not apply it
    /// again after a reload.
    pub warped: bool,

    /// The argument tail a third-party launcher injected, preserved by
    /// the sanitizer for privileged commands to inspect.
    pub launcher_argv: Option<Vec<OsString>>,
}

impl Session {
    /// Create a session with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }
}
