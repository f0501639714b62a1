//! cli::sanitize
//!
//! Repair of argument vectors damaged by platform launchers.
//!
//! # Overview
//!
//! Some platforms start the game with arguments the grammar was never
//! meant to see. The Epic Games Store prepends its own launch arguments
//! (`-epicapp=...` among them); macOS hands quarantined binaries a
//! process serial number (`-psn_...`). Left alone, either would confuse
//! the bootstrap parse, so the vector is scrubbed down to the program
//! name first.
//!
//! # Invariants
//!
//! - Runs exactly once, before the bootstrap parse
//! - The launcher scan runs first; when it fires, the quarantine scan
//!   sees an already-clean vector
//! - Launcher tails are preserved for privileged commands to inspect;
//!   quarantine tails are discarded

use std::ffi::OsString;

use tracing::debug;

/// Prefix on arguments injected by the Epic Games Store launcher.
/// Compared case-insensitively; the store is not consistent about case.
const LAUNCHER_MARKER: &str = "-epicapp=";

/// Prefix on the process serial number macOS passes to quarantined
/// binaries. Compared case-insensitively, like the launcher marker.
const QUARANTINE_MARKER: &str = "-psn";

/// What the sanitizer did to the vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Neither marker was present; the vector was left alone.
    Untouched,
    /// A launcher marker was found; the whole tail was set aside.
    Preserved(Vec<OsString>),
    /// A quarantine marker was found; the tail was thrown away.
    Discarded,
}

/// Scrub `argv` in place, leaving only the program name when a marker
/// is found anywhere after it.
pub fn clean(argv: &mut Vec<OsString>) -> CleanOutcome {
    if argv.len() < 2 {
        return CleanOutcome::Untouched;
    }

    if let Some(tail) = clean_launcher_arguments(argv) {
        return CleanOutcome::Preserved(tail);
    }

    if clean_quarantine_arguments(argv) {
        return CleanOutcome::Discarded;
    }

    CleanOutcome::Untouched
}

/// Clear launcher-injected arguments, returning the preserved tail.
fn clean_launcher_arguments(argv: &mut Vec<OsString>) -> Option<Vec<OsString>> {
    let found = argv.iter().skip(1).any(|arg| {
        arg.to_string_lossy()
            .to_lowercase()
            .starts_with(LAUNCHER_MARKER)
    });
    if !found {
        return None;
    }

    let tail = argv.split_off(1);
    debug!(
        count = tail.len(),
        "cleared launcher-injected arguments, tail preserved"
    );
    Some(tail)
}

/// Clear the argument vector when the quarantine marker is present.
fn clean_quarantine_arguments(argv: &mut Vec<OsString>) -> bool {
    let found = argv.iter().skip(1).any(|arg| {
        arg.to_string_lossy()
            .to_lowercase()
            .starts_with(QUARANTINE_MARKER)
    });
    if found {
        argv.truncate(1);
        debug!("cleared quarantine arguments");
    }
    found
}
