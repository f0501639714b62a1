//! cli::bootstrap
//!
//! The first parse pass, before any subsystem exists.
//!
//! # Overview
//!
//! Bootstrap runs so early that the engine knows nothing yet, not even
//! which commands exist. It sanitizes the argument vector, parses it
//! leniently to recover the base directory, the command name, and the
//! early flags, and defers every token it does not recognize to the
//! dispatch pass. Its result is provisional: the dispatched handler
//! replaces it with a strict parse.

use std::ffi::OsString;

use tracing::debug;

use super::grammar::{Grammar, ParsedArgs};
use super::sanitize::{self, CleanOutcome};
use crate::engine::Session;

/// The bootstrap pass's result.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Provisional parse, replaced once a handler parses strictly.
    pub args: ParsedArgs,
    /// Tokens the lenient grammar did not recognize, left for the
    /// dispatch pass to accept or reject.
    pub unknown: Vec<String>,
}

/// Sanitize `argv` in place and lenient-parse it.
///
/// A literal `lint` command is folded into the hidden lint flag, so the
/// dispatch redirect handles `vireo game lint` and
/// `vireo game run --lint` identically.
///
/// `--version` prints the version and exits here; a known flag with a
/// bad value is a usage error even this early.
pub fn bootstrap(argv: &mut Vec<OsString>, session: &mut Session) -> Bootstrap {
    if let CleanOutcome::Preserved(tail) = sanitize::clean(argv) {
        session.launcher_argv = Some(tail);
    }

    let (mut args, unknown) = Grammar::lenient().parse_known(argv, session);

    if args.command == "lint" {
        args.lint = true;
    }

    debug!(
        basedir = %args.basedir,
        command = %args.command,
        compile = args.compile,
        deferred = unknown.len(),
        "bootstrap parse complete"
    );

    Bootstrap { args, unknown }
}
