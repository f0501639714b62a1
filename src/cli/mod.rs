//! cli
//!
//! Argument handling and command dispatch for the Vireo front-end.
//!
//! # Responsibilities
//!
//! - Repair argument vectors damaged by platform launchers
//! - Parse the command line twice: once leniently before anything else
//!   exists, once strictly inside the dispatched handler
//! - Register the built-in commands and dispatch to one of them
//!
//! # Two Passes
//!
//! The bootstrap pass runs before the engine knows which commands exist,
//! so it cannot reject an argument just because nothing declared it yet;
//! unknown tokens are deferred. Once registration has finished, the
//! dispatched handler parses the same vector again against a grammar
//! scoped to its command, and this time every token has to be accounted
//! for. The strict result replaces the provisional one in the
//! [`Context`]; anything forced between the passes must be re-derived
//! after the replacement.

pub mod bootstrap;
pub mod commands;
pub mod dispatch;
pub mod grammar;
pub mod registry;
pub mod sanitize;

pub use bootstrap::Bootstrap;
pub use dispatch::Dispatcher;
pub use grammar::{CommandGrammar, Grammar, ParsedArgs};
pub use registry::{CommandEntry, CommandFn, CommandRegistry, Next};
pub use sanitize::CleanOutcome;

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::engine::{self, Config, Dump, Persistent, Session};

/// Startup state threaded from bootstrap through dispatch into the
/// handlers.
#[derive(Debug)]
pub struct Context {
    /// The sanitized argument vector, program name included. Both
    /// parse passes read from here.
    pub argv: Vec<OsString>,
    /// The current parse result: provisional after bootstrap, replaced
    /// by the handler's strict parse.
    pub args: ParsedArgs,
    /// Sorted registry snapshot, taken at dispatch; the strict
    /// grammar's command help text comes from here.
    pub commands: Vec<String>,
    /// Markers surviving an in-process reload.
    pub session: Session,
    /// Startup settings handed to the rest of the engine.
    pub config: Config,
    /// Persistent-data routing for the resolved savedir.
    pub persistent: Persistent,
    /// What the process exits with after a Stop. Handlers may raise it;
    /// usage errors never come through here.
    pub exit_code: i32,
}

impl Context {
    /// Strict-parse the full argument vector against a command grammar.
    ///
    /// The result replaces [`Context::args`] and is also returned. On a
    /// usage error this prints the message and exits the process; on
    /// `--help` or `--version` it exits 0.
    pub fn parse_command_args(&mut self, grammar: &CommandGrammar) -> ParsedArgs {
        let parsed = Grammar::strict(&self.commands, Some(grammar)).parse(&self.argv, &self.session);
        self.args = parsed.clone();
        parsed
    }

    /// Strict-parse expecting no command-scoped arguments at all, so
    /// any leftover token is a usage error.
    pub fn takes_no_arguments(&mut self, description: &str) -> ParsedArgs {
        let grammar = CommandGrammar::new(self.args.command.clone()).about(description);
        self.parse_command_args(&grammar)
    }
}

/// Run the front-end: sanitize, bootstrap, register, dispatch, and
/// hand off.
///
/// Returns the process exit code for the normal paths. Usage errors and
/// `--help`/`--version` exit directly from the parse they occur in.
pub fn run() -> Result<i32> {
    let mut argv: Vec<OsString> = env::args_os().collect();
    let mut session = Session::new();

    let boot = bootstrap::bootstrap(&mut argv, &mut session);

    enable_trace(boot.args.trace)?;
    if !boot.unknown.is_empty() {
        debug!(tokens = ?boot.unknown, "unknown arguments deferred to the dispatch pass");
    }

    let mut config = Config::new(&boot.args.basedir);
    config.savedir = engine::resolve_savedir(boot.args.savedir.as_deref(), &config.basedir)?;
    config.safe_mode = boot.args.safe_mode;
    config.compile = boot.args.compile;
    config.compile_python = boot.args.compile_python;
    config.keep_orphan_rpyc = boot.args.keep_orphan_rpyc;
    config.errors_in_editor = boot.args.errors_in_editor;

    let persistent = Persistent::new(config.savedir.clone());

    let mut ctx = Context {
        argv,
        args: boot.args,
        commands: Vec::new(),
        session,
        config,
        persistent,
        exit_code: 0,
    };

    let mut registry = CommandRegistry::new();
    commands::register_builtins(&mut registry);

    let next = Dispatcher::new(&registry).dispatch(&mut ctx)?;

    if next == Next::Continue {
        if let Some(path) = ctx.args.json_dump.clone() {
            let dump = Dump::new(
                &ctx.args.basedir,
                &ctx.args.command,
                &ctx.commands,
                ctx.args.json_dump_private,
                ctx.args.json_dump_common,
            );
            dump.write(Path::new(&path))?;
        }
        engine::start(&ctx.config);
    }

    Ok(ctx.exit_code)
}

/// Install the startup trace writer when `--trace` asks for one.
///
/// Level 1 logs debug events, 2 and above per-event trace, both into
/// `trace.txt` in the working directory. Level 0 installs nothing.
fn enable_trace(level: i32) -> Result<()> {
    if level <= 0 {
        return Ok(());
    }

    let file = File::create("trace.txt").context("creating trace.txt")?;
    let max = if level >= 2 {
        tracing::Level::TRACE
    } else {
        tracing::Level::DEBUG
    };

    // A second init (a reload re-entering bootstrap) keeps the first
    // subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(max)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A context over a lenient parse of `tokens`, with throwaway
    /// engine state. Tests that exercise real filesystem paths swap in
    /// their own config or persistent store.
    pub fn context(tokens: &[&str]) -> Context {
        let argv: Vec<OsString> = std::iter::once("vireo")
            .chain(tokens.iter().copied())
            .map(OsString::from)
            .collect();
        let session = Session::new();
        let (args, _) = Grammar::lenient()
            .try_parse_known(&argv, &session)
            .expect("test argv parses leniently");

        Context {
            argv,
            args,
            commands: Vec::new(),
            session,
            config: Config::default(),
            persistent: Persistent::new(env::temp_dir().join("vireo-test-unused")),
            exit_code: 0,
        }
    }
}
