//! cli::dispatch
//!
//! Resolution and invocation of the bootstrapped command.
//!
//! # Overview
//!
//! The dispatcher runs once registration has finished. It resolves the
//! effective command (folding the hidden lint flag into a redirect),
//! rejects names nothing registered, quiets the audio and video drivers
//! for commands that never open a window, and invokes the handler. The
//! handler then re-parses the argument vector strictly against its own
//! grammar.
//!
//! # Invariants
//!
//! - A dispatcher is only built over a populated registry; anything else
//!   is a broken init sequence
//! - An unknown command is reported through the strict grammar's usage
//!   error path, never as an internal error
//! - An operator's explicit driver choice is never overridden

use std::env;

use anyhow::Result;
use tracing::debug;

use super::grammar::{Grammar, DEFAULT_COMMAND};
use super::registry::{CommandEntry, CommandRegistry, Next};
use super::Context;

/// Environment variables pointed at the dummy driver for commands that
/// never open a window.
const HEADLESS_DRIVERS: &[&str] = &["SDL_AUDIODRIVER", "SDL_VIDEODRIVER"];

/// Dispatches the bootstrapped command through a registry.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> Dispatcher<'a> {
    /// A dispatcher over a populated registry.
    ///
    /// # Panics
    ///
    /// Panics when the registry is empty. Dispatching before
    /// registration is a bug in the init sequence, not a user mistake,
    /// and must not be reported as one.
    pub fn new(registry: &'a CommandRegistry) -> Self {
        assert!(
            !registry.is_empty(),
            "dispatch before command registration"
        );
        Dispatcher { registry }
    }

    /// Resolve the effective command and invoke its handler.
    ///
    /// Exits the process with a usage error when the effective command
    /// is not registered.
    pub fn dispatch(&self, ctx: &mut Context) -> Result<Next> {
        let entry = match self.resolve(ctx) {
            Ok(entry) => entry,
            Err(err) => err.exit(),
        };

        if !entry.needs_display {
            quiet_drivers();
        }

        debug!(
            command = entry.name,
            needs_display = entry.needs_display,
            "dispatching"
        );
        (entry.handler)(ctx)
    }

    /// Snapshot the registry names into the context, apply the run/lint
    /// redirect, and look the effective command up.
    fn resolve(&self, ctx: &mut Context) -> Result<&CommandEntry, clap::Error> {
        ctx.commands = self.registry.names();

        let command = effective_command(&ctx.args.command, ctx.args.lint);
        match self.registry.lookup(&command) {
            Some(entry) => Ok(entry),
            None => Err(Grammar::strict(&ctx.commands, None)
                .usage_error(format!("Command {command} is unknown."))),
        }
    }
}

/// The run/lint redirect: the hidden lint flag (or a literal `lint`
/// command, which bootstrap folds into the flag) turns a provisional
/// `run` into `lint`. Other commands are never redirected.
fn effective_command(command: &str, lint: bool) -> String {
    if command == DEFAULT_COMMAND && lint {
        "lint".to_owned()
    } else {
        command.to_owned()
    }
}

/// Point the audio and video drivers at the dummy driver, where the
/// operator has not already chosen one.
fn quiet_drivers() {
    for key in HEADLESS_DRIVERS {
        if env::var_os(key).is_none() {
            env::set_var(key, "dummy");
        }
    }
}
