//! cli::commands
//!
//! The built-in command handlers.
//!
//! Each handler owns its command grammar: it strict-parses the full
//! argument vector through the context helpers, performs the command,
//! and says whether startup continues. Registration happens here so the
//! init sequence has one call to make; games may register more commands
//! (or replace these) before the dispatcher is built.

pub mod compile;
pub mod lint;
pub mod quit;
pub mod rmpersistent;
pub mod run;

use super::registry::CommandRegistry;

/// Register every built-in command.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register("run", true, run::run);
    registry.register("lint", false, lint::lint);
    registry.register("compile", false, compile::compile);
    registry.register("rmpersistent", false, rmpersistent::rmpersistent);
    registry.register("quit", false, quit::quit);
}
