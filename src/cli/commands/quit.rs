//! cli::commands::quit
//!
//! Validate the command line and exit without doing anything.

use anyhow::Result;

use crate::cli::registry::Next;
use crate::cli::Context;

/// Useful for scripts that only want the side effects of startup
/// parsing, and as the smallest possible command.
pub fn quit(ctx: &mut Context) -> Result<Next> {
    ctx.takes_no_arguments("Quits without doing anything.");
    Ok(Next::Stop)
}
