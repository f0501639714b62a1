//! cli::commands::run
//!
//! The default command: start the game normally.

use anyhow::Result;
use clap::{Arg, ArgAction};
use tracing::debug;

use crate::cli::grammar::CommandGrammar;
use crate::cli::registry::Next;
use crate::cli::Context;

/// Strict-parse the run-scoped flags, arm the warp target once per
/// process, and continue into normal startup.
///
/// The positionals stay optional here: a bare `vireo` must keep working
/// with the same defaults the bootstrap pass used.
pub fn run(ctx: &mut Context) -> Result<Next> {
    let grammar = CommandGrammar::new("run")
        .about("Runs the current project normally.")
        .require_command(false)
        .arg(
            Arg::new("profile_display")
                .long("profile-display")
                .action(ArgAction::SetTrue)
                .help("If present, Vireo will report the amount of time it takes to draw the screen."),
        )
        .arg(
            Arg::new("debug_image_cache")
                .long("debug-image-cache")
                .action(ArgAction::SetTrue)
                .help("If present, Vireo will log information regarding the contents of the image cache."),
        );

    let args = ctx.parse_command_args(&grammar);

    // Warp applies once per process; a reload keeps the session marker
    // and skips it.
    if let Some(warp) = &args.warp {
        if !ctx.session.warped {
            ctx.session.warped = true;
            ctx.config.warp_spec = Some(warp.clone());
            debug!(spec = %warp, "warp target armed");
        }
    }

    if args.flag("profile_display") {
        ctx.config.profile = true;
    }
    if args.flag("debug_image_cache") {
        ctx.config.debug_image_cache = true;
    }

    Ok(Next::Continue)
}
