//! cli::commands::compile
//!
//! Force scripts to be recompiled, then stop.

use anyhow::Result;

use crate::cli::registry::Next;
use crate::cli::Context;

/// The recompilation itself is driven by the compile flag, which
/// parsing forces on for this command; the script pipeline honors it as
/// scripts load. The handler only has to validate the command line and
/// stop instead of starting the game.
pub fn compile(ctx: &mut Context) -> Result<Next> {
    ctx.takes_no_arguments("Recompiles the game script.");
    Ok(Next::Stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing;

    #[test]
    fn compile_stops_after_validation() {
        let mut ctx = testing::context(&["mygame", "compile"]);
        assert_eq!(compile(&mut ctx).unwrap(), Next::Stop);
    }

    #[test]
    fn compile_command_arrives_with_the_compile_flag_forced() {
        let ctx = testing::context(&["mygame", "compile"]);
        assert!(ctx.args.compile);
    }
}
