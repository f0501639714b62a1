//! cli::commands::rmpersistent
//!
//! Delete the persistent data, then stop.

use anyhow::Result;

use crate::cli::registry::Next;
use crate::cli::Context;

/// Remove every persistent file under the savedir and keep the save
/// system from writing them back during shutdown.
pub fn rmpersistent(ctx: &mut Context) -> Result<Next> {
    ctx.takes_no_arguments("Deletes the persistent data.");

    ctx.persistent.unlink_all()?;
    ctx.persistent.disable_saving();

    Ok(Next::Stop)
}
