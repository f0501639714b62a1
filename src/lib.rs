//! Vireo - command-line front-end for the Vireo visual novel engine
//!
//! Vireo starts games from the command line: it repairs argument vectors
//! damaged by platform launchers, works out which command the user asked
//! for before the engine proper exists, and hands control to that
//! command's handler once registration has finished.
//!
//! # Architecture
//!
//! Argument handling happens in two passes:
//!
//! - [`cli`] - Sanitizes argv, bootstraps a provisional parse, registers
//!   the built-in commands, and dispatches to a handler that re-parses
//!   strictly against its own grammar
//! - [`engine`] - The narrow engine surface the front-end needs: session
//!   markers, startup configuration, persistent-data routing, project
//!   lint checks, and the startup JSON dump
//!
//! # Correctness Invariants
//!
//! 1. The sanitizer runs exactly once, before any parse
//! 2. The bootstrap pass never fails on arguments it does not know
//! 3. The dispatch pass never tolerates arguments nothing declared
//! 4. Compile forcing follows a fixed rule order, identically in both
//!    passes

pub mod cli;
pub mod engine;
