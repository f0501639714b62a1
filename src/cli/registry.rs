//! cli::registry
//!
//! The set of dispatchable commands.
//!
//! # Overview
//!
//! Commands are registered by name during engine init, after bootstrap
//! and before dispatch. The registry is an explicit value owned by the
//! startup sequence and lent to the [`Dispatcher`]; nothing here is
//! process-global. The strict grammar's command help text is always
//! generated from [`CommandRegistry::names`], so the help and the
//! registry cannot disagree.
//!
//! [`Dispatcher`]: super::dispatch::Dispatcher

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use tracing::trace;

use super::Context;

/// What a command handler wants done after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Proceed with normal startup: load the game and run it.
    Continue,
    /// Exit the process with the context's exit code.
    Stop,
}

/// A command handler. It receives the startup context and usually
/// begins by strict-parsing the argument vector against its own
/// [`CommandGrammar`].
///
/// [`CommandGrammar`]: super::grammar::CommandGrammar
pub type CommandFn = Box<dyn Fn(&mut Context) -> Result<Next>>;

/// One registered command.
pub struct CommandEntry {
    /// The name the command is dispatched under.
    pub name: String,
    /// Whether the command opens a window. Commands that do not get the
    /// audio and video drivers pointed at the dummy driver.
    pub needs_display: bool,
    /// The handler invoked at dispatch.
    pub handler: CommandFn,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("needs_display", &self.needs_display)
            .finish_non_exhaustive()
    }
}

/// Registered commands, keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandEntry>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Registering a name again replaces the
    /// earlier entry; a game overriding a built-in is expected.
    pub fn register<F>(&mut self, name: &str, needs_display: bool, handler: F)
    where
        F: Fn(&mut Context) -> Result<Next> + 'static,
    {
        trace!(command = name, needs_display, "registered command");
        self.entries.insert(
            name.to_owned(),
            CommandEntry {
                name: name.to_owned(),
                needs_display,
                handler: Box::new(handler),
            },
        );
    }

    /// The entry registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    /// Sorted command names, for the strict grammar's help text.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("names", &self.names())
            .finish()
    }
}
