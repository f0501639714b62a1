//! cli::grammar
//!
//! The argument grammar and the generic parse routine.
//!
//! # Overview
//!
//! One grammar serves both passes. [`Grammar::lenient`] builds the
//! bootstrap form: positionals optional with defaults, no help flag, and
//! unknown tokens deferred rather than fatal, because commands
//! registered later may declare them. [`Grammar::strict`] builds the
//! dispatch form for one command: positionals required unless the
//! command opts out, `-h`/`--help` registered, command-scoped arguments
//! appended under the command's own heading, and unknown tokens fatal.
//!
//! # Compile Forcing
//!
//! Every parse finishes by applying the same rules, in order:
//!
//! 1. A reloading session forces `compile` off; the scripts in memory
//!    were already compiled when the process started.
//! 2. A compile-forcing command forces it on; those commands exist to
//!    rewrite compiled scripts.
//! 3. A session-level compile request forces it on.
//!
//! Rule 2 runs after rule 1 on purpose: reloading into `compile` must
//! still recompile.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::trace;

use crate::engine::Session;

/// Commands that rewrite compiled scripts; parsing one of them turns
/// the compile flag on even without `--compile`.
pub const COMPILE_COMMANDS: &[&str] = &["compile", "add_from", "merge_strings"];

/// The command assumed when none is given.
pub const DEFAULT_COMMAND: &str = "run";

/// Everything a parse pass recovered from the argument vector.
///
/// The global flags are broken out into fields; command-scoped
/// arguments stay behind [`ParsedArgs::flag`] and [`ParsedArgs::value`],
/// since only the handler that declared them knows their names.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    /// The base directory of the project.
    pub basedir: String,
    /// The command to execute.
    pub command: String,
    /// Override for the save-data directory.
    pub savedir: Option<String>,
    /// Startup trace level written to trace.txt.
    pub trace: i32,
    /// Recompile scripts as they load. Subject to the forcing rules.
    pub compile: bool,
    /// Recompile embedded bytecode as it loads.
    pub compile_python: bool,
    /// Keep compiled scripts whose source is gone.
    pub keep_orphan_rpyc: bool,
    /// Redirect `run` to `lint`. Hidden flag, also forced by the
    /// bootstrap pass when the command is literally `lint`.
    pub lint: bool,
    /// Open reported errors in a text editor.
    pub errors_in_editor: bool,
    /// Start in safe mode.
    pub safe_mode: bool,
    /// A `file:line` warp target, only meaningful with `run`.
    pub warp: Option<String>,
    /// File to dump startup state into as JSON.
    pub json_dump: Option<String>,
    /// Dump names beginning with an underscore.
    pub json_dump_private: bool,
    /// Dump engine-provided (common) names.
    pub json_dump_common: bool,

    matches: ArgMatches,
}

impl ParsedArgs {
    fn from_matches(matches: ArgMatches, session: &Session) -> Self {
        let mut args = ParsedArgs {
            basedir: matches
                .get_one::<String>("basedir")
                .cloned()
                .unwrap_or_default(),
            command: matches
                .get_one::<String>("command")
                .cloned()
                .unwrap_or_else(|| DEFAULT_COMMAND.to_owned()),
            savedir: matches.get_one::<String>("savedir").cloned(),
            trace: matches.get_one::<i32>("trace").copied().unwrap_or(0),
            compile: matches.get_flag("compile"),
            compile_python: matches.get_flag("compile_python"),
            keep_orphan_rpyc: matches.get_flag("keep_orphan_rpyc"),
            lint: matches.get_flag("lint"),
            errors_in_editor: matches.get_flag("errors_in_editor"),
            safe_mode: matches.get_flag("safe_mode"),
            warp: matches.get_one::<String>("warp").cloned(),
            json_dump: matches.get_one::<String>("json_dump").cloned(),
            json_dump_private: matches.get_flag("json_dump_private"),
            json_dump_common: matches.get_flag("json_dump_common"),
            matches,
        };

        // The forcing rules, in their fixed order.
        if session.reloading {
            args.compile = false;
        }
        if COMPILE_COMMANDS.contains(&args.command.as_str()) {
            args.compile = true;
        }
        if session.compile_requested {
            args.compile = true;
        }

        args
    }

    /// A command-scoped boolean flag.
    ///
    /// # Panics
    ///
    /// Panics if the active grammar never declared `id`; a handler only
    /// queries arguments from its own [`CommandGrammar`].
    pub fn flag(&self, id: &str) -> bool {
        self.matches.get_flag(id)
    }

    /// A command-scoped string value, if present.
    ///
    /// # Panics
    ///
    /// Panics if the active grammar never declared `id`.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.matches.get_one::<String>(id).map(String::as_str)
    }
}

/// Command-scoped additions to the strict grammar.
///
/// A handler describes itself with one of these and hands it to
/// [`Grammar::strict`] (usually through the context helpers): a name for
/// the help heading, a description, and the arguments only this command
/// understands.
#[derive(Debug, Clone)]
pub struct CommandGrammar {
    name: String,
    about: Option<String>,
    require_command: bool,
    args: Vec<Arg>,
}

impl CommandGrammar {
    /// A grammar for the named command with no extra arguments yet.
    pub fn new(name: impl Into<String>) -> Self {
        CommandGrammar {
            name: name.into(),
            about: None,
            require_command: true,
            args: Vec::new(),
        }
    }

    /// Describe the command in its help output.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    /// Whether the positionals stay required.
    ///
    /// `run` opts out so a bare invocation keeps working with the same
    /// defaults the bootstrap pass used.
    pub fn require_command(mut self, required: bool) -> Self {
        self.require_command = required;
        self
    }

    /// Add a command-scoped argument.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// The command this grammar belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An immutable grammar description plus the parse routine over it.
#[derive(Debug, Clone)]
pub struct Grammar {
    cmd: Command,
}

impl Grammar {
    /// The bootstrap grammar: optional positionals, no help flag.
    pub fn lenient() -> Self {
        Grammar {
            cmd: base_command(false, &[], false),
        }
    }

    /// The dispatch grammar for one command.
    ///
    /// `commands` is the sorted registry snapshot shown in the command
    /// positional's help text. `for_command` appends the command's own
    /// arguments under a `{name} command arguments` heading.
    pub fn strict(commands: &[String], for_command: Option<&CommandGrammar>) -> Self {
        let required = for_command.map_or(true, |sub| sub.require_command);
        let mut cmd = base_command(required, commands, true);

        if let Some(sub) = for_command {
            if let Some(about) = &sub.about {
                cmd = cmd.after_help(about.clone());
            }
            if !sub.args.is_empty() {
                cmd = cmd.next_help_heading(format!("{} command arguments", sub.name));
                for arg in &sub.args {
                    cmd = cmd.arg(arg.clone());
                }
            }
        }

        Grammar { cmd }
    }

    /// Parse the full vector, exiting the process on any usage error.
    ///
    /// `--help` and `--version` exit 0 here; everything else that fails
    /// exits 2 with a usage message. The caller never sees an error.
    pub fn parse(&self, argv: &[OsString], session: &Session) -> ParsedArgs {
        self.try_parse(argv, session)
            .unwrap_or_else(|err| err.exit())
    }

    /// Parse the full vector, returning clap's error instead of exiting.
    pub fn try_parse(&self, argv: &[OsString], session: &Session) -> Result<ParsedArgs, clap::Error> {
        let matches = self.cmd.clone().try_get_matches_from(argv)?;
        Ok(ParsedArgs::from_matches(matches, session))
    }

    /// Parse while tolerating unknown tokens, exiting only on hard
    /// errors (`--version`, or a known flag with a bad value).
    ///
    /// Returns the parse result and the unknown tokens, in the order
    /// they were encountered.
    pub fn parse_known(&self, argv: &[OsString], session: &Session) -> (ParsedArgs, Vec<String>) {
        self.try_parse_known(argv, session)
            .unwrap_or_else(|err| err.exit())
    }

    /// [`Grammar::parse_known`], returning hard errors instead of
    /// exiting.
    pub fn try_parse_known(
        &self,
        argv: &[OsString],
        session: &Session,
    ) -> Result<(ParsedArgs, Vec<String>), clap::Error> {
        let mut argv: Vec<OsString> = argv.to_vec();
        let mut unknown = Vec::new();

        // Each round removes one token from argv, so this terminates.
        loop {
            match self.cmd.clone().try_get_matches_from(&argv) {
                Ok(matches) => {
                    return Ok((ParsedArgs::from_matches(matches, session), unknown));
                }
                Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                    let Some(token) = unexpected_token(&err) else {
                        return Err(err);
                    };
                    if !remove_token(&mut argv, &token) {
                        return Err(err);
                    }
                    trace!(token = %token, "deferring unknown argument to the dispatch pass");
                    unknown.push(token);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// A usage error rendered against this grammar, for failures the
    /// parser itself cannot see (an unregistered command name).
    pub fn usage_error(&self, message: impl std::fmt::Display) -> clap::Error {
        let mut cmd = self.cmd.clone();
        cmd.error(ErrorKind::InvalidValue, message)
    }
}

/// The token an unknown-argument error complains about.
fn unexpected_token(err: &clap::Error) -> Option<String> {
    for (kind, value) in err.context() {
        if kind == ContextKind::InvalidArg {
            if let ContextValue::String(s) = value {
                return Some(s.clone());
            }
        }
    }
    None
}

/// Remove the first occurrence of an unknown token from argv.
///
/// Matches the exact token, its `token=value` spelling, or a token the
/// reported form prefixes (clap reports `-x` for a collapsed `-xyz`).
/// The program name is never touched.
fn remove_token(argv: &mut Vec<OsString>, token: &str) -> bool {
    let eq_form = format!("{token}=");

    let position = argv.iter().enumerate().skip(1).find_map(|(idx, arg)| {
        let arg = arg.to_string_lossy();
        let matched = arg == token
            || arg.starts_with(&eq_form)
            || (token.starts_with('-') && arg.starts_with(token));
        matched.then_some(idx)
    });

    match position {
        Some(idx) => {
            argv.remove(idx);
            true
        }
        None => false,
    }
}

/// The global grammar shared by every mode.
fn base_command(positionals_required: bool, commands: &[String], with_help: bool) -> Command {
    let command_names = commands.join(", ");

    let basedir = Arg::new("basedir")
        .help("The base directory of the project to run. Defaults to the current directory.");
    let command = Arg::new("command").help(format!(
        "The command to execute. Available commands are: {command_names}. Defaults to 'run'."
    ));

    let (basedir, command) = if positionals_required {
        (basedir.required(true), command.required(true))
    } else {
        (
            basedir.required(false).default_value(""),
            command.required(false).default_value(DEFAULT_COMMAND),
        )
    };

    let mut cmd = Command::new("vireo")
        .about("The Vireo visual novel engine.")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(basedir)
        .arg(command)
        .arg(
            Arg::new("savedir")
                .long("savedir")
                .value_name("DIRECTORY")
                .help("The directory where saves and persistent data are placed."),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .value_name("LEVEL")
                .value_parser(value_parser!(i32))
                .default_value("0")
                .help("The level of trace Vireo writes to trace.txt. (1=debug, 2=trace)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .action(ArgAction::Version)
                .help("Displays the version of Vireo in use."),
        )
        .arg(
            Arg::new("compile")
                .long("compile")
                .action(ArgAction::SetTrue)
                .help("Forces all .rpy scripts to be recompiled before proceeding."),
        )
        .arg(
            Arg::new("compile_python")
                .long("compile-python")
                .action(ArgAction::SetTrue)
                .help("Forces embedded Python to be recompiled, rather than read from the bytecode cache."),
        )
        .arg(
            Arg::new("keep_orphan_rpyc")
                .long("keep-orphan-rpyc")
                .action(ArgAction::SetTrue)
                .help("Prevents the compile command from deleting orphan rpyc files."),
        )
        .arg(
            Arg::new("lint")
                .long("lint")
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .arg(
            Arg::new("errors_in_editor")
                .long("errors-in-editor")
                .action(ArgAction::SetTrue)
                .help("Causes errors to open in a text editor."),
        )
        .arg(
            Arg::new("safe_mode")
                .long("safe-mode")
                .action(ArgAction::SetTrue)
                .help("Forces Vireo to start in safe mode, allowing the player to configure graphics."),
        )
        .arg(
            Arg::new("warp")
                .long("warp")
                .value_name("FILE:LINE")
                .help(
                    "Warps to the statement before the given line once the game starts. \
                     Only valid in conjunction with the run command.",
                ),
        );

    if with_help {
        cmd = cmd.arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help("Displays this help message, then exits."),
        );
    }

    cmd.next_help_heading("JSON dump arguments")
        .arg(
            Arg::new("json_dump")
                .long("json-dump")
                .value_name("FILE")
                .help("The JSON file information about the game is dumped to."),
        )
        .arg(
            Arg::new("json_dump_private")
                .long("json-dump-private")
                .action(ArgAction::SetTrue)
                .help("Include private names. (Names beginning with _.)"),
        )
        .arg(
            Arg::new("json_dump_common")
                .long("json-dump-common")
                .action(ArgAction::SetTrue)
                .help("Include names the engine provides to every game."),
        )
}
