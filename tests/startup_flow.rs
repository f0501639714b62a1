//! In-process tests of the full bootstrap-to-dispatch flow.
//!
//! These tests exercise the startup sequence the way `cli::run` drives
//! it — sanitize, bootstrap, register, dispatch — but with the pieces
//! wired together by hand so each test can observe the intermediate
//! state and substitute its own handlers.

use std::ffi::OsString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vireo::cli::{bootstrap, commands, Context, Dispatcher, CommandRegistry, Next};
use vireo::engine::{Config, Persistent, Session};

// =============================================================================
// Test Fixtures
// =============================================================================

/// Build an argument vector with the program name prepended.
fn argv(tokens: &[&str]) -> Vec<OsString> {
    std::iter::once("vireo")
        .chain(tokens.iter().copied())
        .map(OsString::from)
        .collect()
}

/// Run the bootstrap pass and assemble the context the way `cli::run`
/// does, minus savedir resolution (tests route persistent data into a
/// throwaway path themselves when they need it).
fn boot_context(tokens: &[&str], session: Session) -> Context {
    let mut argv = argv(tokens);
    let mut session = session;
    let boot = bootstrap::bootstrap(&mut argv, &mut session);

    let mut config = Config::new(&boot.args.basedir);
    config.safe_mode = boot.args.safe_mode;
    config.compile = boot.args.compile;

    Context {
        argv,
        args: boot.args,
        commands: Vec::new(),
        session,
        config,
        persistent: Persistent::new(std::env::temp_dir().join("vireo-flow-unused")),
        exit_code: 0,
    }
}

/// A registry whose handlers only count invocations.
fn counting_registry(names: &[&str]) -> (CommandRegistry, Vec<(String, Arc<AtomicUsize>)>) {
    let mut registry = CommandRegistry::new();
    let mut counters = Vec::new();

    for name in names {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        // needs_display stays true so no test touches the process
        // environment.
        registry.register(name, true, move |_ctx| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(Next::Stop)
        });
        counters.push((name.to_string(), counter));
    }

    (registry, counters)
}

fn calls(counters: &[(String, Arc<AtomicUsize>)], name: &str) -> usize {
    counters
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, c)| c.load(Ordering::SeqCst))
        .expect("counter registered")
}

// =============================================================================
// Bootstrap into dispatch
// =============================================================================

#[test]
fn bare_invocation_dispatches_run() {
    let mut ctx = boot_context(&[], Session::new());
    let (registry, counters) = counting_registry(&["run", "lint"]);

    let next = Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();

    assert_eq!(next, Next::Stop);
    assert_eq!(calls(&counters, "run"), 1);
    assert_eq!(calls(&counters, "lint"), 0);
    assert_eq!(ctx.commands, vec!["lint".to_string(), "run".to_string()]);
}

#[test]
fn lint_flag_redirects_run_to_the_lint_handler() {
    let mut ctx = boot_context(&["mygame", "run", "--lint"], Session::new());
    let (registry, counters) = counting_registry(&["run", "lint"]);

    Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();

    assert_eq!(calls(&counters, "lint"), 1);
    assert_eq!(calls(&counters, "run"), 0);
}

#[test]
fn literal_lint_command_reaches_the_lint_handler() {
    // Bootstrap folds the command into the flag; the registry still
    // resolves it directly because "lint" is registered.
    let mut ctx = boot_context(&["mygame", "lint"], Session::new());
    assert!(ctx.args.lint);

    let (registry, counters) = counting_registry(&["run", "lint"]);
    Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();

    assert_eq!(calls(&counters, "lint"), 1);
}

#[test]
fn launcher_damaged_vector_dispatches_the_default_command() {
    let mut ctx = boot_context(
        &["-EpicPortal", "-epicapp=MyGame", "-epicenv=Prod"],
        Session::new(),
    );
    let (registry, counters) = counting_registry(&["run"]);

    Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();

    assert_eq!(calls(&counters, "run"), 1);
    // The tail stays recoverable for privileged commands.
    let tail = ctx.session.launcher_argv.as_ref().unwrap();
    assert_eq!(tail.len(), 3);
    assert_eq!(tail[1], OsString::from("-epicapp=MyGame"));
}

#[test]
fn unknown_bootstrap_tokens_are_rejected_by_the_strict_pass() {
    // The bootstrap pass tolerates --bogus; the handler's strict parse
    // must not.
    let ctx = boot_context(&["mygame", "quit", "--bogus"], Session::new());
    assert_eq!(ctx.args.command, "quit");

    let strict = vireo::cli::Grammar::strict(&ctx.commands, None)
        .try_parse(&ctx.argv, &ctx.session)
        .unwrap_err();
    assert_eq!(strict.kind(), clap::error::ErrorKind::UnknownArgument);
}

// =============================================================================
// Compile forcing across the pass boundary
// =============================================================================

#[test]
fn compile_command_keeps_forcing_through_the_strict_pass() {
    let mut ctx = boot_context(&["mygame", "compile"], Session::new());
    assert!(ctx.args.compile);

    let mut registry = CommandRegistry::new();
    registry.register("compile", true, |ctx: &mut Context| {
        // The strict replacement re-derives the forced flag from the
        // same rules, so it survives the provisional parse being
        // thrown away.
        let args = ctx.takes_no_arguments("Recompiles the game script.");
        assert!(args.compile);
        Ok(Next::Stop)
    });

    Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();
    assert!(ctx.args.compile);
}

#[test]
fn reload_session_suppresses_compile_for_run() {
    let mut session = Session::new();
    session.reloading = true;

    let ctx = boot_context(&["--compile", "mygame", "run"], session);
    assert!(!ctx.args.compile);
}

#[test]
fn reload_into_a_compile_command_still_compiles() {
    let mut session = Session::new();
    session.reloading = true;

    let ctx = boot_context(&["mygame", "merge_strings"], session);
    assert!(ctx.args.compile);
}

// =============================================================================
// Built-in handlers through dispatch
// =============================================================================

#[test]
fn builtin_quit_stops_without_touching_anything() {
    let mut ctx = boot_context(&["mygame", "quit"], Session::new());

    let mut registry = CommandRegistry::new();
    commands::register_builtins(&mut registry);
    // Re-register quit with needs_display so this test never touches
    // the driver environment variables.
    registry.register("quit", true, commands::quit::quit);

    let next = Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();
    assert_eq!(next, Next::Stop);
    assert_eq!(ctx.exit_code, 0);
}

#[test]
fn builtin_run_arms_the_warp_target_once() {
    let mut ctx = boot_context(&["mygame", "run", "--warp", "script.rpy:42"], Session::new());

    let mut registry = CommandRegistry::new();
    commands::register_builtins(&mut registry);

    let next = Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();
    assert_eq!(next, Next::Continue);
    assert_eq!(ctx.config.warp_spec.as_deref(), Some("script.rpy:42"));
    assert!(ctx.session.warped);

    // A reload re-dispatches against the same session; the warp target
    // must not fire again.
    ctx.config.warp_spec = None;
    Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();
    assert!(ctx.config.warp_spec.is_none());
}

#[test]
fn builtin_rmpersistent_clears_the_savedir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::File::create(dir.path().join("persistent")).unwrap();
    std::fs::File::create(dir.path().join("persistent.bak")).unwrap();

    let mut ctx = boot_context(&["mygame", "rmpersistent"], Session::new());
    ctx.persistent = Persistent::new(dir.path().to_path_buf());

    let mut registry = CommandRegistry::new();
    commands::register_builtins(&mut registry);
    registry.register("rmpersistent", true, commands::rmpersistent::rmpersistent);

    let next = Dispatcher::new(&registry).dispatch(&mut ctx).unwrap();
    assert_eq!(next, Next::Stop);
    assert!(!dir.path().join("persistent").exists());
    assert!(!dir.path().join("persistent.bak").exists());
    assert!(!ctx.persistent.should_save());
}
