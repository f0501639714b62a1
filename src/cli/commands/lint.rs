//! cli::commands::lint
//!
//! Check the project and report problems.

use std::fs;

use anyhow::{Context as _, Result};
use clap::{Arg, ArgAction};

use crate::cli::grammar::CommandGrammar;
use crate::cli::registry::Next;
use crate::cli::Context;
use crate::engine;

/// Run the structural project checks and write the report.
///
/// Reached both as the `lint` command and through the hidden `--lint`
/// flag on `run`; the dispatcher redirects the latter here.
pub fn lint(ctx: &mut Context) -> Result<Next> {
    let grammar = CommandGrammar::new("lint")
        .about("Checks the project for errors.")
        .arg(
            Arg::new("filename")
                .help("The file to write the results of lint to. Defaults to standard output."),
        )
        .arg(
            Arg::new("error_code")
                .long("error-code")
                .action(ArgAction::SetTrue)
                .help("If given, the process exits with status 1 when lint finds a problem."),
        );

    let args = ctx.parse_command_args(&grammar);

    let report = engine::lint::check(&ctx.config.basedir);

    match args.value("filename") {
        Some(path) => fs::write(path, report.to_string())
            .with_context(|| format!("writing lint report to '{path}'"))?,
        None => print!("{report}"),
    }

    if args.flag("error_code") && !report.passed() {
        ctx.exit_code = 1;
    }

    Ok(Next::Stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing;

    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    fn project_with_script(dir: &Path) {
        fs::create_dir(dir.join("game")).unwrap();
        let mut script = File::create(dir.join("game/script.rpy")).unwrap();
        writeln!(script, "label start:").unwrap();
    }

    #[test]
    fn clean_project_stops_with_exit_code_zero() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());

        let base = dir.path().to_string_lossy().into_owned();
        let mut ctx = testing::context(&[&base, "lint"]);
        ctx.config.basedir = dir.path().to_path_buf();

        assert_eq!(lint(&mut ctx).unwrap(), Next::Stop);
        assert_eq!(ctx.exit_code, 0);
    }

    #[test]
    fn report_is_written_to_the_named_file() {
        let dir = tempfile::tempdir().unwrap();
        project_with_script(dir.path());
        let report_path = dir.path().join("lint.txt");

        let base = dir.path().to_string_lossy().into_owned();
        let report_arg = report_path.to_string_lossy().into_owned();
        let mut ctx = testing::context(&[&base, "lint", &report_arg]);
        ctx.config.basedir = dir.path().to_path_buf();

        lint(&mut ctx).unwrap();

        let written = fs::read_to_string(&report_path).unwrap();
        assert_eq!(written, "No problems found.\n");
    }

    #[test]
    fn error_code_flag_reports_problems_in_the_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        // No game/ directory, so lint has something to find.

        let base = dir.path().to_string_lossy().into_owned();
        let mut ctx = testing::context(&[&base, "lint", "--error-code"]);
        ctx.config.basedir = dir.path().to_path_buf();

        assert_eq!(lint(&mut ctx).unwrap(), Next::Stop);
        assert_eq!(ctx.exit_code, 1);
    }

    #[test]
    fn without_the_flag_problems_leave_the_exit_code_alone() {
        let dir = tempfile::tempdir().unwrap();

        let base = dir.path().to_string_lossy().into_owned();
        let mut ctx = testing::context(&[&base, "lint"]);
        ctx.config.basedir = dir.path().to_path_buf();

        lint(&mut ctx).unwrap();
        assert_eq!(ctx.exit_code, 0);
    }
}
