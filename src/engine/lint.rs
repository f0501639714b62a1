//! engine::lint
//!
//! Structural checks on a project directory.
//!
//! # Overview
//!
//! The front-end can verify the shape of a project before the script
//! pipeline exists: the project directory is there, it has a `game/`
//! directory, and the game directory holds at least one script. Deeper
//! analysis of the scripts themselves happens inside the pipeline once
//! they are loaded.

use std::fmt;
use std::fs;
use std::path::Path;

/// Problems found while checking a project.
///
/// Renders as one line per problem followed by a summary line, matching
/// what the lint command prints.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    problems: Vec<String>,
}

impl LintReport {
    /// True when no problems were found.
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }

    /// The problems, in the order they were found.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    fn push(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for problem in &self.problems {
            writeln!(f, "{}", problem)?;
        }
        match self.problems.len() {
            0 => writeln!(f, "No problems found."),
            1 => writeln!(f, "1 problem found."),
            n => writeln!(f, "{} problems found.", n),
        }
    }
}

/// Check the project at `basedir`.
///
/// Failures to read the directory tree are reported as problems rather
/// than errors; lint's job is to describe what is wrong, not to stop.
pub fn check(basedir: &Path) -> LintReport {
    let mut report = LintReport::default();

    if !basedir.is_dir() {
        report.push(format!(
            "The project directory '{}' was not found.",
            basedir.display()
        ));
        return report;
    }

    let game = basedir.join("game");
    if !game.is_dir() {
        report.push(format!(
            "'{}' has no game/ directory; it does not look like a project.",
            basedir.display()
        ));
        return report;
    }

    match count_scripts(&game) {
        Ok(0) => report.push(format!(
            "'{}' contains no .rpy scripts; there is nothing to run.",
            game.display()
        )),
        Ok(_) => {}
        Err(err) => report.push(format!("Could not scan '{}': {}.", game.display(), err)),
    }

    report
}

fn count_scripts(game: &Path) -> Result<usize, std::io::Error> {
    let mut count = 0;
    for entry in fs::read_dir(game)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "rpy") {
            count += 1;
        }
    }
    Ok(count)
}
