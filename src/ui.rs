//! Console output for the user.
//!
//! Diagnostics go to stdout, errors to stderr. Colours come from `console`
//! and are dropped automatically when the stream is not a terminal.

use std::path::Path;

use console::style;

use crate::cli::orchestration::RunReport;
use crate::domain::{RepositoryFacts, VersionMode, VersionSet};
use crate::project::SkipReason;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Report a project file that was left untouched and why.
pub fn display_skip(path: &Path, reason: &SkipReason) {
    println!(
        "{} Unable to update file: {}",
        style("!").yellow(),
        path.display()
    );
    println!("  {}", style(reason).dim());
}

/// Show the repository snapshot and the versions derived from it.
pub fn display_versions(facts: &RepositoryFacts, versions: &VersionSet, mode: VersionMode) {
    let tag = facts
        .latest_tag
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("(none)");

    println!("\n{}", style("Repository").bold());
    println!("  Branch:       {}", facts.branch_name);
    println!("  Latest tag:   {}", tag);
    println!("  Commits:      {}", facts.total_commits);
    println!("  Working tree: {}", facts.working_tree);

    println!("\n{} ({})", style("Versions").bold(), mode);
    println!("  AssemblyVersion:      {}", style(&versions.assembly_version).green());
    println!("  FileVersion:          {}", style(&versions.file_version).green());
    println!("  InformationalVersion: {}", style(&versions.informational_version).green());
    println!("  Version:              {}\n", style(&versions.public_version).green());
}

/// One-line tally printed at the end of a run.
pub fn display_summary(report: &RunReport, dry_run: bool) {
    if !report.repository_found {
        return;
    }

    let verb = if dry_run { "would update" } else { "updated" };
    let line = format!(
        "{} {}, {} unchanged, {} skipped, {} failed",
        report.updated.len(),
        verb,
        report.unchanged.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if report.has_failures() {
        display_error(&line);
    } else {
        display_success(&line);
    }
}
