//! Main workflow orchestration logic
//!
//! Kept apart from `main.rs` so the whole run can be driven programmatically
//! (and from tests) without going through clap.

use std::path::PathBuf;

use tracing::info;

use crate::collector;
use crate::config::Config;
use crate::domain::{VersionMode, VersionSet};
use crate::error::Result;
use crate::git::{Git2Repository, Repository};
use crate::project::{self, ProjectOutcome, SkipReason};
use crate::ui;

/// Arguments for the versioning workflow
#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Where repository discovery starts
    pub directory: PathBuf,

    pub mode: VersionMode,

    /// Compute and report, but never write project files
    pub dry_run: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        RunArgs {
            directory: PathBuf::from("."),
            mode: VersionMode::default(),
            dry_run: false,
        }
    }
}

/// What a run did, file by file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// `false` when no repository (or no working tree) was found
    pub repository_found: bool,
    pub versions: Option<VersionSet>,
    pub updated: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Main versioning workflow
///
/// 1. Discover the repository above `args.directory`
/// 2. Collect repository facts once
/// 3. Derive the version set
/// 4. Apply it to every project file under the working tree
///
/// A missing repository is not an error: a message is printed and an empty
/// report returned.
pub fn run(args: &RunArgs, config: &Config) -> Result<RunReport> {
    let Some(repo) = Git2Repository::discover(&args.directory)? else {
        ui::display_status("Not found git repository, nothing to do");
        return Ok(RunReport::default());
    };

    run_with_repository(&repo, args, config)
}

/// Same as [run] with an already opened repository.
///
/// Each project file is handled on its own: a file that cannot be read,
/// parsed or written is recorded in [RunReport::failed] and the remaining
/// files are still processed.
pub fn run_with_repository<R: Repository + ?Sized>(
    repo: &R,
    args: &RunArgs,
    config: &Config,
) -> Result<RunReport> {
    let Some(workdir) = repo.workdir() else {
        ui::display_status("Repository has no working directory, nothing to do");
        return Ok(RunReport::default());
    };

    let facts = collector::collect(repo)?;
    let versions = VersionSet::derive(&facts, args.mode);
    ui::display_versions(&facts, &versions, args.mode);

    let mut report = RunReport {
        repository_found: true,
        versions: Some(versions.clone()),
        ..RunReport::default()
    };

    let projects = project::discover_projects(workdir, &config.project.extension);
    info!(count = projects.len(), root = %workdir.display(), "discovered project files");

    for path in projects {
        match project::update_file(&path, &versions, &config.project, args.dry_run) {
            Ok(ProjectOutcome::Updated) => {
                let verb = if args.dry_run { "Would update" } else { "Updated" };
                ui::display_success(&format!("{} {}", verb, path.display()));
                report.updated.push(path);
            }
            Ok(ProjectOutcome::Unchanged) => {
                ui::display_status(&format!("Up to date: {}", path.display()));
                report.unchanged.push(path);
            }
            Ok(ProjectOutcome::Skipped(reason)) => {
                ui::display_skip(&path, &reason);
                report.skipped.push((path, reason));
            }
            Err(e) => {
                ui::display_error(&format!("{}: {}", path.display(), e));
                report.failed.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}
