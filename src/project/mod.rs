//! Project file discovery and version field updates
//!
//! - `xml` - Lossless XML tree used for editing
//! - `eligibility` - Checks deciding whether a project may be edited

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::domain::VersionSet;
use crate::error::{GitVerError, Result};

pub mod eligibility;
pub mod xml;

pub use eligibility::SkipReason;
use xml::{Document, Element};

pub const PROPERTY_GROUP: &str = "PropertyGroup";
pub const GENERATE_ASSEMBLY_INFO: &str = "GenerateAssemblyInfo";

pub const ASSEMBLY_VERSION: &str = "AssemblyVersion";
pub const FILE_VERSION: &str = "FileVersion";
pub const INFORMATIONAL_VERSION: &str = "InformationalVersion";
pub const VERSION: &str = "Version";

/// Result of applying versions to a project file's text
#[derive(Debug, Clone, PartialEq)]
pub enum ContentUpdate {
    Skipped(SkipReason),
    Unchanged,
    Changed(String),
}

/// What happened to one project file
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectOutcome {
    /// Content changed (and was written unless running dry)
    Updated,
    Unchanged,
    Skipped(SkipReason),
}

/// Field name / value pairs in the order they are applied
pub fn version_fields(versions: &VersionSet) -> [(&'static str, &str); 4] {
    [
        (ASSEMBLY_VERSION, versions.assembly_version.as_str()),
        (FILE_VERSION, versions.file_version.as_str()),
        (INFORMATIONAL_VERSION, versions.informational_version.as_str()),
        (VERSION, versions.public_version.as_str()),
    ]
}

/// Find project files below `root` with the given extension.
///
/// Results are sorted by path. `.git` directories and symlinks are not
/// followed; unreadable entries are logged and skipped.
pub fn discover_projects(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Set one version field inside the project root.
///
/// The target group is the last property group (document order, any depth)
/// that already has a direct child named `field`, or else the first property
/// group. Inside it the last `field` element is overwritten, or a new one is
/// appended.
pub fn set_version_field(root: &mut Element, field: &str, value: &str) {
    let groups = root.descendant_paths(PROPERTY_GROUP);

    let target = groups
        .iter()
        .rev()
        .find(|path| root.at_path(path).is_some_and(|group| group.has_child(field)))
        .or_else(|| groups.first());

    let Some(group) = target.and_then(|path| root.at_path_mut(path)) else {
        return;
    };

    match group.last_child_index(field).and_then(|i| group.child_mut(i)) {
        Some(existing) => existing.set_text(value),
        None => {
            let mut element = Element::new(field);
            element.set_text(value);
            group.append_child(element);
        }
    }
}

/// Apply `versions` to the text of a project file.
///
/// Blank version strings are not applied. Returns [ContentUpdate::Unchanged]
/// when the edited text is byte-identical to `content`.
pub fn update_content(
    content: &str,
    versions: &VersionSet,
    rules: &ProjectConfig,
) -> Result<ContentUpdate> {
    let mut document = Document::parse(content)?;
    let root = document
        .root_mut()
        .ok_or_else(|| GitVerError::descriptor("no root element"))?;

    if let Some(reason) = eligibility::check(root, rules)? {
        return Ok(ContentUpdate::Skipped(reason));
    }

    for (field, value) in version_fields(versions) {
        if value.trim().is_empty() {
            debug!(field, "blank version value, leaving field alone");
            continue;
        }
        set_version_field(root, field, value);
    }

    let updated = document.to_xml()?;
    if updated == content {
        Ok(ContentUpdate::Unchanged)
    } else {
        Ok(ContentUpdate::Changed(updated))
    }
}

/// Read, update and (unless `dry_run`) rewrite one project file.
///
/// The file is only written when its content actually changes.
pub fn update_file(
    path: &Path,
    versions: &VersionSet,
    rules: &ProjectConfig,
    dry_run: bool,
) -> Result<ProjectOutcome> {
    let original = fs::read_to_string(path)?;

    let outcome = match update_content(&original, versions, rules)? {
        ContentUpdate::Skipped(reason) => ProjectOutcome::Skipped(reason),
        ContentUpdate::Unchanged => ProjectOutcome::Unchanged,
        ContentUpdate::Changed(updated) => {
            if !dry_run {
                fs::write(path, updated)?;
            }
            ProjectOutcome::Updated
        }
    };

    debug!(path = %path.display(), ?outcome, dry_run, "processed project file");
    Ok(outcome)
}
