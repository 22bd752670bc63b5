use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::facts::RepositoryFacts;

/// Strategy for the third component of the file version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionMode {
    /// major.minor.<commits since the tagged commit>
    PatchFromTagDate,
    /// major.minor.<all commits reachable from HEAD>
    #[default]
    CommitsFromRepoStart,
    /// major.minor.<third segment of the tag name>
    TagThirdSegment,
}

impl VersionMode {
    pub const ALL: [VersionMode; 3] = [
        VersionMode::PatchFromTagDate,
        VersionMode::CommitsFromRepoStart,
        VersionMode::TagThirdSegment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionMode::PatchFromTagDate => "patch-from-tag-date",
            VersionMode::CommitsFromRepoStart => "commits-from-repo-start",
            VersionMode::TagThirdSegment => "tag-third-segment",
        }
    }
}

impl fmt::Display for VersionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = VersionMode::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown version mode '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// The four version strings written into project files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSet {
    pub assembly_version: String,
    pub file_version: String,
    pub informational_version: String,
    pub public_version: String,
}

impl VersionSet {
    /// Derive every version string from a repository snapshot.
    ///
    /// Without a usable tag the major and minor components are `0` and the patch
    /// value is `0`; commit counts still come from the full history. The
    /// informational version carries a `+N` suffix only when `N` uncommitted
    /// changes exist.
    pub fn derive(facts: &RepositoryFacts, mode: VersionMode) -> Self {
        let parsed = facts.latest_tag.as_ref().and_then(|tag| tag.parsed());

        let (major, minor, end_segment, patch) = match parsed {
            Some(tag) => (tag.major, tag.minor, tag.end_segment, facts.commits_since_tag),
            None => (0, 0, 0, 0),
        };

        let mode_value = match mode {
            VersionMode::PatchFromTagDate => patch,
            VersionMode::CommitsFromRepoStart => facts.total_commits,
            VersionMode::TagThirdSegment => end_segment,
        };

        let public_version = format!("{}.{}.{}", major, minor, facts.total_commits);

        let mut informational_version = format!(
            "{}+{}@{}&{}",
            public_version,
            facts.branch_name,
            facts.head_sha,
            format_commit_date(&facts.head_commit_date)
        );
        let uncommitted = facts.working_tree.uncommitted_changes();
        if uncommitted > 0 {
            informational_version.push_str(&format!("+{}", uncommitted));
        }

        VersionSet {
            assembly_version: public_version.clone(),
            file_version: format!("{}.{}.{}", major, minor, mode_value),
            informational_version,
            public_version,
        }
    }
}

/// Invariant `MM/dd/yyyy HH:mm:ss` rendering of the commit's local time.
pub fn format_commit_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%m/%d/%Y %H:%M:%S").to_string()
}
