use chrono::{DateTime, FixedOffset};
use std::fmt;

use super::tag::TagRef;

/// Classification of a changed path in the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCategory {
    Added,
    Staged,
    Removed,
    Untracked,
    Modified,
    Missing,
    Ignored,
}

impl ChangeCategory {
    pub const ALL: [ChangeCategory; 7] = [
        ChangeCategory::Added,
        ChangeCategory::Staged,
        ChangeCategory::Removed,
        ChangeCategory::Untracked,
        ChangeCategory::Modified,
        ChangeCategory::Missing,
        ChangeCategory::Ignored,
    ];

    /// Whether paths in this category count as uncommitted work
    pub fn is_uncommitted(self) -> bool {
        !matches!(self, ChangeCategory::Ignored)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Number of changed paths per [`ChangeCategory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeCounts {
    counts: [u32; 7],
}

impl WorkingTreeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ChangeCategory) -> u32 {
        self.counts[category.index()]
    }

    pub fn record(&mut self, category: ChangeCategory) {
        self.counts[category.index()] += 1;
    }

    /// Builder-style setter, mostly handy in tests
    pub fn with(mut self, category: ChangeCategory, count: u32) -> Self {
        self.counts[category.index()] = count;
        self
    }

    /// Sum over every category except [`ChangeCategory::Ignored`]
    pub fn uncommitted_changes(&self) -> u32 {
        ChangeCategory::ALL
            .iter()
            .filter(|category| category.is_uncommitted())
            .map(|category| self.get(*category))
            .sum()
    }
}

impl fmt::Display for WorkingTreeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ChangeCategory::*;
        write!(
            f,
            "+{} ~{} -{} | +{} ~{} -{} | i{}",
            self.get(Added),
            self.get(Staged),
            self.get(Removed),
            self.get(Untracked),
            self.get(Modified),
            self.get(Missing),
            self.get(Ignored)
        )
    }
}

/// Snapshot of everything version derivation needs from a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryFacts {
    pub latest_tag: Option<TagRef>,
    pub total_commits: u32,
    /// Commits authored at or after the latest tag's commit, 0 without a tag
    pub commits_since_tag: u32,
    pub branch_name: String,
    pub head_sha: String,
    pub head_commit_date: DateTime<FixedOffset>,
    pub working_tree: WorkingTreeCounts,
}
