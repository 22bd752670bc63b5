use crate::domain::TagRef;
use crate::error::{GitVerError, Result};
use crate::git::{HeadCommit, Repository};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: Vec<TagRef>,
    commits: Vec<DateTime<FixedOffset>>,
    head: Option<HeadCommit>,
    branch: String,
    statuses: Vec<git2::Status>,
    workdir: Option<PathBuf>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            commits: Vec::new(),
            head: None,
            branch: "main".to_string(),
            statuses: Vec::new(),
            workdir: None,
        }
    }

    /// Add a commit; the most recent one becomes HEAD
    pub fn add_commit(&mut self, sha: impl Into<String>, date: DateTime<FixedOffset>) {
        self.commits.push(date);
        self.head = Some(HeadCommit {
            sha: sha.into(),
            date,
        });
    }

    /// Add a tag pointing at a commit authored at `date`
    pub fn add_tag(&mut self, name: impl Into<String>, date: Option<DateTime<FixedOffset>>) {
        self.tags.push(TagRef::new(name, date));
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Add one working-tree entry with the given status flags
    pub fn add_status(&mut self, status: git2::Status) {
        self.statuses.push(status);
    }

    pub fn set_workdir(&mut self, workdir: impl Into<PathBuf>) {
        self.workdir = Some(workdir.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn commit_timestamps(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        Ok(self.commits.clone())
    }

    fn head_commit(&self) -> Result<HeadCommit> {
        self.head
            .clone()
            .ok_or_else(|| GitVerError::Git(git2::Error::from_str("HEAD has no commits")))
    }

    fn branch_name(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn statuses(&self) -> Result<Vec<git2::Status>> {
        Ok(self.statuses.clone())
    }

    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }
}
