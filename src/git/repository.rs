use crate::domain::TagRef;
use crate::error::Result;
use crate::git::{to_datetime, HeadCommit};
use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, Repository as Git2Repo, StatusOptions};
use std::path::Path;
use tracing::{debug, trace};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`, walking up parent directories.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - A repository was found
    /// * `Ok(None)` - `path` is not inside any repository
    /// * `Err` - Discovery failed for another reason (permissions, corruption)
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match Git2Repo::discover(path.as_ref()) {
            Ok(repo) => {
                debug!(path = %repo.path().display(), "discovered repository");
                Ok(Some(Git2Repository { repo }))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // tags on trees or blobs have no commit time
            let timestamp = match reference.peel_to_commit() {
                Ok(commit) => {
                    let when = commit.author().when();
                    Some(to_datetime(when)?)
                }
                Err(_) => None,
            };
            trace!(tag = name, ?timestamp, "found tag");
            tags.push(TagRef::new(name, timestamp));
        }

        Ok(tags)
    }

    fn commit_timestamps(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut timestamps = Vec::new();
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            let when = commit.author().when();
            timestamps.push(to_datetime(when)?);
        }

        Ok(timestamps)
    }

    fn head_commit(&self) -> Result<HeadCommit> {
        let commit = self.repo.head()?.peel_to_commit()?;
        let date = to_datetime(commit.author().when())?;

        Ok(HeadCommit {
            sha: commit.id().to_string(),
            date,
        })
    }

    fn branch_name(&self) -> Result<String> {
        if self.repo.head_detached()? {
            return Ok("(no branch)".to_string());
        }

        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("(no branch)").to_string())
    }

    fn statuses(&self) -> Result<Vec<git2::Status>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(true)
            .renames_head_to_index(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.iter().map(|entry| entry.status()).collect())
    }

    fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}
