//! Git access layer
//!
//! The [Repository] trait lists exactly the facts version derivation reads from
//! git. Implementations:
//!
//! - [repository::Git2Repository]: backed by the `git2` crate
//! - [mock::MockRepository]: in-memory, for tests
//!
//! ```rust
//! # use gitver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitver::Result<()> {
//! let head = repo.head_commit()?;
//! println!("{} on {}", head.sha, repo.branch_name()?);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagRef;
use crate::error::{GitVerError, Result};
use chrono::{DateTime, FixedOffset};
use std::path::Path;

/// The commit HEAD points at
#[derive(Debug, Clone, PartialEq)]
pub struct HeadCommit {
    /// Full hex digest
    pub sha: String,
    /// Author time in the author's offset
    pub date: DateTime<FixedOffset>,
}

/// Read-only git queries used to build a [crate::domain::RepositoryFacts].
///
/// All methods return [crate::error::Result<T>]; implementations map
/// `git2::Error` into [crate::error::GitVerError::Git].
pub trait Repository {
    /// Every tag with the author time of the commit it peels to.
    ///
    /// Tags that don't peel to a commit carry `None` as timestamp. Order is
    /// unspecified; callers pick the latest with a comparator.
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Author time of every commit reachable from HEAD
    fn commit_timestamps(&self) -> Result<Vec<DateTime<FixedOffset>>>;

    /// The commit at HEAD
    ///
    /// # Returns
    /// * `Ok(HeadCommit)` - SHA and author date of HEAD
    /// * `Err` - If HEAD is unborn or can't be resolved
    fn head_commit(&self) -> Result<HeadCommit>;

    /// Short name of the checked-out branch, `(no branch)` when detached
    fn branch_name(&self) -> Result<String>;

    /// Raw status flags of every changed, untracked or ignored path
    fn statuses(&self) -> Result<Vec<git2::Status>>;

    /// Root of the working tree, `None` for bare repositories
    fn workdir(&self) -> Option<&Path>;
}

/// Convert a git timestamp into a date in the signer's own offset
pub fn to_datetime(time: git2::Time) -> Result<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).ok_or_else(|| {
        GitVerError::timestamp(format!("offset out of range: {} minutes", time.offset_minutes()))
    })?;
    let utc = DateTime::from_timestamp(time.seconds(), 0)
        .ok_or_else(|| GitVerError::timestamp(format!("seconds out of range: {}", time.seconds())))?;
    Ok(utc.with_timezone(&offset))
}
