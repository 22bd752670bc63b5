//! Domain logic - pure version rules independent of git operations

pub mod facts;
pub mod tag;
pub mod version;

pub use facts::{ChangeCategory, RepositoryFacts, WorkingTreeCounts};
pub use tag::{compare_version_aware, latest_tag, ParsedTag, TagRef};
pub use version::{format_commit_date, VersionMode, VersionSet};
