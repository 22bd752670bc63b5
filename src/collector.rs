//! Builds the [RepositoryFacts] snapshot from a [Repository].

use std::cmp::Ordering;

use git2::Status;
use tracing::debug;

use crate::domain::{
    compare_version_aware, latest_tag, ChangeCategory, RepositoryFacts, TagRef, WorkingTreeCounts,
};
use crate::error::Result;
use crate::git::Repository;

/// Collect facts using [compare_version_aware] to pick the latest tag
pub fn collect<R: Repository + ?Sized>(repo: &R) -> Result<RepositoryFacts> {
    collect_with(repo, compare_version_aware)
}

/// Collect facts with a custom tag ordering.
///
/// The latest tag is the greatest under `compare`. Commits since the tag are
/// counted inclusively: every commit whose author time is at or after the tag's
/// commit, the tagged commit included.
///
/// # Returns
/// * `Ok(RepositoryFacts)` - Snapshot of the repository
/// * `Err` - If HEAD is unborn or any git query fails
pub fn collect_with<R, F>(repo: &R, compare: F) -> Result<RepositoryFacts>
where
    R: Repository + ?Sized,
    F: Fn(&TagRef, &TagRef) -> Ordering,
{
    let latest_tag = latest_tag(repo.list_tags()?, compare);
    let timestamps = repo.commit_timestamps()?;

    let commits_since_tag = match latest_tag.as_ref().and_then(|tag| tag.target_commit_timestamp) {
        Some(tag_time) => timestamps.iter().filter(|time| **time >= tag_time).count(),
        None => 0,
    };

    let head = repo.head_commit()?;
    let branch_name = repo.branch_name()?;
    let working_tree = count_working_tree(&repo.statuses()?);

    let facts = RepositoryFacts {
        latest_tag,
        total_commits: saturating_count(timestamps.len()),
        commits_since_tag: saturating_count(commits_since_tag),
        branch_name,
        head_sha: head.sha,
        head_commit_date: head.date,
        working_tree,
    };

    debug!(
        tag = facts.latest_tag.as_ref().map(|t| t.name.as_str()),
        total_commits = facts.total_commits,
        commits_since_tag = facts.commits_since_tag,
        branch = %facts.branch_name,
        "collected repository facts"
    );

    Ok(facts)
}

/// Count status entries per category.
///
/// An entry counts once in every category whose flags it carries, so a file
/// staged as new and then edited again is both Added and Modified. Renames and
/// type changes belong to no category.
pub fn count_working_tree(statuses: &[Status]) -> WorkingTreeCounts {
    let mut counts = WorkingTreeCounts::new();

    for status in statuses {
        for category in ChangeCategory::ALL {
            if status.intersects(category_flags(category)) {
                counts.record(category);
            }
        }
    }

    counts
}

fn category_flags(category: ChangeCategory) -> Status {
    match category {
        ChangeCategory::Added => Status::INDEX_NEW,
        ChangeCategory::Staged => Status::INDEX_MODIFIED,
        ChangeCategory::Removed => Status::INDEX_DELETED,
        ChangeCategory::Untracked => Status::WT_NEW,
        ChangeCategory::Modified => Status::WT_MODIFIED,
        ChangeCategory::Missing => Status::WT_DELETED,
        ChangeCategory::Ignored => Status::IGNORED,
    }
}

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn day(day: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, day, 10, 0, 0)
            .unwrap()
    }

    fn repo_with_history(days: &[u32]) -> MockRepository {
        let mut repo = MockRepository::new();
        for (i, d) in days.iter().enumerate() {
            repo.add_commit(format!("{:040x}", i), day(*d));
        }
        repo
    }

    #[test]
    fn test_collect_counts_commits_inclusively() {
        let mut repo = repo_with_history(&[1, 2, 3, 4, 5]);
        repo.add_tag("v1.0.0", Some(day(3)));

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.total_commits, 5);
        // commits on day 3, 4 and 5
        assert_eq!(facts.commits_since_tag, 3);
    }

    #[test]
    fn test_collect_tagged_head_counts_one() {
        let mut repo = repo_with_history(&[1, 2]);
        repo.add_tag("v2.0", Some(day(2)));

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.commits_since_tag, 1);
    }

    #[test]
    fn test_collect_picks_latest_version_tag() {
        let mut repo = repo_with_history(&[1, 2, 3, 4]);
        repo.add_tag("v1.9.0", Some(day(4)));
        repo.add_tag("v1.10.0", Some(day(2)));

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.latest_tag.unwrap().name, "v1.10.0");
        assert_eq!(facts.commits_since_tag, 3);
    }

    #[test]
    fn test_collect_with_custom_ordering() {
        let mut repo = repo_with_history(&[1, 2, 3, 4]);
        repo.add_tag("v1.9.0", Some(day(4)));
        repo.add_tag("v1.10.0", Some(day(2)));

        let facts = collect_with(&repo, |a, b| a.name.cmp(&b.name)).unwrap();
        assert_eq!(facts.latest_tag.unwrap().name, "v1.9.0");
        assert_eq!(facts.commits_since_tag, 1);
    }

    #[test]
    fn test_collect_without_tags() {
        let repo = repo_with_history(&[1, 2, 3, 4, 5, 6, 7]);

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.latest_tag, None);
        assert_eq!(facts.total_commits, 7);
        assert_eq!(facts.commits_since_tag, 0);
    }

    #[test]
    fn test_collect_tag_without_commit_target() {
        let mut repo = repo_with_history(&[1, 2]);
        repo.add_tag("v3.0.0", None);

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.commits_since_tag, 0);
    }

    #[test]
    fn test_collect_head_and_branch() {
        let mut repo = repo_with_history(&[1, 2]);
        repo.set_branch("feature/x");

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.branch_name, "feature/x");
        assert_eq!(facts.head_sha, format!("{:040x}", 1));
        assert_eq!(facts.head_commit_date, day(2));
    }

    #[test]
    fn test_collect_unborn_head_fails() {
        let repo = MockRepository::new();
        assert!(collect(&repo).is_err());
    }

    #[test]
    fn test_count_working_tree() {
        let statuses = vec![
            Status::INDEX_NEW,
            Status::INDEX_MODIFIED,
            Status::INDEX_DELETED,
            Status::WT_NEW,
            Status::WT_NEW,
            Status::WT_MODIFIED,
            Status::WT_DELETED,
            Status::IGNORED,
            Status::INDEX_NEW | Status::WT_MODIFIED,
        ];

        let counts = count_working_tree(&statuses);
        assert_eq!(counts.get(ChangeCategory::Added), 2);
        assert_eq!(counts.get(ChangeCategory::Staged), 1);
        assert_eq!(counts.get(ChangeCategory::Removed), 1);
        assert_eq!(counts.get(ChangeCategory::Untracked), 2);
        assert_eq!(counts.get(ChangeCategory::Modified), 2);
        assert_eq!(counts.get(ChangeCategory::Missing), 1);
        assert_eq!(counts.get(ChangeCategory::Ignored), 1);
        assert_eq!(counts.uncommitted_changes(), 9);
    }

    #[test]
    fn test_renames_and_type_changes_are_not_counted() {
        let counts = count_working_tree(&[
            Status::INDEX_RENAMED,
            Status::WT_RENAMED,
            Status::INDEX_TYPECHANGE,
            Status::WT_TYPECHANGE,
        ]);
        assert_eq!(counts, WorkingTreeCounts::new());
        assert_eq!(counts.uncommitted_changes(), 0);
    }

    #[test]
    fn test_collect_working_tree_from_statuses() {
        let mut repo = repo_with_history(&[1]);
        repo.add_status(Status::INDEX_RENAMED);
        repo.add_status(Status::WT_NEW);
        repo.add_status(Status::INDEX_MODIFIED | Status::WT_MODIFIED);
        repo.add_status(Status::IGNORED);

        let facts = collect(&repo).unwrap();
        assert_eq!(facts.working_tree.get(ChangeCategory::Staged), 1);
        assert_eq!(facts.working_tree.get(ChangeCategory::Modified), 1);
        assert_eq!(facts.working_tree.get(ChangeCategory::Untracked), 1);
        assert_eq!(facts.working_tree.get(ChangeCategory::Ignored), 1);
        assert_eq!(facts.working_tree.uncommitted_changes(), 3);
    }

    #[test]
    fn test_count_working_tree_clean() {
        assert_eq!(count_working_tree(&[]), WorkingTreeCounts::new());
    }
}
