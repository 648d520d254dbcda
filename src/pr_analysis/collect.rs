use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use git2::{Repository, Sort};

use super::PrRecord;

fn author_time(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    Some(DateTime::from_timestamp(time.seconds(), 0)?.with_timezone(&offset))
}

/// Merge commits reachable from HEAD and committed after `since`, newest
/// first. Merges whose subject names no PR are skipped.
pub fn collect_merged_prs(repo_path: &Path, since: DateTime<Utc>) -> Result<Vec<PrRecord>> {
    let repo = Repository::open(repo_path)
        .with_context(|| format!("Failed to open git repository at {}", repo_path.display()))?;

    if repo.head().is_err() {
        tracing::warn!(repo = %repo_path.display(), "Repository has no commits");
        return Ok(Vec::new());
    }

    let mut revwalk = repo.revwalk().context("Failed to create revision walker")?;
    revwalk
        .set_sorting(Sort::TIME)
        .context("Failed to set revwalk sorting")?;
    revwalk.push_head().context("Failed to push HEAD to revwalk")?;

    let cutoff = since.timestamp();
    let mut records = Vec::new();
    let mut merges = 0usize;

    for oid in revwalk {
        let oid = oid.context("Failed to get commit OID")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find commit {oid}"))?;

        if commit.parent_count() < 2 || commit.time().seconds() < cutoff {
            continue;
        }
        merges += 1;

        let author = commit.author();
        let Some(date) = author_time(author.when()) else {
            tracing::debug!(%oid, "Skipping merge with out-of-range author time");
            continue;
        };

        if let Some(record) = PrRecord::from_commit(
            author.name().unwrap_or_default(),
            author.email().unwrap_or_default(),
            date,
            commit.summary().unwrap_or_default(),
        ) {
            records.push(record);
        }
    }

    tracing::info!(
        repo = %repo_path.display(),
        merges,
        prs = records.len(),
        "Collected merged pull requests"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use git2::{Signature, Time};
    use std::fs;

    fn commit_file(
        repo: &Repository,
        dir: &Path,
        file: &str,
        message: &str,
        when: i64,
        parents: &[&git2::Commit<'_>],
    ) -> git2::Oid {
        fs::write(dir.join(file), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Alice", "alice@example.com", &Time::new(when, 60)).unwrap();
        repo.commit(None, &sig, &sig, message, &tree, parents).unwrap()
    }

    #[test]
    fn test_collects_recent_pr_merges() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let now = Utc::now().timestamp();
        let old = now - Duration::days(400).num_seconds();

        let base = commit_file(&repo, dir.path(), "a.txt", "initial", old, &[]);
        let base = repo.find_commit(base).unwrap();

        let old_side = commit_file(&repo, dir.path(), "b.txt", "old work", old + 10, &[&base]);
        let old_side = repo.find_commit(old_side).unwrap();
        let old_merge = commit_file(
            &repo,
            dir.path(),
            "c.txt",
            "Merge pull request #1 from alice/old",
            old + 20,
            &[&base, &old_side],
        );
        let old_merge = repo.find_commit(old_merge).unwrap();

        let side = commit_file(&repo, dir.path(), "d.txt", "new work", now - 60, &[&old_merge]);
        let side = repo.find_commit(side).unwrap();
        let merge = commit_file(
            &repo,
            dir.path(),
            "e.txt",
            "Merge pull request #2 from alice/new",
            now - 30,
            &[&old_merge, &side],
        );
        repo.reference("refs/heads/main", merge, true, "test").unwrap();
        repo.set_head("refs/heads/main").unwrap();

        let since = Utc::now() - Duration::days(183);
        let records = collect_merged_prs(dir.path(), since).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pr_number, "2");
        assert_eq!(records[0].author_name, "Alice");
        assert_eq!(records[0].author_email, "alice@example.com");
    }

    #[test]
    fn test_empty_repository_has_no_prs() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(collect_merged_prs(dir.path(), Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_merged_prs(&dir.path().join("absent"), Utc::now()).unwrap_err();
        assert!(err.to_string().contains("Failed to open git repository"));
    }
}
