use super::repository::{execute_git_command, execute_git_command_with_status, GitRepository};
use crate::utils::error::{MergeWatchError, Result};
use chrono::NaiveDate;

const FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub date: NaiveDate,
    pub author: String,
}

impl CommitInfo {
    /// Parses one `git log --format=%h%x1f%ad%x1f%an --date=short` line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.trim().splitn(3, FIELD_SEPARATOR);

        let (hash, date, author) = match (fields.next(), fields.next(), fields.next()) {
            (Some(hash), Some(date), Some(author)) if !hash.is_empty() => (hash, date, author),
            _ => {
                return Err(MergeWatchError::git_operation(format!(
                    "Unexpected commit info line: '{}'",
                    line
                )))
            }
        };

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            MergeWatchError::git_operation(format!("Invalid commit date '{}': {}", date, e))
        })?;

        Ok(Self {
            hash: hash.to_string(),
            date,
            author: author.to_string(),
        })
    }
}

pub struct CommitManager<'a> {
    repo: &'a GitRepository,
}

impl<'a> CommitManager<'a> {
    pub fn new(repo: &'a GitRepository) -> Self {
        Self { repo }
    }

    pub fn last_commit_info(&self, reference: &str) -> Result<CommitInfo> {
        let output = execute_git_command(
            self.repo,
            &[
                "log",
                "-1",
                "--format=%h%x1f%ad%x1f%an",
                "--date=short",
                reference,
                "--",
            ],
        )?;

        CommitInfo::parse(&output)
    }

    /// Paths changed on `reference` since it forked from `base`.
    pub fn files_touched(&self, reference: &str, base: &str) -> Result<Vec<String>> {
        let range = format!("{}...{}", base, reference);
        let output = execute_git_command(self.repo, &["diff", "--name-only", &range, "--"])?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Removes untracked files and refreshes remote refs. Both steps are
    /// best-effort: a failure is logged and the report goes on with what
    /// is already on disk.
    pub fn prepare_working_copy(&self, clean_untracked: bool, fetch_prune: bool) {
        if clean_untracked {
            if let Err(e) = execute_git_command_with_status(self.repo, &["clean", "-fd"]) {
                tracing::warn!("Could not clean untracked files: {}", e);
            }
        }

        if fetch_prune {
            if let Err(e) =
                execute_git_command_with_status(self.repo, &["fetch", &self.repo.remote, "--prune"])
            {
                tracing::warn!("Could not fetch from '{}': {}", self.repo.remote, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;
    use std::fs;

    #[test]
    fn test_parse_commit_info() {
        let info = CommitInfo::parse("abc1234\u{1f}2024-03-05\u{1f}Jane Doe").unwrap();
        assert_eq!(info.hash, "abc1234");
        assert_eq!(info.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(info.author, "Jane Doe");
    }

    #[test]
    fn test_parse_commit_info_keeps_separators_in_author() {
        let info = CommitInfo::parse("abc1234\u{1f}2024-03-05\u{1f}Team | Ops").unwrap();
        assert_eq!(info.author, "Team | Ops");
    }

    #[test]
    fn test_parse_commit_info_rejects_garbage() {
        assert!(CommitInfo::parse("").is_err());
        assert!(CommitInfo::parse("abc1234").is_err());
        assert!(CommitInfo::parse("abc1234\u{1f}yesterday\u{1f}Jane").is_err());
    }

    #[test]
    fn test_last_commit_info() {
        let fixture = RemoteFixture::new();
        fixture.create_branch_with_commit("feat/a", "main", "a.txt");
        fixture.push("feat/a");

        let repo = fixture.repository();
        let info = CommitManager::new(&repo)
            .last_commit_info("origin/feat/a")
            .unwrap();

        assert_eq!(info.author, "Test User");
        assert!(!info.hash.is_empty());
    }

    #[test]
    fn test_files_touched_since_merge_base() {
        let fixture = RemoteFixture::new();
        fixture.create_branch_with_commit("feat/a", "main", "a.txt");
        fixture.push("feat/a");
        fixture.create_branch_with_commit("hotfix", "main", "unrelated.txt");
        fixture.merge_into("hotfix", "main");

        let repo = fixture.repository();
        let files = CommitManager::new(&repo)
            .files_touched("origin/feat/a", "origin/main")
            .unwrap();

        assert_eq!(files, vec!["a.txt"]);
    }

    #[test]
    fn test_prepare_working_copy_removes_untracked_files() {
        let fixture = RemoteFixture::new();
        let untracked = fixture.work_path().join("scratch.tmp");
        fs::write(&untracked, "temporary").unwrap();

        let repo = fixture.repository();
        CommitManager::new(&repo).prepare_working_copy(true, true);

        assert!(!untracked.exists());
    }

    #[test]
    fn test_prepare_working_copy_keeps_files_when_disabled() {
        let fixture = RemoteFixture::new();
        let untracked = fixture.work_path().join("scratch.tmp");
        fs::write(&untracked, "temporary").unwrap();

        let repo = fixture.repository();
        CommitManager::new(&repo).prepare_working_copy(false, false);

        assert!(untracked.exists());
    }
}
