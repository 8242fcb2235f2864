pub mod test_helpers {
    use crate::core::git::{
        BranchDeletion, BranchQueries, CommitInfo, DeletionReport, GitRepository,
    };
    use crate::utils::error::{MergeWatchError, Result};
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const BASE_TIMESTAMP: i64 = 1_700_000_000;

    /// A working copy cloned from a bare `origin` living in the same temp dir.
    /// Every git call gets a later author/committer date than the previous one
    /// so recency ordering is deterministic.
    pub struct RemoteFixture {
        _temp_dir: TempDir,
        work: PathBuf,
        clock: Cell<i64>,
    }

    impl RemoteFixture {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let origin = temp_dir.path().join("origin.git");
            let work = temp_dir.path().join("work");
            fs::create_dir_all(&work).expect("Failed to create work dir");

            let status = Command::new("git")
                .current_dir(temp_dir.path())
                .args(["init", "--bare", "--initial-branch=main", "origin.git"])
                .output()
                .expect("Failed to init bare repo");
            assert!(status.status.success(), "git init --bare failed");

            let fixture = Self {
                _temp_dir: temp_dir,
                work,
                clock: Cell::new(0),
            };

            fixture.git(&["init", "--initial-branch=main"]);
            fixture.git(&["config", "user.name", "Test User"]);
            fixture.git(&["config", "user.email", "test@example.com"]);
            fixture.git(&["config", "commit.gpgsign", "false"]);

            fs::write(fixture.work.join("README.md"), "# Test Repository")
                .expect("Failed to write README");
            fixture.git(&["add", "README.md"]);
            fixture.git(&["commit", "-m", "Initial commit"]);
            fixture.git(&["remote", "add", "origin", &origin.to_string_lossy()]);
            fixture.git(&["push", "-u", "origin", "main"]);

            fixture
        }

        pub fn work_path(&self) -> &Path {
            &self.work
        }

        pub fn repository(&self) -> GitRepository {
            GitRepository::discover_from(&self.work, "origin").expect("Failed to discover repo")
        }

        pub fn git(&self, args: &[&str]) -> String {
            let tick = self.clock.get() + 1;
            self.clock.set(tick);
            let date = format!("{} +0000", BASE_TIMESTAMP + tick * 60);

            let output = Command::new("git")
                .current_dir(&self.work)
                .env("GIT_AUTHOR_DATE", &date)
                .env("GIT_COMMITTER_DATE", &date)
                .args(args)
                .output()
                .expect("Failed to run git");

            assert!(
                output.status.success(),
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );

            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }

        /// Creates `branch` from `from` with one commit adding `file`, then
        /// goes back to `main`.
        pub fn create_branch_with_commit(&self, branch: &str, from: &str, file: &str) {
            self.git(&["checkout", "-b", branch, from]);
            let path = self.work.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            fs::write(&path, format!("content of {}", file)).expect("Failed to write file");
            self.git(&["add", file]);
            self.git(&["commit", "-m", &format!("Add {}", file)]);
            self.git(&["checkout", "main"]);
        }

        pub fn push(&self, branch: &str) {
            self.git(&["push", "origin", branch]);
        }

        /// Merges `source` into `target` with a merge commit and pushes `target`.
        pub fn merge_into(&self, source: &str, target: &str) {
            self.git(&["checkout", target]);
            self.git(&[
                "merge",
                "--no-ff",
                source,
                "-m",
                &format!("Merge {} into {}", source, target),
            ]);
            self.git(&["push", "origin", target]);
            self.git(&["checkout", "main"]);
        }
    }

    impl Default for RemoteFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    /// In-memory gateway. Unconfigured merge sets are empty, unconfigured
    /// commits fail, unconfigured file lists are empty.
    pub struct FakeQueries {
        remote: String,
        remote_branches: Vec<String>,
        local_branches: Vec<String>,
        current: Option<String>,
        merged: HashMap<String, BTreeSet<String>>,
        unmerged: HashMap<String, BTreeSet<String>>,
        commits: HashMap<String, CommitInfo>,
        files: HashMap<String, Vec<String>>,
        failing_merge_queries: HashSet<String>,
        fail_remote_listing: bool,
        deletions: Mutex<Vec<Vec<String>>>,
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    impl FakeQueries {
        pub fn new() -> Self {
            Self {
                remote: "origin".to_string(),
                remote_branches: Vec::new(),
                local_branches: Vec::new(),
                current: None,
                merged: HashMap::new(),
                unmerged: HashMap::new(),
                commits: HashMap::new(),
                files: HashMap::new(),
                failing_merge_queries: HashSet::new(),
                fail_remote_listing: false,
                deletions: Mutex::new(Vec::new()),
            }
        }

        pub fn with_remote_branches(mut self, branches: &[&str]) -> Self {
            self.remote_branches = owned(branches);
            self
        }

        pub fn with_local_branches(mut self, branches: &[&str]) -> Self {
            self.local_branches = owned(branches);
            self
        }

        pub fn with_current(mut self, branch: &str) -> Self {
            self.current = Some(branch.to_string());
            self
        }

        pub fn with_merged(mut self, target: &str, branches: &[&str]) -> Self {
            self.merged
                .insert(target.to_string(), owned(branches).into_iter().collect());
            self
        }

        pub fn with_unmerged(mut self, target: &str, branches: &[&str]) -> Self {
            self.unmerged
                .insert(target.to_string(), owned(branches).into_iter().collect());
            self
        }

        pub fn with_commit(mut self, branch: &str, hash: &str, date: NaiveDate, author: &str) -> Self {
            self.commits.insert(
                branch.to_string(),
                CommitInfo {
                    hash: hash.to_string(),
                    date,
                    author: author.to_string(),
                },
            );
            self
        }

        pub fn with_files(mut self, branch: &str, files: &[&str]) -> Self {
            self.files.insert(branch.to_string(), owned(files));
            self
        }

        pub fn failing_merge_queries_for(mut self, target: &str) -> Self {
            self.failing_merge_queries.insert(target.to_string());
            self
        }

        pub fn failing_remote_listing(mut self) -> Self {
            self.fail_remote_listing = true;
            self
        }

        /// Every `delete_branches` call, in order.
        pub fn deletions(&self) -> Vec<Vec<String>> {
            self.deletions.lock().expect("deletions lock poisoned").clone()
        }

        fn merge_set(
            &self,
            sets: &HashMap<String, BTreeSet<String>>,
            target: &str,
        ) -> Result<BTreeSet<String>> {
            if self.failing_merge_queries.contains(target) {
                return Err(MergeWatchError::git_operation(format!(
                    "simulated failure for {}",
                    target
                )));
            }
            Ok(sets.get(target).cloned().unwrap_or_default())
        }
    }

    impl Default for FakeQueries {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BranchQueries for FakeQueries {
        fn remote(&self) -> &str {
            &self.remote
        }

        fn current_branch(&self) -> Result<Option<String>> {
            Ok(self.current.clone())
        }

        fn list_remote_branches(&self) -> Result<Vec<String>> {
            if self.fail_remote_listing {
                return Err(MergeWatchError::git_operation("simulated listing failure"));
            }
            Ok(self.remote_branches.clone())
        }

        fn list_local_branches(&self) -> Result<Vec<String>> {
            Ok(self.local_branches.clone())
        }

        fn merged_into(&self, target: &str) -> Result<BTreeSet<String>> {
            self.merge_set(&self.merged, target)
        }

        fn unmerged_into(&self, target: &str) -> Result<BTreeSet<String>> {
            self.merge_set(&self.unmerged, target)
        }

        fn last_commit_info(&self, reference: &str) -> Result<CommitInfo> {
            self.commits.get(reference).cloned().ok_or_else(|| {
                MergeWatchError::git_operation(format!("no commit for {}", reference))
            })
        }

        fn files_touched(&self, reference: &str, _base: &str) -> Result<Vec<String>> {
            Ok(self.files.get(reference).cloned().unwrap_or_default())
        }
    }

    impl BranchDeletion for FakeQueries {
        fn delete_branches(&self, names: &[String]) -> DeletionReport {
            self.deletions
                .lock()
                .expect("deletions lock poisoned")
                .push(names.to_vec());

            let (remote_deleted, local_deleted): (Vec<String>, Vec<String>) = names
                .iter()
                .cloned()
                .partition(|name| name.starts_with("origin/"));

            DeletionReport {
                remote_deleted,
                remote_failed: Vec::new(),
                local_deleted,
                local_failed: Vec::new(),
            }
        }
    }
}
