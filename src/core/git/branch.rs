use super::repository::{execute_git_command, execute_git_command_with_status, GitRepository};
use super::validation::GitValidator;
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// Outcome of a deletion batch. Remote refs are deleted one by one, local refs
/// in two all-or-nothing batches (tracking branches, then orphans). A tracking
/// branch is only queued once its remote ref is gone.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeletionReport {
    pub remote_deleted: Vec<String>,
    pub remote_failed: Vec<String>,
    pub local_deleted: Vec<String>,
    pub local_failed: Vec<String>,
}

impl DeletionReport {
    pub fn deleted_count(&self) -> usize {
        self.remote_deleted.len() + self.local_deleted.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.remote_failed.is_empty() || !self.local_failed.is_empty()
    }
}

pub struct BranchManager<'a> {
    repo: &'a GitRepository,
}

impl<'a> BranchManager<'a> {
    pub fn new(repo: &'a GitRepository) -> Self {
        Self { repo }
    }

    /// Keeps the names that exist as branches on the remote, remote-qualified.
    /// Everything else is warned about and dropped.
    pub fn resolve_environment_branches(&self, names: &[String]) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();

        for name in names {
            if let Err(e) = GitValidator::validate_branch_name(name) {
                tracing::warn!("Skipping branch '{}': {}", name, e);
                continue;
            }

            let remote_ref = self.repo.remote_ref(name);
            if !self.remote_branch_exists(&remote_ref) {
                tracing::warn!(
                    "Branch '{}' not found on remote '{}', ignoring it",
                    name,
                    self.repo.remote
                );
                continue;
            }

            if !resolved.contains(&remote_ref) {
                resolved.push(remote_ref);
            }
        }

        resolved
    }

    pub fn remote_branch_exists(&self, remote_ref: &str) -> bool {
        execute_git_command(
            self.repo,
            &[
                "show-ref",
                "--verify",
                "--quiet",
                &format!("refs/remotes/{}", remote_ref),
            ],
        )
        .is_ok()
    }

    pub fn local_branch_exists(&self, name: &str) -> bool {
        execute_git_command(
            self.repo,
            &[
                "show-ref",
                "--verify",
                "--quiet",
                &format!("refs/heads/{}", name),
            ],
        )
        .is_ok()
    }

    /// Remote branches, most recently committed first.
    pub fn list_remote_branches(&self) -> Result<Vec<String>> {
        let output = execute_git_command(
            self.repo,
            &[
                "for-each-ref",
                "--sort=-committerdate",
                "--format=%(refname:short)",
                &self.remote_namespace(),
            ],
        )?;

        Ok(self.parse_remote_refs(&output).collect())
    }

    pub fn list_local_branches(&self) -> Result<Vec<String>> {
        let output = execute_git_command(
            self.repo,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
        )?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn merged_into(&self, target: &str) -> Result<BTreeSet<String>> {
        self.remote_refs_by_merge_state("--merged", target)
    }

    pub fn unmerged_into(&self, target: &str) -> Result<BTreeSet<String>> {
        self.remote_refs_by_merge_state("--no-merged", target)
    }

    pub fn delete_branches(&self, names: &[String]) -> DeletionReport {
        let mut report = DeletionReport::default();

        let (remote_names, local_names): (Vec<&String>, Vec<&String>) = names
            .iter()
            .partition(|name| self.repo.is_remote_qualified(name));

        let mut tracking = Vec::new();
        for remote_name in remote_names {
            let branch = self.repo.strip_remote_prefix(remote_name);
            match execute_git_command_with_status(
                self.repo,
                &["push", &self.repo.remote, "--delete", branch],
            ) {
                Ok(()) => {
                    tracing::info!("Deleted remote branch {}", remote_name);
                    report.remote_deleted.push(remote_name.clone());
                    if self.local_branch_exists(branch) {
                        tracking.push(branch.to_string());
                    }
                }
                Err(e) => {
                    // The local copy may hold the only version of that work now.
                    tracing::warn!(
                        "Failed to delete remote branch {}, keeping local {}: {}",
                        remote_name,
                        branch,
                        e
                    );
                    report.remote_failed.push(remote_name.clone());
                }
            }
        }

        let orphans: Vec<String> = local_names.into_iter().cloned().collect();

        self.delete_local_batch(&tracking, &mut report);
        self.delete_local_batch(&orphans, &mut report);

        report
    }

    fn delete_local_batch(&self, branches: &[String], report: &mut DeletionReport) {
        if branches.is_empty() {
            return;
        }

        let mut args = vec!["branch", "-D"];
        args.extend(branches.iter().map(String::as_str));

        match execute_git_command_with_status(self.repo, &args) {
            Ok(()) => {
                tracing::info!("Deleted local branches: {}", branches.join(", "));
                report.local_deleted.extend(branches.iter().cloned());
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to delete local branches {}: {}",
                    branches.join(", "),
                    e
                );
                report.local_failed.extend(branches.iter().cloned());
            }
        }
    }

    fn remote_refs_by_merge_state(&self, flag: &str, target: &str) -> Result<BTreeSet<String>> {
        let output = execute_git_command(
            self.repo,
            &[
                "for-each-ref",
                &format!("{}={}", flag, target),
                "--format=%(refname:short)",
                &self.remote_namespace(),
            ],
        )?;

        Ok(self.parse_remote_refs(&output).collect())
    }

    fn remote_namespace(&self) -> String {
        format!("refs/remotes/{}", self.repo.remote)
    }

    // The symbolic HEAD shows up as `origin/HEAD` or as bare `origin`
    // depending on the git version.
    fn parse_remote_refs<'o>(&self, output: &'o str) -> impl Iterator<Item = String> + 'o {
        let remote = self.repo.remote.clone();
        let head = format!("{}/HEAD", remote);
        output
            .lines()
            .map(str::trim)
            .filter(move |line| !line.is_empty() && *line != remote && *line != head)
            .map(str::to_string)
    }
}
