use crate::utils::error::Result;
use std::collections::BTreeSet;

pub mod branch;
pub mod commit;
pub mod repository;
pub mod validation;

pub use branch::{BranchManager, DeletionReport};
pub use commit::{CommitInfo, CommitManager};
pub use repository::GitRepository;
pub use validation::GitValidator;

/// Read-only queries the classifier fans out over. Implementations must be
/// safe to call from several worker threads at once.
pub trait BranchQueries: Send + Sync {
    fn remote(&self) -> &str;
    fn current_branch(&self) -> Result<Option<String>>;
    fn list_remote_branches(&self) -> Result<Vec<String>>;
    fn list_local_branches(&self) -> Result<Vec<String>>;
    fn merged_into(&self, target: &str) -> Result<BTreeSet<String>>;
    fn unmerged_into(&self, target: &str) -> Result<BTreeSet<String>>;
    fn last_commit_info(&self, reference: &str) -> Result<CommitInfo>;
    fn files_touched(&self, reference: &str, base: &str) -> Result<Vec<String>>;
}

/// The mutating side of the gateway. Kept apart from [`BranchQueries`] so
/// nothing destructive can be scheduled on the read fan-out.
pub trait BranchDeletion {
    fn delete_branches(&self, names: &[String]) -> DeletionReport;
}

impl BranchQueries for GitRepository {
    fn remote(&self) -> &str {
        &self.remote
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.get_current_branch()
    }

    fn list_remote_branches(&self) -> Result<Vec<String>> {
        BranchManager::new(self).list_remote_branches()
    }

    fn list_local_branches(&self) -> Result<Vec<String>> {
        BranchManager::new(self).list_local_branches()
    }

    fn merged_into(&self, target: &str) -> Result<BTreeSet<String>> {
        BranchManager::new(self).merged_into(target)
    }

    fn unmerged_into(&self, target: &str) -> Result<BTreeSet<String>> {
        BranchManager::new(self).unmerged_into(target)
    }

    fn last_commit_info(&self, reference: &str) -> Result<CommitInfo> {
        CommitManager::new(self).last_commit_info(reference)
    }

    fn files_touched(&self, reference: &str, base: &str) -> Result<Vec<String>> {
        CommitManager::new(self).files_touched(reference, base)
    }
}

impl BranchDeletion for GitRepository {
    fn delete_branches(&self, names: &[String]) -> DeletionReport {
        BranchManager::new(self).delete_branches(names)
    }
}

/// Entry point used by commands: owns the repository context and exposes
/// the managers that work on it.
#[derive(Debug, Clone)]
pub struct GitService {
    repo: GitRepository,
}

impl GitService {
    pub fn discover(remote: &str) -> Result<Self> {
        Ok(Self {
            repo: GitRepository::discover(remote)?,
        })
    }

    pub fn discover_from(path: &std::path::Path, remote: &str) -> Result<Self> {
        Ok(Self {
            repo: GitRepository::discover_from(path, remote)?,
        })
    }

    pub fn repository(&self) -> &GitRepository {
        &self.repo
    }

    pub fn is_valid_repository(&self) -> bool {
        self.repo.is_valid_repository()
    }

    pub fn branch_manager(&self) -> BranchManager<'_> {
        BranchManager::new(&self.repo)
    }

    pub fn commit_manager(&self) -> CommitManager<'_> {
        CommitManager::new(&self.repo)
    }
}
