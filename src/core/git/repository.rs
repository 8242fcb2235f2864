use crate::utils::error::{MergeWatchError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Location of the working copy plus the remote every query is made against.
/// Passed explicitly to each gateway operation.
#[derive(Debug, Clone)]
pub struct GitRepository {
    pub root: PathBuf,
    pub remote: String,
}

impl GitRepository {
    pub fn discover(remote: &str) -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            MergeWatchError::git_operation(format!("Failed to get current directory: {}", e))
        })?;

        Self::discover_from(&current_dir, remote)
    }

    pub fn discover_from(path: &Path, remote: &str) -> Result<Self> {
        let output = Command::new("git")
            .current_dir(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(|e| MergeWatchError::git_operation(format!("Failed to execute git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MergeWatchError::git_operation(format!(
                "Not a git repository or git not found: {}",
                stderr.trim()
            )));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();

        Ok(Self {
            root: PathBuf::from(root),
            remote: remote.to_string(),
        })
    }

    /// Never fails: any problem is logged and reported as `false`.
    pub fn is_valid_repository(&self) -> bool {
        if !self.root.exists() {
            tracing::warn!("Repository root {} does not exist", self.root.display());
            return false;
        }

        match execute_git_command(self, &["rev-parse", "--is-inside-work-tree"]) {
            Ok(output) if output == "true" => true,
            Ok(output) => {
                tracing::warn!(
                    "{} is not inside a work tree (git answered '{}')",
                    self.root.display(),
                    output
                );
                false
            }
            Err(e) => {
                tracing::warn!("{} is not a valid git repository: {}", self.root.display(), e);
                false
            }
        }
    }

    pub fn get_current_branch(&self) -> Result<Option<String>> {
        let branch = execute_git_command(self, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        if branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch))
        }
    }

    /// `origin/feat/a` becomes `feat/a`; names without the prefix are returned unchanged.
    pub fn strip_remote_prefix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(&self.remote_prefix()).unwrap_or(name)
    }

    pub fn is_remote_qualified(&self, name: &str) -> bool {
        name.starts_with(&self.remote_prefix())
    }

    pub fn remote_ref(&self, branch: &str) -> String {
        format!("{}{}", self.remote_prefix(), self.strip_remote_prefix(branch))
    }

    fn remote_prefix(&self) -> String {
        format!("{}/", self.remote)
    }
}

pub fn execute_git_command(repo: &GitRepository, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(&repo.root)
        .args(args)
        .output()
        .map_err(|e| MergeWatchError::git_operation(format!("Failed to execute git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MergeWatchError::git_operation(format!(
            "Git command failed ({}): {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.trim().to_string())
}

pub fn execute_git_command_with_status(repo: &GitRepository, args: &[&str]) -> Result<()> {
    execute_git_command(repo, args).map(|_| ())
}
