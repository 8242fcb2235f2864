pub mod cli;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use crate::core::classify::{BranchClassifier, BranchStatus, FeatureBranchSummary};
pub use crate::core::git::{GitRepository, GitService};
pub use utils::{MergeWatchError, Result};
