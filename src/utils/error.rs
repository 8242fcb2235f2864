use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeWatchError {
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid branch name: {name} - {reason}")]
    InvalidBranchName { name: String, reason: String },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Background query failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, MergeWatchError>;

impl MergeWatchError {
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_branch_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBranchName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<crate::config::ConfigError> for MergeWatchError {
    fn from(error: crate::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}
