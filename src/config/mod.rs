use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod manager;
pub mod validation;

pub use manager::ConfigManager;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "defaults::default_git_config")]
    pub git: GitConfig,
    #[serde(default = "defaults::default_report_config")]
    pub report: ReportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "defaults::default_remote")]
    pub remote: String,
    #[serde(default = "defaults::default_true")]
    pub clean_untracked: bool,
    #[serde(default = "defaults::default_true")]
    pub fetch_prune: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "defaults::default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,
    #[serde(default)]
    pub empty_targets: EmptyTargets,
    #[serde(default = "defaults::default_date_format")]
    pub date_format: String,
}

/// Status given to a feature branch when no environment branch resolved.
/// "Merged into all" and "merged into none" are both vacuously true then,
/// so one of them has to be picked explicitly.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTargets {
    #[default]
    NeverMerged,
    FullyMerged,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

impl Default for Config {
    fn default() -> Self {
        defaults::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        ConfigManager::load_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn remote(&self) -> &str {
        &self.git.remote
    }

    pub fn query_concurrency(&self) -> usize {
        self.report.max_concurrent_queries.max(1)
    }
}
