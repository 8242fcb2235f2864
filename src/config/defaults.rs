use super::{Config, EmptyTargets, GitConfig, ReportConfig};

pub const CONFIG_ENV_VAR: &str = "MERGEWATCH_CONFIG";

pub fn default_config() -> Config {
    Config {
        git: default_git_config(),
        report: default_report_config(),
    }
}

pub fn default_git_config() -> GitConfig {
    GitConfig {
        remote: default_remote(),
        clean_untracked: default_true(),
        fetch_prune: default_true(),
    }
}

pub fn default_report_config() -> ReportConfig {
    ReportConfig {
        max_concurrent_queries: default_max_concurrent_queries(),
        empty_targets: EmptyTargets::NeverMerged,
        date_format: default_date_format(),
    }
}

pub fn default_remote() -> String {
    "origin".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_max_concurrent_queries() -> usize {
    8
}

pub fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

pub fn get_default_config_dir() -> std::path::PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "mergewatch") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".config")
            .join("mergewatch")
    }
}

pub fn get_config_file_path() -> std::path::PathBuf {
    if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
        return std::path::PathBuf::from(config_path);
    }

    get_default_config_dir().join("config.json")
}
