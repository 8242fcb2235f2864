use super::{Config, ConfigError, GitConfig, ReportConfig, Result};
use crate::core::git::GitValidator;
use chrono::NaiveDate;
use std::fmt::Write;

pub fn validate_config(config: &Config) -> Result<()> {
    validate_git_config(&config.git)?;
    validate_report_config(&config.report)?;
    Ok(())
}

pub fn validate_git_config(git: &GitConfig) -> Result<()> {
    if git.remote.is_empty() {
        return Err(ConfigError::Validation(
            "Remote name cannot be empty".to_string(),
        ));
    }

    if git.remote.contains('/') || GitValidator::validate_branch_name(&git.remote).is_err() {
        return Err(ConfigError::Validation(format!(
            "Invalid remote name '{}'",
            git.remote
        )));
    }

    Ok(())
}

pub fn validate_report_config(report: &ReportConfig) -> Result<()> {
    if report.max_concurrent_queries == 0 {
        return Err(ConfigError::Validation(
            "max_concurrent_queries must be at least 1".to_string(),
        ));
    }

    if report.date_format.trim().is_empty() {
        return Err(ConfigError::Validation(
            "date_format cannot be empty".to_string(),
        ));
    }

    // Commit dates carry no time or zone, so formats asking for one fail here.
    let mut sample = String::new();
    if write!(sample, "{}", NaiveDate::default().format(&report.date_format)).is_err() {
        return Err(ConfigError::Validation(format!(
            "Invalid date_format '{}'",
            report.date_format
        )));
    }

    Ok(())
}
