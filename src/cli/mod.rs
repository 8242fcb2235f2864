pub mod commands;
pub mod parser;

pub use parser::{Cli, CleanupMode};

use crate::config::Config;
use crate::utils::{init_logging, MergeWatchError, Result};
use anyhow::Context;
use clap::Parser;
use std::path::Path;

pub async fn execute_command(cli: Cli) -> Result<()> {
    execute_command_with_config(cli, None).await
}

pub async fn execute_command_with_config(cli: Cli, test_config: Option<Config>) -> Result<()> {
    let config = match test_config {
        Some(config) => config,
        None => Config::load()
            .map_err(|e| MergeWatchError::config_error(format!("Failed to load config: {}", e)))?,
    };

    commands::report::execute(config, cli).await
}

/// Name the tool was started as, so printed commands match `mw` too.
pub fn invoked_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mergewatch".to_string())
}

/// Shared body of the `mergewatch` and `mw` binaries.
pub fn run() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(execute_command(cli))?;
    Ok(())
}
