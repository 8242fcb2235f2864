use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "mergewatch")]
#[command(about = "Show which feature branches reached your environment branches")]
#[command(
    version,
    long_about = "Checks every remote branch against the given environment branches \
(e.g. DEV ACC PROD) and reports which ones are fully merged, partially merged, \
never merged or only exist locally. Untracked files are removed and the remote \
is fetched with --prune before every report."
)]
#[command(after_help = "EXAMPLES:
    # Report against three environments
    mergewatch -b DEV ACC PROD

    # Also offer to delete fully merged and local-only branches
    mergewatch -b DEV ACC PROD -c

    # Offer every non-environment branch for deletion
    mw -b DEV master -c ALL")]
pub struct Cli {
    /// Environment branches to compare against, separated by spaces
    #[arg(
        short = 'b',
        long = "branches",
        required = true,
        num_args = 1..,
        value_name = "BRANCH"
    )]
    pub branches: Vec<String>,

    /// Interactively delete branches; pass ALL to include unmerged ones
    #[arg(
        short = 'c',
        long = "cleanup",
        num_args = 0..=1,
        value_name = "ALL",
        default_missing_value = "safe",
        value_parser = parse_cleanup_mode
    )]
    pub cleanup: Option<CleanupMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    /// Fully merged and local-only branches.
    Safe,
    /// Every branch that is not an environment branch.
    All,
}

fn parse_cleanup_mode(value: &str) -> Result<CleanupMode, String> {
    if value.eq_ignore_ascii_case("all") {
        Ok(CleanupMode::All)
    } else if value == "safe" {
        Ok(CleanupMode::Safe)
    } else {
        Err(format!(
            "'{}' is not a cleanup mode; use '-c' alone or '-c ALL'",
            value
        ))
    }
}
