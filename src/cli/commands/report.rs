use crate::cli::commands::cleanup::{CleanupOrchestrator, TerminalPrompter};
use crate::cli::invoked_name;
use crate::cli::parser::{Cli, CleanupMode};
use crate::config::Config;
use crate::core::classify::{BranchClassifier, ClassifyOptions};
use crate::core::git::GitService;
use crate::ui::{CategoryCounts, ReportRenderer};
use crate::utils::Result;
use std::sync::Arc;

pub async fn execute(config: Config, args: Cli) -> Result<()> {
    let git_service = match GitService::discover(config.remote()) {
        Ok(service) => service,
        Err(e) => {
            tracing::warn!("Not inside a git repository: {}", e);
            return Ok(());
        }
    };

    let reporter = BranchReporter::new(git_service, config);
    reporter.run(args).await
}

struct BranchReporter {
    git_service: GitService,
    config: Config,
}

impl BranchReporter {
    fn new(git_service: GitService, config: Config) -> Self {
        Self {
            git_service,
            config,
        }
    }

    async fn run(&self, args: Cli) -> Result<()> {
        if !self.git_service.is_valid_repository() {
            tracing::warn!("Stopping: the current directory is not a usable git repository");
            return Ok(());
        }

        // Destructive preparation finishes before any read is scheduled.
        self.git_service.commit_manager().prepare_working_copy(
            self.config.git.clean_untracked,
            self.config.git.fetch_prune,
        );

        let environments = self
            .git_service
            .branch_manager()
            .resolve_environment_branches(&args.branches);

        if environments.is_empty() {
            tracing::warn!(
                "None of the given branches ({}) exist on remote '{}'",
                args.branches.join(", "),
                self.config.remote()
            );
            return Ok(());
        }

        println!("🔍 Checking branches against {}\n", environments.join(", "));

        let classifier = BranchClassifier::new(
            Arc::new(self.git_service.repository().clone()),
            ClassifyOptions {
                max_concurrency: self.config.query_concurrency(),
                empty_targets: self.config.report.empty_targets,
            },
        );
        let summaries = classifier.classify(&environments).await?;

        let renderer = ReportRenderer::new(
            &environments,
            self.config.remote(),
            &self.config.report.date_format,
        );
        print!("{}", renderer.render_table(&summaries));
        println!();

        let counts = CategoryCounts::from_summaries(&summaries);
        let hint = match args.cleanup {
            Some(_) => None,
            None => {
                let repo = self.git_service.repository();
                let branches: Vec<&str> = environments
                    .iter()
                    .map(|env| repo.strip_remote_prefix(env))
                    .collect();
                suggested_command(&invoked_name(), &branches, &counts)
            }
        };
        print!("{}", renderer.render_follow_up(&counts, hint.as_deref()));

        if let Some(mode) = args.cleanup {
            let orchestrator =
                CleanupOrchestrator::new(self.git_service.repository(), TerminalPrompter);
            orchestrator.run(&summaries, mode)?;
        }

        Ok(())
    }
}

/// Command line to re-run with cleanup, if there is anything to clean.
/// `branches` are the resolved environment branches without remote prefix.
pub fn suggested_command(
    program: &str,
    branches: &[&str],
    counts: &CategoryCounts,
) -> Option<String> {
    let mode = if counts.safe_to_delete() > 0 {
        CleanupMode::Safe
    } else if counts.needs_attention() > 0 {
        CleanupMode::All
    } else {
        return None;
    };

    let mut command = format!("{} -b {} -c", program, branches.join(" "));
    if mode == CleanupMode::All {
        command.push_str(" ALL");
    }
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::RemoteFixture;

    fn args(branches: &[&str], cleanup: Option<CleanupMode>) -> Cli {
        Cli {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            cleanup,
        }
    }

    fn reporter_for(fixture: &RemoteFixture) -> BranchReporter {
        let git_service =
            GitService::discover_from(fixture.work_path(), "origin").expect("discover repo");
        BranchReporter::new(git_service, Config::default())
    }

    #[test]
    fn test_suggested_command_prefers_safe_mode() {
        let counts = CategoryCounts {
            fully_merged: vec!["origin/a".to_string()],
            never_merged: vec!["origin/b".to_string()],
            ..CategoryCounts::default()
        };

        assert_eq!(
            suggested_command("mergewatch", &["DEV", "master"], &counts).as_deref(),
            Some("mergewatch -b DEV master -c")
        );
    }

    #[test]
    fn test_suggested_command_falls_back_to_all() {
        let counts = CategoryCounts {
            mergeable: vec!["origin/a".to_string()],
            ..CategoryCounts::default()
        };

        assert_eq!(
            suggested_command("mw", &["DEV"], &counts).as_deref(),
            Some("mw -b DEV -c ALL")
        );
    }

    #[test]
    fn test_no_suggestion_when_nothing_to_clean() {
        assert_eq!(
            suggested_command("mergewatch", &["DEV"], &CategoryCounts::default()),
            None
        );
    }

    #[tokio::test]
    async fn test_report_without_cleanup_leaves_branches_alone() {
        let fixture = RemoteFixture::new();
        fixture.create_branch_with_commit("DEV", "main", "dev.txt");
        fixture.push("DEV");
        fixture.create_branch_with_commit("feat/a", "main", "a.txt");
        fixture.push("feat/a");
        fixture.merge_into("feat/a", "DEV");
        fixture.merge_into("feat/a", "main");

        let reporter = reporter_for(&fixture);
        reporter
            .run(args(&["DEV", "main"], None))
            .await
            .expect("report succeeds");

        let remote_branches = fixture.git(&["branch", "-r"]);
        assert!(remote_branches.contains("origin/feat/a"));
    }

    #[tokio::test]
    async fn test_unknown_environment_branches_end_quietly() {
        let fixture = RemoteFixture::new();

        let reporter = reporter_for(&fixture);
        let result = reporter.run(args(&["nonexistent"], None)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_report_cleans_untracked_files_first() {
        let fixture = RemoteFixture::new();
        let untracked = fixture.work_path().join("leftover.log");
        std::fs::write(&untracked, "noise").unwrap();

        let reporter = reporter_for(&fixture);
        reporter.run(args(&["main"], None)).await.unwrap();

        assert!(!untracked.exists());
    }
}
