use crate::cli::parser::CleanupMode;
use crate::core::classify::{BranchStatus, FeatureBranchSummary};
use crate::core::git::{BranchDeletion, DeletionReport};
use crate::utils::Result;

pub mod interaction;

pub use interaction::{CleanupPrompter, TerminalPrompter};

#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOutcome {
    NothingEligible,
    NonInteractive,
    Declined,
    NothingSelected,
    Cancelled,
    Deleted(DeletionReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub status: BranchStatus,
}

impl CleanupMode {
    pub fn includes(&self, status: BranchStatus) -> bool {
        match status {
            BranchStatus::Environment => false,
            BranchStatus::FullyMerged | BranchStatus::LocalOrphan => true,
            BranchStatus::Mergeable | BranchStatus::NeverMerged => *self == CleanupMode::All,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            CleanupMode::Safe => "fully merged or local-only",
            CleanupMode::All => "non-environment",
        }
    }
}

/// Branches the mode allows deleting, minus the checked-out one.
pub fn eligible_candidates(
    summaries: &[FeatureBranchSummary],
    mode: CleanupMode,
) -> Vec<Candidate> {
    summaries
        .iter()
        .filter(|summary| mode.includes(summary.status) && !summary.is_current)
        .map(|summary| Candidate {
            name: summary.name.clone(),
            status: summary.status,
        })
        .collect()
}

/// The checked-out branch, when the mode would otherwise offer it.
pub fn skipped_current_branch(
    summaries: &[FeatureBranchSummary],
    mode: CleanupMode,
) -> Option<&str> {
    summaries
        .iter()
        .find(|summary| summary.is_current && mode.includes(summary.status))
        .map(|summary| summary.name.as_str())
}

pub struct CleanupOrchestrator<'a, D: BranchDeletion, P: CleanupPrompter> {
    deleter: &'a D,
    prompter: P,
}

impl<'a, D: BranchDeletion, P: CleanupPrompter> CleanupOrchestrator<'a, D, P> {
    pub fn new(deleter: &'a D, prompter: P) -> Self {
        Self { deleter, prompter }
    }

    /// Confirm, select, confirm again, delete. Each step only runs when the
    /// previous one said yes.
    pub fn run(
        &self,
        summaries: &[FeatureBranchSummary],
        mode: CleanupMode,
    ) -> Result<CleanupOutcome> {
        if let Some(current) = skipped_current_branch(summaries, mode) {
            println!("Skipping {}: it is currently checked out", current);
        }

        let candidates = eligible_candidates(summaries, mode);

        if candidates.is_empty() {
            println!("🧹 No {} branches to delete.", mode.describe());
            return Ok(CleanupOutcome::NothingEligible);
        }

        if !self.prompter.is_interactive() {
            tracing::warn!("Cleanup needs an interactive terminal; skipping the deletion prompts");
            return Ok(CleanupOutcome::NonInteractive);
        }

        println!();
        let wants_cleanup = self.prompter.confirm(
            &format!(
                "Delete some of the {} {} branches?",
                candidates.len(),
                mode.describe()
            ),
            false,
        )?;
        if !wants_cleanup {
            return Ok(CleanupOutcome::Declined);
        }

        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let defaults: Vec<bool> = candidates
            .iter()
            .map(|c| CleanupMode::Safe.includes(c.status))
            .collect();

        let selected: Vec<String> = self
            .prompter
            .select(
                "Select branches to delete (space to toggle, enter to confirm)",
                &names,
                &defaults,
            )?
            .into_iter()
            .filter_map(|index| names.get(index).cloned())
            .collect();

        if selected.is_empty() {
            println!("No branches selected, nothing deleted.");
            return Ok(CleanupOutcome::NothingSelected);
        }

        let confirmed = self.prompter.confirm(
            &format!(
                "Really delete {} {}? This cannot be undone",
                selected.len(),
                if selected.len() == 1 { "branch" } else { "branches" }
            ),
            false,
        )?;
        if !confirmed {
            println!("Cancelled, nothing deleted.");
            return Ok(CleanupOutcome::Cancelled);
        }

        let report = self.deleter.delete_branches(&selected);
        show_deletion_results(&report);

        Ok(CleanupOutcome::Deleted(report))
    }
}

fn show_deletion_results(report: &DeletionReport) {
    println!("🧹 Cleanup Complete");
    println!("==================\n");

    if !report.remote_deleted.is_empty() {
        println!(
            "  ✅ Removed {} remote branches",
            report.remote_deleted.len()
        );
    }

    if !report.local_deleted.is_empty() {
        println!("  ✅ Removed {} local branches", report.local_deleted.len());
    }

    if report.has_failures() {
        println!("\n⚠️  Some branches couldn't be deleted:");
        for name in report.remote_failed.iter().chain(&report.local_failed) {
            println!("  • {}", name);
        }
    }
}
