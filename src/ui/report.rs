use crate::core::classify::{BranchStatus, FeatureBranchSummary};
use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use std::fmt::Write;

const CURRENT_MARKER: &str = "* ";
const MERGED_MARKER: &str = "✓";
const MAX_BRANCH_WIDTH: usize = 50;
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowColor {
    Environment,
    FullyMerged,
    NeverMerged,
    LocalOnly,
    Default,
}

impl RowColor {
    /// Environment > fully merged > never merged > local-only > default.
    pub fn for_summary(summary: &FeatureBranchSummary) -> Self {
        if summary.is_environment_branch() {
            RowColor::Environment
        } else if summary.is_fully_merged() {
            RowColor::FullyMerged
        } else if summary.is_never_merged() {
            RowColor::NeverMerged
        } else if summary.is_local_only() {
            RowColor::LocalOnly
        } else {
            RowColor::Default
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        match self {
            RowColor::Environment => text.blue().bold(),
            RowColor::FullyMerged => text.green(),
            RowColor::NeverMerged => text.red(),
            RowColor::LocalOnly => text.yellow(),
            RowColor::Default => text.normal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub cells: Vec<String>,
    pub color: RowColor,
}

/// Per-category branch names for the follow-up section. Environment
/// branches are never counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCounts {
    pub mergeable: Vec<String>,
    pub fully_merged: Vec<String>,
    pub orphan_local: Vec<String>,
    pub never_merged: Vec<String>,
}

impl CategoryCounts {
    pub fn from_summaries(summaries: &[FeatureBranchSummary]) -> Self {
        let mut counts = Self::default();
        for summary in summaries {
            let bucket = match summary.status {
                BranchStatus::Environment => continue,
                BranchStatus::Mergeable => &mut counts.mergeable,
                BranchStatus::FullyMerged => &mut counts.fully_merged,
                BranchStatus::LocalOrphan => &mut counts.orphan_local,
                BranchStatus::NeverMerged => &mut counts.never_merged,
            };
            bucket.push(summary.name.clone());
        }
        counts
    }

    pub fn safe_to_delete(&self) -> usize {
        self.fully_merged.len() + self.orphan_local.len()
    }

    pub fn needs_attention(&self) -> usize {
        self.mergeable.len() + self.never_merged.len()
    }
}

pub struct ReportRenderer<'a> {
    environments: &'a [String],
    remote: &'a str,
    date_format: &'a str,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(environments: &'a [String], remote: &'a str, date_format: &'a str) -> Self {
        Self {
            environments,
            remote,
            date_format,
        }
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![
            "Branch".to_string(),
            "Last commit".to_string(),
            "Author".to_string(),
            "Hash".to_string(),
            "# files".to_string(),
        ];
        headers.extend(
            self.environments
                .iter()
                .map(|env| self.short_name(env).to_string()),
        );
        headers
    }

    /// Formats that need a time or zone cannot render a bare date; those
    /// fall back to ISO dates.
    fn format_date(&self, date: NaiveDate) -> String {
        let mut formatted = String::new();
        if write!(formatted, "{}", date.format(self.date_format)).is_err() {
            tracing::debug!(format = self.date_format, "date format needs a time, using ISO dates");
            return date.format(FALLBACK_DATE_FORMAT).to_string();
        }
        formatted
    }

    pub fn build_rows(&self, summaries: &[FeatureBranchSummary]) -> Vec<ReportRow> {
        summaries
            .iter()
            .map(|summary| {
                let marker = if summary.is_current { CURRENT_MARKER } else { "  " };
                let name = truncate_string(&summary.name, MAX_BRANCH_WIDTH);

                let (date, author, hash) = match &summary.last_commit {
                    Some(commit) => (
                        self.format_date(commit.date),
                        commit.author.clone(),
                        commit.hash.clone(),
                    ),
                    None => (String::new(), String::new(), String::new()),
                };

                let files = if summary.is_local_only() {
                    String::new()
                } else {
                    summary.files_touched.len().to_string()
                };

                let mut cells = vec![format!("{}{}", marker, name), date, author, hash, files];
                cells.extend(self.environments.iter().map(|env| {
                    if summary.is_merged_into(env) {
                        MERGED_MARKER.to_string()
                    } else {
                        String::new()
                    }
                }));

                ReportRow {
                    cells,
                    color: RowColor::for_summary(summary),
                }
            })
            .collect()
    }

    pub fn render_table(&self, summaries: &[FeatureBranchSummary]) -> String {
        let headers = self.headers();
        let rows = self.build_rows(summaries);

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        // The header row has no marker column.
        widths[0] = widths[0].max(CURRENT_MARKER.len());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_cells: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    format!("  {}", h)
                } else {
                    h.clone()
                }
            })
            .collect();
        widths[0] = widths[0].max(header_cells[0].chars().count());

        let mut out = String::new();
        out.push_str(&format_line(&header_cells, &widths).bold().to_string());
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
        out.push('\n');

        for row in rows {
            out.push_str(&row.color.paint(&format_line(&row.cells, &widths)).to_string());
            out.push('\n');
        }

        out
    }

    pub fn render_follow_up(&self, counts: &CategoryCounts, hint: Option<&str>) -> String {
        let mut out = String::new();

        let groups: [(&Vec<String>, &str, RowColor); 4] = [
            (
                &counts.mergeable,
                "merged into some environments, still pending for others",
                RowColor::Default,
            ),
            (
                &counts.fully_merged,
                "merged into every environment, safe to delete",
                RowColor::FullyMerged,
            ),
            (
                &counts.orphan_local,
                "exist only locally, safe to delete",
                RowColor::LocalOnly,
            ),
            (
                &counts.never_merged,
                "not merged into any environment",
                RowColor::NeverMerged,
            ),
        ];

        for (branches, description, color) in groups {
            if branches.is_empty() {
                continue;
            }
            let heading = format!(
                "{} {} {}:",
                branches.len(),
                if branches.len() == 1 { "branch" } else { "branches" },
                description
            );
            out.push_str(&color.paint(&heading).to_string());
            out.push('\n');
            for branch in branches {
                out.push_str(&format!("    {}\n", branch));
            }
        }

        if out.is_empty() {
            out.push_str(&"✨ Nothing to follow up on.".green().to_string());
            out.push('\n');
        }

        if let Some(hint) = hint {
            out.push('\n');
            out.push_str(&format!("Tip: re-run with cleanup enabled: {}\n", hint.bold()));
        }

        out
    }

    fn short_name<'n>(&self, name: &'n str) -> &'n str {
        name.strip_prefix(self.remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(name)
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
