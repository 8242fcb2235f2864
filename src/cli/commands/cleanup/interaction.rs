use crate::utils::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};

pub const NON_INTERACTIVE_ENV_VAR: &str = "MERGEWATCH_NON_INTERACTIVE";

/// The questions the cleanup flow asks. Abstracted so the flow can be driven
/// without a terminal.
pub trait CleanupPrompter {
    fn is_interactive(&self) -> bool {
        true
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Returns the indices of the chosen items.
    fn select(&self, prompt: &str, items: &[String], defaults: &[bool]) -> Result<Vec<usize>>;
}

pub struct TerminalPrompter;

impl CleanupPrompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        !(std::env::var(NON_INTERACTIVE_ENV_VAR).is_ok()
            || std::env::var("CI").is_ok()
            || !atty::is(atty::Stream::Stdin))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&self, prompt: &str, items: &[String], defaults: &[bool]) -> Result<Vec<usize>> {
        Ok(MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact()?)
    }
}
