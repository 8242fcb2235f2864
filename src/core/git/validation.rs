use crate::utils::error::{MergeWatchError, Result};
use regex::Regex;

/// Ref-name checks applied to user-supplied branch and remote names before
/// they reach a git command line.
pub struct GitValidator;

impl GitValidator {
    pub fn validate_branch_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(MergeWatchError::invalid_branch_name(name, "name is empty"));
        }

        if name.len() > 250 {
            return Err(MergeWatchError::invalid_branch_name(name, "name too long"));
        }

        let invalid_patterns = [
            (r"\.\.", "contains '..'"),
            (r"^-", "starts with '-'"),
            (r"/$", "ends with '/'"),
            (r"\.lock$", "ends with '.lock'"),
            (r"[ \t]", "contains whitespace"),
            (r"[\x00-\x1f\x7f]", "contains control characters"),
            (r"~|\^|:|\\|\*|\?|\[", "contains special git characters"),
            (r"^@$", "is exactly '@'"),
            (r"/\.", "contains '/.'"),
            (r"@\{", "contains '@{'"),
        ];

        for (pattern, reason) in invalid_patterns {
            let regex = Regex::new(pattern)?;
            if regex.is_match(name) {
                return Err(MergeWatchError::invalid_branch_name(name, reason));
            }
        }

        if name.starts_with("refs/") {
            return Err(MergeWatchError::invalid_branch_name(
                name,
                "starts with 'refs/'",
            ));
        }

        Ok(())
    }
}
