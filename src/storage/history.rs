//! Prior-feedback retrieval
//!
//! Pulls the latest teacher comments for a repository and renders them as
//! the context block of the prompt.

use super::StorageBackend;
use crate::error::Result;
use tracing::debug;

/// Number of reviewed comments carried into a new prompt
pub const HISTORY_LIMIT: usize = 3;

/// Rendered in place of history when no reviewed comments exist
pub const NO_HISTORY: &str = "None so far.";

/// Join comments with a blank line, or return the sentinel when empty
pub fn format_history(comments: &[String]) -> String {
    if comments.is_empty() {
        NO_HISTORY.to_string()
    } else {
        comments.join("\n\n")
    }
}

/// Fetch and render the history block for `repo_name`
pub fn prior_feedback<S: StorageBackend + ?Sized>(store: &S, repo_name: &str) -> Result<String> {
    let comments = store.recent_teacher_comments(repo_name, HISTORY_LIMIT)?;
    debug!(
        "Retrieved {} reviewed comment(s) for {}",
        comments.len(),
        repo_name
    );
    Ok(format_history(&comments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_when_empty() {
        assert_eq!(format_history(&[]), "None so far.");
    }

    #[test]
    fn test_blank_line_separation() {
        let comments = vec!["newest".to_string(), "older".to_string()];
        assert_eq!(format_history(&comments), "newest\n\nolder");
    }
}
