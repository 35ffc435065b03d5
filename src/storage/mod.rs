//! Storage layer for agllm
//!
//! Provides the relational store for submissions, per-file contents,
//! autograder output and generated feedback, plus the read side used to
//! retrieve prior teacher-reviewed comments.

pub mod history;
pub mod schema;
pub mod sqlite;

use crate::error::Result;
use crate::types::{NewSubmission, SubmissionReceipt};

pub use history::{format_history, HISTORY_LIMIT, NO_HISTORY};

/// Storage backend trait defining all required operations
pub trait StorageBackend {
    /// Most recent teacher comments on reviewed feedback, newest first
    fn recent_teacher_comments(&self, repo_name: &str, limit: usize) -> Result<Vec<String>>;

    /// Persist a submission and all of its child rows atomically
    fn record_submission(&mut self, submission: &NewSubmission<'_>) -> Result<SubmissionReceipt>;
}

/// Row counts per table, used by diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub submissions: i64,
    pub code_files: i64,
    pub autograder_outputs: i64,
    pub feedback: i64,
}
