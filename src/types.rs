//! Core data types for the agllm feedback pipeline
//!
//! This module defines the values that flow between the collector, the
//! prompt assembler, the model client and the store: source files, the
//! autograder verdict, and the rows written for one submission.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key of a stored submission
///
/// Wraps the SQLite rowid so it cannot be confused with other row ids
/// (code files, feedback) that share the same integer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub i64);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One decoded file from the student repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the code root, always `/` separated
    pub relative_path: String,

    /// Decoded text (empty when the file could not be read)
    pub content: String,
}

/// The full, path-sorted set of files for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBundle {
    pub files: Vec<SourceFile>,
}

impl CodeBundle {
    /// Serialize every file into a single blob
    ///
    /// Each file is preceded by a `File: <relative path>` header line and
    /// followed by a blank line.
    pub fn blob(&self) -> String {
        let mut blob = String::new();
        for file in &self.files {
            blob.push_str("File: ");
            blob.push_str(&file.relative_path);
            blob.push('\n');
            blob.push_str(&file.content);
            blob.push_str("\n\n");
        }
        blob
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Autograder verdict driving prompt selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreVerdict {
    /// Every check passed
    Perfect,

    /// Anything short of full marks, including an empty report
    NeedsWork,
}

impl ScoreVerdict {
    pub fn is_perfect(self) -> bool {
        matches!(self, ScoreVerdict::Perfect)
    }
}

impl std::fmt::Display for ScoreVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreVerdict::Perfect => write!(f, "perfect"),
            ScoreVerdict::NeedsWork => write!(f, "needs_work"),
        }
    }
}

/// Everything persisted for one run, written in a single transaction
#[derive(Debug, Clone)]
pub struct NewSubmission<'a> {
    pub repo_name: &'a str,
    pub assignment_id: i64,
    pub bundle: &'a CodeBundle,
    pub autograder_output: &'a str,
    pub feedback_text: &'a str,

    /// Shared timestamp for the submission, autograder and feedback rows
    pub timestamp: String,
}

/// Keys generated while persisting a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub feedback_id: i64,
    pub file_count: usize,
}

/// Current UTC time as an RFC 3339 string with a `Z` suffix
///
/// Microsecond precision keeps the strings lexicographically ordered by
/// time, which the history query relies on.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
