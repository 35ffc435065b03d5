//! agllm - Autograder Feedback Generator
//!
//! Turns a student repository snapshot and its autograder report into
//! formative, question-based feedback from a locally hosted language model:
//! - Collects every non-hidden source file of the submission
//! - Detects perfect scores to pick the right system instruction
//! - Retrieves recent teacher-reviewed comments as context
//! - Records the submission and generated feedback in SQLite
//!
//! # Architecture
//!
//! - **Types**: Core data structures (SourceFile, CodeBundle, ScoreVerdict)
//! - **Storage**: SQLite schema, history retrieval, transactional writer
//! - **Services**: Ollama generation client
//! - **Pipeline**: One straight-line run per repository
//!
//! # Example
//!
//! ```ignore
//! use agllm_core::{AppConfig, OllamaClient, LlmConfig, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> agllm_core::Result<()> {
//!     let config = AppConfig::from_args(Default::default());
//!     let client = OllamaClient::new(LlmConfig::from_app_config(&config))?;
//!     let report = Pipeline::new(&config, &client).run("repo42").await?;
//!     println!("stored submission {}", report.submission_id);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod score;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, ConfigArgs};
pub use error::{AgllmError, Result};
pub use pipeline::{Pipeline, RunReport};
pub use prompts::{PromptLookup, PromptStore};
pub use services::{LlmConfig, OllamaClient, TextGenerator};
pub use storage::{sqlite::SqliteStorage, StorageBackend, TableCounts};
pub use types::{CodeBundle, ScoreVerdict, SourceFile, SubmissionId};
