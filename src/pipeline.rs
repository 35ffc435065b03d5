//! End-to-end feedback run for one repository
//!
//! Collect sources, classify the autograder report, pull reviewed history,
//! assemble the prompt, generate, write markdown, persist. Any error stops
//! the run; nothing is persisted unless generation succeeded.

use crate::assembler::{PromptAssembler, PromptInputs};
use crate::collector;
use crate::config::AppConfig;
use crate::error::{AgllmError, Result};
use crate::prompts::PromptStore;
use crate::score;
use crate::services::TextGenerator;
use crate::storage::history::prior_feedback;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::StorageBackend;
use crate::types::{utc_timestamp, CodeBundle, NewSubmission, ScoreVerdict, SubmissionId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub repo_name: String,
    pub submission_id: SubmissionId,
    pub file_count: usize,
    pub verdict: ScoreVerdict,
    pub feedback_path: PathBuf,
}

/// Orchestrates a single invocation
pub struct Pipeline<'a> {
    config: &'a AppConfig,
    generator: &'a dyn TextGenerator,
    assembler: PromptAssembler,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AppConfig, generator: &'a dyn TextGenerator) -> Self {
        let store = PromptStore::new(&config.prompts_dir, &config.prompt_default);
        let assembler =
            PromptAssembler::new(store, &config.prompt_default, &config.prompt_perfect);

        Self {
            config,
            generator,
            assembler,
        }
    }

    /// Generate and record feedback for `repo_name`
    pub async fn run(&self, repo_name: &str) -> Result<RunReport> {
        if repo_name.trim().is_empty() {
            return Err(AgllmError::Usage("repository name is empty".to_string()));
        }

        let bundle = collector::collect(&self.config.student_code_dir())?;
        let autograder_output = read_optional(&self.config.autograder_file());
        let instructions = read_optional(&self.config.instructions_file());
        let verdict = score::verdict(&autograder_output);
        info!("Autograder verdict for {}: {}", repo_name, verdict);

        let mut storage = SqliteStorage::open(&self.config.db_path)?;
        let outcome = self
            .run_with_store(
                &mut storage,
                repo_name,
                &bundle,
                &autograder_output,
                &instructions,
                verdict,
            )
            .await;
        let closed = storage.close();

        let report = outcome?;
        closed?;
        Ok(report)
    }

    async fn run_with_store<S: StorageBackend>(
        &self,
        storage: &mut S,
        repo_name: &str,
        bundle: &CodeBundle,
        autograder_output: &str,
        instructions: &str,
        verdict: ScoreVerdict,
    ) -> Result<RunReport> {
        let timestamp = utc_timestamp();
        let history = prior_feedback(&*storage, repo_name)?;
        let student_code = bundle.blob();

        let prompt = self.assembler.assemble(
            verdict,
            PromptInputs {
                student_code: &student_code,
                autograder_output,
                instructions,
                prior_feedback: &history,
            },
        )?;
        debug!("Assembled prompt:\n{}", prompt);

        let feedback_text = self.generator.generate(&prompt).await?;
        info!(
            "Generated {} bytes of feedback with {}",
            feedback_text.len(),
            self.generator.model_name()
        );

        let feedback_path = self.config.feedback_file();
        write_feedback_markdown(&feedback_path, repo_name, &feedback_text)?;
        info!("Feedback saved to {}", feedback_path.display());

        let receipt = storage.record_submission(&NewSubmission {
            repo_name,
            assignment_id: self.config.assignment_id,
            bundle,
            autograder_output,
            feedback_text: &feedback_text,
            timestamp,
        })?;

        Ok(RunReport {
            repo_name: repo_name.to_string(),
            submission_id: receipt.submission_id,
            file_count: receipt.file_count,
            verdict,
            feedback_path,
        })
    }
}

/// Markdown document written next to the student's logs
pub fn feedback_markdown(repo_name: &str, feedback_text: &str) -> String {
    format!("# Feedback for {}\n\n{}", repo_name, feedback_text)
}

fn write_feedback_markdown(path: &Path, repo_name: &str, feedback_text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, feedback_markdown(repo_name, feedback_text))?;
    Ok(())
}

/// Missing optional inputs read as empty text
fn read_optional(path: &Path) -> String {
    if path.exists() {
        collector::read_text(path)
    } else {
        debug!("{} not present, using empty text", path.display());
        String::new()
    }
}
