//! Prompt assembly
//!
//! Chooses the system instruction for the autograder verdict and lays out
//! the labeled sections the model sees. Inputs are passed through whole;
//! there is no truncation or token budgeting.

use crate::error::Result;
use crate::prompts::{PromptLookup, PromptStore};
use crate::types::ScoreVerdict;
use tracing::{debug, warn};

/// Built-in instruction used when no perfect-score template is on disk
pub const BUILTIN_PERFECT_INSTRUCTION: &str = "The autograder awarded a perfect score. \
Congratulate the student briefly. THEN examine Professor Instructions: ask guiding questions \
only if the code violates a requirement (e.g. banned libraries, time complexity). Otherwise \
add no further guidance.";

/// Built-in instruction used when no guided-feedback template is on disk
pub const BUILTIN_GUIDED_INSTRUCTION: &str =
    "Provide question-based guided feedback; do not supply final answers.";

/// Inputs to the final prompt, borrowed from the pipeline
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub student_code: &'a str,
    pub autograder_output: &'a str,
    pub instructions: &'a str,
    pub prior_feedback: &'a str,
}

/// Selects system instructions and renders prompts
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    store: PromptStore,
    default_template: String,
    perfect_template: String,
}

impl PromptAssembler {
    pub fn new(
        store: PromptStore,
        default_template: impl Into<String>,
        perfect_template: impl Into<String>,
    ) -> Self {
        Self {
            store,
            default_template: default_template.into(),
            perfect_template: perfect_template.into(),
        }
    }

    /// System instruction for `verdict`, falling back to the built-in text
    pub fn system_instruction(&self, verdict: ScoreVerdict) -> Result<String> {
        let (template, builtin) = match verdict {
            ScoreVerdict::Perfect => (&self.perfect_template, BUILTIN_PERFECT_INSTRUCTION),
            ScoreVerdict::NeedsWork => (&self.default_template, BUILTIN_GUIDED_INSTRUCTION),
        };

        match self.store.read(Some(template))? {
            PromptLookup::Found(text) => {
                debug!("Using prompt template {}", template);
                Ok(text)
            }
            PromptLookup::UseDefault => {
                warn!(
                    "Prompt template {} not found in {}, using built-in instruction",
                    template,
                    self.store.base_dir().display()
                );
                Ok(builtin.to_string())
            }
        }
    }

    /// Full model input for `verdict`
    pub fn assemble(&self, verdict: ScoreVerdict, inputs: PromptInputs<'_>) -> Result<String> {
        let instruction = self.system_instruction(verdict)?;
        Ok(render(&instruction, inputs))
    }
}

/// Lay out the prompt sections in their fixed order
pub fn render(instruction: &str, inputs: PromptInputs<'_>) -> String {
    format!(
        "{instruction}\n\n\
         **Student Code**\n{code}\n\n\
         **Autograder Output**\n{autograder}\n\n\
         **Professor Instructions**\n{instructions}\n\n\
         **Recent Teacher Feedback (for context)**\n{history}\n",
        instruction = instruction,
        code = inputs.student_code,
        autograder = inputs.autograder_output,
        instructions = inputs.instructions,
        history = inputs.prior_feedback,
    )
}
