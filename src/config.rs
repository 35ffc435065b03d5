//! Run configuration for agllm
//!
//! Every setting is resolved once at process start, in this order:
//! 1. Explicit command-line flag
//! 2. Environment variable
//! 3. Documented default (paths hang off the user's home directory)
//!
//! The resulting [`AppConfig`] is passed by reference to each component;
//! nothing else reads the environment.

use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_DB_FILE: &str = "agllmdatabase.db";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_OLLAMA_HOST: &str = "http://ollama:11434";
pub const DEFAULT_PROMPT_NAME: &str = "system_default.md";
pub const DEFAULT_PERFECT_PROMPT_NAME: &str = "system_perfect.md";
pub const DEFAULT_ASSIGNMENT_ID: i64 = 101;

/// Request timeout for the generation endpoint
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Overridable settings as seen on the command line
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// SQLite database path
    #[arg(long = "db", env = "AGLLM_DB")]
    pub db_path: Option<PathBuf>,

    /// Root directory holding studentcode/, the autograder report and README.md
    #[arg(long, env = "AGLLM_LOGS_DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Model identifier sent to the generation endpoint
    #[arg(long, env = "OLLAMA_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Ollama server
    #[arg(long, env = "OLLAMA_HOST")]
    pub ollama_host: Option<String>,

    /// Directory containing prompt templates
    #[arg(long, env = "PROMPTS_DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Prompt template used for guided (non-perfect) feedback
    #[arg(long, env = "PROMPT_DEFAULT")]
    pub prompt_default: Option<String>,

    /// Prompt template used when the autograder reports full marks
    #[arg(long, env = "PROMPT_PERFECT")]
    pub prompt_perfect: Option<String>,

    /// Assignment identifier recorded with each submission
    #[arg(long, env = "AGLLM_ASSIGNMENT_ID")]
    pub assignment_id: Option<i64>,
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub logs_dir: PathBuf,
    pub model: String,
    pub ollama_host: String,
    pub prompts_dir: PathBuf,
    pub prompt_default: String,
    pub prompt_perfect: String,
    pub assignment_id: i64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Resolve defaults against the current user's home directory
    pub fn from_args(args: ConfigArgs) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::from_args_with_home(args, &home)
    }

    /// Resolve defaults against an explicit home directory
    pub fn from_args_with_home(args: ConfigArgs, home: &Path) -> Self {
        let config = Self {
            db_path: args.db_path.unwrap_or_else(|| home.join(DEFAULT_DB_FILE)),
            logs_dir: args.logs_dir.unwrap_or_else(|| home.join("logs")),
            model: args.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ollama_host: args
                .ollama_host
                .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            prompts_dir: args.prompts_dir.unwrap_or_else(|| home.join("prompts")),
            prompt_default: args
                .prompt_default
                .unwrap_or_else(|| DEFAULT_PROMPT_NAME.to_string()),
            prompt_perfect: args
                .prompt_perfect
                .unwrap_or_else(|| DEFAULT_PERFECT_PROMPT_NAME.to_string()),
            assignment_id: args.assignment_id.unwrap_or(DEFAULT_ASSIGNMENT_ID),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        debug!("Resolved configuration: {:?}", config);
        config
    }

    /// Directory holding the student's source tree
    pub fn student_code_dir(&self) -> PathBuf {
        self.logs_dir.join("studentcode")
    }

    /// Plain-text autograder report
    pub fn autograder_file(&self) -> PathBuf {
        self.logs_dir.join("autograder_output.txt")
    }

    /// Assignment instructions written by the professor
    pub fn instructions_file(&self) -> PathBuf {
        self.logs_dir.join("README.md")
    }

    /// Markdown file receiving the generated feedback
    pub fn feedback_file(&self) -> PathBuf {
        self.logs_dir.join("feedback.md")
    }
}
