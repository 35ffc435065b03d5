//! Services layer for agllm
//!
//! Provides the language-model integration used to generate feedback.

pub mod llm;

pub use llm::{LlmConfig, OllamaClient, TextGenerator};
