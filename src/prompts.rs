//! Prompt template store
//!
//! Templates are plain text files in a configured directory. A missing file
//! is an expected outcome (callers fall back to a built-in instruction), so
//! it is reported through [`PromptLookup`] rather than as an error.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of resolving a template name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptLookup {
    /// Trimmed file contents
    Found(String),

    /// No regular file at the resolved path
    UseDefault,
}

/// Reads named prompt templates from disk
#[derive(Debug, Clone)]
pub struct PromptStore {
    base: PathBuf,
    default_name: String,
}

impl PromptStore {
    pub fn new(base: impl Into<PathBuf>, default_name: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            default_name: default_name.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Resolve a template, re-reading it from disk on every call
    ///
    /// `None` reads the store's default template.
    pub fn read(&self, name: Option<&str>) -> Result<PromptLookup> {
        let name = name.unwrap_or(&self.default_name);
        let path = self.base.join(name);

        if !path.is_file() {
            debug!("Prompt file not found: {}", path.display());
            return Ok(PromptLookup::UseDefault);
        }

        let text = std::fs::read_to_string(&path)?;
        debug!("Loaded prompt template {}", path.display());
        Ok(PromptLookup::Found(text.trim().to_string()))
    }
}
