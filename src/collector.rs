//! Student source collection
//!
//! Walks the code root, skips hidden entries, and decodes every regular
//! file with a UTF-8 then Latin-1 chain. A file that cannot be read is kept
//! with empty content so the submission still records its path.

use crate::error::{AgllmError, Result};
use crate::types::{CodeBundle, SourceFile};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Collect every non-hidden file under `root`, sorted by relative path
pub fn collect(root: &Path) -> Result<CodeBundle> {
    if !root.is_dir() {
        return Err(AgllmError::Usage(format!("{} not found", root.display())));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative_path = match entry.path().strip_prefix(root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => continue,
        };

        debug!("Collecting {}", relative_path);
        files.push(SourceFile {
            content: read_text(entry.path()),
            relative_path,
        });
    }

    if files.is_empty() {
        return Err(AgllmError::Usage(format!(
            "No files found in {}",
            root.display()
        )));
    }

    // Component-wise, so `a/b.txt` sorts before `a-b.txt`
    files.sort_by(|a, b| Path::new(&a.relative_path).cmp(Path::new(&b.relative_path)));
    info!("Collected {} file(s) from {}", files.len(), root.display());

    Ok(CodeBundle { files })
}

/// Read a text file, returning empty text when it cannot be read
///
/// Decoding never fails past the read: bytes that are not valid UTF-8 are
/// taken as Latin-1.
pub fn read_text(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => decode(bytes),
        Err(e) => {
            warn!("Could not decode {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
