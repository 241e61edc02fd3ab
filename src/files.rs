//! Directory walks behind `large_files`, `duplicates` and `file_types`.

use crate::core::error::AssistantError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn ensure_dir(directory: &Path) -> Result<(), AssistantError> {
    if directory.is_dir() {
        Ok(())
    } else {
        Err(AssistantError::Input(format!(
            "'{}' is not a directory.",
            directory.display()
        )))
    }
}

fn files_under(directory: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
}

/// Files strictly larger than `size_limit_mb` megabytes.
pub fn find_large_files(directory: &Path, size_limit_mb: u64) -> Result<Vec<PathBuf>, AssistantError> {
    ensure_dir(directory)?;
    let limit = size_limit_mb.saturating_mul(1024 * 1024);

    let large: Vec<PathBuf> = files_under(directory)
        .filter(|e| e.metadata().map(|m| m.len() > limit).unwrap_or(false))
        .map(|e| e.into_path())
        .collect();

    tracing::info!(dir = %directory.display(), count = large.len(), "large file search finished");
    Ok(large)
}

/// Every file whose content hash matches an earlier file in walk order.
pub fn find_duplicate_files(directory: &Path) -> Result<Vec<PathBuf>, AssistantError> {
    ensure_dir(directory)?;
    let mut seen: HashMap<[u8; 16], PathBuf> = HashMap::new();
    let mut duplicates = Vec::new();

    for entry in files_under(directory) {
        let bytes = match fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), "skipping unreadable file: {}", e);
                continue;
            }
        };
        let digest = md5::compute(&bytes).0;
        if seen.contains_key(&digest) {
            duplicates.push(entry.into_path());
        } else {
            seen.insert(digest, entry.into_path());
        }
    }

    tracing::info!(dir = %directory.display(), count = duplicates.len(), "duplicate search finished");
    Ok(duplicates)
}

/// Files whose lower-cased name ends with any of `extensions` (`".rs"` or `"rs"`).
pub fn find_files_by_extension(
    directory: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, AssistantError> {
    ensure_dir(directory)?;
    let suffixes: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
        .collect();

    if suffixes.is_empty() {
        return Err(AssistantError::Input("No file extensions provided.".to_string()));
    }

    let matching: Vec<PathBuf> = files_under(directory)
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            suffixes.iter().any(|s| name.ends_with(s.as_str()))
        })
        .map(|e| e.into_path())
        .collect();

    tracing::info!(dir = %directory.display(), count = matching.len(), "extension search finished");
    Ok(matching)
}
