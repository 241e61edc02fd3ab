use super::handler::CommandHandler;
use super::{AssistantState, require, split_fields};
use crate::analysis::{self, Analysis};
use crate::core::error::AssistantError;
use crate::files;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct LargeFilesCommand;
pub struct DuplicatesCommand;
pub struct FileTypesCommand;
pub struct AnalyzeCodeCommand;
pub struct AnalyzeSelfCommand;

fn list_or(paths: Vec<PathBuf>, empty: &str) -> String {
    if paths.is_empty() {
        empty.to_string()
    } else {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl CommandHandler for LargeFilesCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let fields = split_fields(argument, 2, "large_files <directory>,<size_limit_mb>")?;
        let size_mb: u64 = fields[1].parse().map_err(|_| {
            AssistantError::Input(format!(
                "Size limit '{}' is not a whole number of megabytes.",
                fields[1]
            ))
        })?;

        let found = files::find_large_files(Path::new(fields[0]), size_mb)?;
        Ok(list_or(found, "No large files found."))
    }

    fn help(&self) -> &'static str {
        "large_files <directory>,<size_limit_mb> - Finds large files exceeding the size limit."
    }
}

#[async_trait]
impl CommandHandler for DuplicatesCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let directory = require(argument, "No directory provided.")?;
        let found = files::find_duplicate_files(Path::new(directory))?;
        Ok(list_or(found, "No duplicate files found."))
    }

    fn help(&self) -> &'static str {
        "duplicates <directory> - Finds duplicate files in a directory."
    }
}

#[async_trait]
impl CommandHandler for FileTypesCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let fields = split_fields(argument, 2, "file_types <directory>,<ext1;ext2;...>")?;
        let extensions: Vec<String> = fields[1].split(';').map(str::to_string).collect();

        let found = files::find_files_by_extension(Path::new(fields[0]), &extensions)?;
        Ok(list_or(found, "No matching files found."))
    }

    fn help(&self) -> &'static str {
        "file_types <directory>,<extensions> - Finds files with specific extensions."
    }
}

#[async_trait]
impl CommandHandler for AnalyzeCodeCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let path = require(argument, "No file path provided.")?;
        Ok(analysis::analyze_code(Path::new(path))?.to_string())
    }

    fn help(&self) -> &'static str {
        "analyze_code <file_path> - Analyzes the syntax of a Rust source file."
    }
}

#[async_trait]
impl CommandHandler for AnalyzeSelfCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let root = analysis::own_source_dir();
        let results = analysis::analyze_tree(&root)?;
        let total = results.len();

        let flagged: Vec<String> = results
            .into_iter()
            .filter(|(_, a)| *a != Analysis::Clean)
            .map(|(path, a)| {
                let shown = path.strip_prefix(&root).unwrap_or(path.as_path()).display().to_string();
                format!("{}:\n{}", shown, a)
            })
            .collect();

        if flagged.is_empty() {
            Ok(format!(
                "Analyzed {} source files: no syntax or logical structure issues.",
                total
            ))
        } else {
            Ok(format!(
                "Analyzed {} source files, {} with findings:\n{}",
                total,
                flagged.len(),
                flagged.join("\n\n")
            ))
        }
    }

    fn help(&self) -> &'static str {
        "analyze_self - Analyzes the assistant's own source code."
    }
}
