// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory listing tool

use async_trait::async_trait;
use chrono::{DateTime, Local};
use glob::Pattern;
use std::fs;

use super::{DirEntryInfo, DirectoryListing, Tool, ToolArgs, ToolOutput};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

/// Lists one directory
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn description(&self) -> &'static str {
        r#"
- description: List contents of a directory with file/folder details.
  Shows names, types, sizes, and modification times.
- args schema:
  {
    "path": "optional string, directory path (default is current directory)",
    "show_hidden": "optional boolean, show hidden files (default false)",
    "pattern": "optional string, filter by pattern (e.g. '*.py', '*.txt')"
  }
- notes:
  - Supports common folder names like 'downloads', 'documents'.
  - Directories are listed first.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let path = args.string_or("path", ".");
        let show_hidden = args.bool_or("show_hidden", false);
        let pattern = args.optional("pattern");
        Ok(ToolOutput::Listing(list_directory(&path, show_hidden, pattern.as_deref())?))
    }
}

/// List a directory, directories first, then by case-insensitive name
pub fn list_directory(path: &str, show_hidden: bool, pattern: Option<&str>) -> Result<DirectoryListing> {
    let p = normalize_path(path);

    if !p.exists() {
        return Err(AgentError::tool(format!("Directory not found: {}", path)));
    }
    if !p.is_dir() {
        return Err(AgentError::tool(format!("Path is not a directory: {}", path)));
    }

    let pattern = pattern
        .map(Pattern::new)
        .transpose()
        .map_err(|e| AgentError::tool(format!("Invalid pattern: {}", e)))?;

    let mut items = Vec::new();
    for entry in fs::read_dir(&p)?.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().into_owned();

        if !show_hidden && name.starts_with('.') {
            continue;
        }
        if let Some(ref pattern) = pattern {
            if !pattern.matches(&name) {
                continue;
            }
        }

        // Entries we cannot stat are skipped
        let metadata = match entry.path().metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let is_dir = metadata.is_dir();

        items.push(DirEntryInfo {
            name,
            is_dir,
            size: if is_dir { None } else { Some(metadata.len()) },
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            path: entry.path(),
        });
    }

    items.sort_by_key(|item| (!item.is_dir, item.name.to_lowercase()));

    Ok(DirectoryListing { path: p, items })
}
