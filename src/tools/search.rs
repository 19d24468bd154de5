// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Recursive text search inside files

use async_trait::async_trait;
use glob::Pattern;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{ContentMatch, ContentSearch, Tool, ToolArgs, ToolOutput};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

/// Searches file contents for a substring
pub struct SearchContentTool {
    max_results: usize,
    max_file_bytes: u64,
}

impl SearchContentTool {
    pub fn new(max_results: usize, max_file_bytes: u64) -> Self {
        Self {
            max_results,
            max_file_bytes,
        }
    }
}

#[async_trait]
impl Tool for SearchContentTool {
    fn name(&self) -> &'static str {
        "search_content"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Search for text content inside files (like grep).
  Use it to find which files contain specific text, code, or keywords.
- args schema:
  {
    "query": "string, text to search for",
    "path": "optional string, directory to search in (default is current directory)",
    "file_pattern": "optional string, only search files matching pattern (e.g. '*.py')",
    "max_results": "optional integer, maximum matches to return (default 20)",
    "case_sensitive": "optional boolean, case-sensitive search (default false)"
  }
- notes:
  - Searches recursively through subdirectories.
  - Shows the file path, line number, and matching line.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let query = args.require("query")?;
        let path = args.string_or("path", ".");
        let file_pattern = args.optional("file_pattern");
        let max_results = args.usize_or("max_results", self.max_results);
        let case_sensitive = args.bool_or("case_sensitive", false);

        let search = search_content(
            &query,
            &path,
            file_pattern.as_deref(),
            max_results,
            case_sensitive,
            self.max_file_bytes,
        )?;
        Ok(ToolOutput::Search(search))
    }
}

/// Find lines containing `query` in files below `path`
pub fn search_content(
    query: &str,
    path: &str,
    file_pattern: Option<&str>,
    max_results: usize,
    case_sensitive: bool,
    max_file_bytes: u64,
) -> Result<ContentSearch> {
    let root = normalize_path(path);
    if !root.exists() {
        return Err(AgentError::tool(format!("Directory not found: {}", path)));
    }
    if !root.is_dir() {
        return Err(AgentError::tool(format!("Path is not a directory: {}", path)));
    }

    let pattern = file_pattern
        .map(Pattern::new)
        .transpose()
        .map_err(|e| AgentError::tool(format!("Invalid pattern: {}", e)))?;

    let needle = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    let mut results = Vec::new();

    'files: for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(ref pattern) = pattern {
            if !pattern.matches(&entry.file_name().to_string_lossy()) {
                continue;
            }
        }

        match entry.metadata() {
            Ok(m) if m.len() <= max_file_bytes => {}
            _ => {
                debug!("Skipping {:?}", entry.path());
                continue;
            }
        }

        let bytes = match fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        let text = String::from_utf8_lossy(&bytes);
        let file = relative_name(&root, entry.path());

        for (idx, line) in text.lines().enumerate() {
            let hit = if case_sensitive {
                line.contains(&needle)
            } else {
                line.to_lowercase().contains(&needle)
            };
            if !hit {
                continue;
            }

            if results.len() >= max_results {
                break 'files;
            }
            results.push(ContentMatch {
                file: file.clone(),
                line_number: idx + 1,
                line_content: line.trim_end().to_string(),
            });
        }
    }

    let truncated = results.len() >= max_results;
    info!("search_content {:?}: {} match(es)", query, results.len());

    Ok(ContentSearch {
        query: query.to_string(),
        search_path: root,
        results,
        truncated,
    })
}

fn relative_name(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
