// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fuzzy file and directory search

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{FindResults, FoundItem, Tool, ToolArgs, ToolOutput};
use crate::fuzzy::match_score;
use crate::paths::home_dir;
use crate::{AgentError, Result};

/// Home sub-folders searched after the working directory
const HOME_FOLDERS: [&str; 3] = ["Downloads", "Documents", "Desktop"];

/// Finds files or directories by approximate name
pub struct FindItemTool {
    max_results: usize,
    threshold: f64,
}

impl FindItemTool {
    pub fn new(max_results: usize, threshold: f64) -> Self {
        Self { max_results, threshold }
    }
}

#[async_trait]
impl Tool for FindItemTool {
    fn name(&self) -> &'static str {
        "find_item"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Search for files or directories by name in sensible locations.
  Searches recursively from the current working directory and the user's
  Downloads, Documents and Desktop folders (where they exist).
- args schema:
  {
    "name": "string, filename or fragment to search for (e.g. 'welcome_prompt.md')",
    "max_results": "optional integer, maximum number of matches to return (default 20)"
  }
- notes:
  - This is for discovery. It does not modify anything.
  - Matching is fuzzy: typos and missing extensions are fine.
  - Use this when you are not sure where a file lives.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let name = args.require("name")?;
        let max_results = args.usize_or("max_results", self.max_results);
        Ok(ToolOutput::Found(find_item(&name, max_results, self.threshold)?))
    }
}

/// Working directory plus existing home folders, without duplicates
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    let home = home_dir();
    for sub in HOME_FOLDERS {
        let candidate = home.join(sub);
        if candidate.is_dir() {
            roots.push(candidate);
        }
    }

    roots
}

/// Search the default roots for `name`
pub fn find_item(name: &str, max_results: usize, threshold: f64) -> Result<FindResults> {
    find_in_roots(name, &default_roots(), max_results, threshold)
}

/// Score every entry below `roots` against `name`, best matches first
pub fn find_in_roots(
    name: &str,
    roots: &[PathBuf],
    max_results: usize,
    threshold: f64,
) -> Result<FindResults> {
    let query = name.trim();
    if query.is_empty() {
        return Err(AgentError::tool("empty name for find_item"));
    }

    let roots = dedup_roots(roots);
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut candidates: Vec<FoundItem> = Vec::new();

    for root in &roots {
        debug!("Searching {:?} for {:?}", root, query);

        // Unreadable entries are skipped, not fatal
        for entry in WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let file_name = entry.file_name().to_string_lossy();
            let score = match_score(query, &file_name);
            if score < threshold {
                continue;
            }

            let path = entry.path().to_path_buf();
            if !seen.insert(path.clone()) {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let size = if entry.file_type().is_file() {
                entry.metadata().ok().map(|m| m.len())
            } else {
                None
            };

            candidates.push(FoundItem {
                path,
                root: root.clone(),
                is_dir,
                size,
                match_score: score,
            });
        }
    }

    // Stable: equal scores keep walk order
    candidates.sort_by(|a, b| b.match_score.partial_cmp(&a.match_score).unwrap_or(Ordering::Equal));
    candidates.truncate(max_results);

    info!("find_item {:?}: {} result(s)", query, candidates.len());

    Ok(FindResults {
        query: query.to_string(),
        roots,
        results: candidates,
        fuzzy_threshold: threshold,
    })
}

fn dedup_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for root in roots {
        let resolved = std::fs::canonicalize(root).unwrap_or_else(|_| root.clone());
        if seen.insert(resolved.clone()) {
            unique.push(resolved);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/reports")).unwrap();
        fs::write(dir.path().join("docs/readme.md"), "# hello").unwrap();
        fs::write(dir.path().join("docs/reports/report_2024.pdf"), "pdf").unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
        dir
    }

    #[test]
    fn test_ranks_best_match_first() {
        let dir = fixture();
        let found = find_in_roots("readme", &[dir.path().to_path_buf()], 20, 0.6).unwrap();

        assert_eq!(found.query, "readme");
        assert!(!found.results.is_empty());
        let best = &found.results[0];
        assert!(best.path.ends_with("docs/readme.md"));
        assert_eq!(best.match_score, 0.95);
        assert_eq!(best.size, Some(7));
        assert!(!best.is_dir);
    }

    #[test]
    fn test_typo_still_finds_file() {
        let dir = fixture();
        let found = find_in_roots("reprot", &[dir.path().to_path_buf()], 20, 0.6).unwrap();
        assert!(found.results.iter().any(|r| r.path.ends_with("report_2024.pdf") || r.path.ends_with("reports")));
    }

    #[test]
    fn test_directories_are_reported() {
        let dir = fixture();
        let found = find_in_roots("reports", &[dir.path().to_path_buf()], 20, 0.6).unwrap();
        let top = &found.results[0];
        assert!(top.is_dir);
        assert_eq!(top.size, None);
        assert_eq!(top.match_score, 1.0);
    }

    #[test]
    fn test_duplicate_roots_are_searched_once() {
        let dir = fixture();
        let root = dir.path().to_path_buf();
        let found = find_in_roots("main.rs", &[root.clone(), root.join("."), root.join("docs")], 20, 0.6).unwrap();

        assert_eq!(found.roots.len(), 2);
        let hits = found.results.iter().filter(|r| r.path.ends_with("main.rs")).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_max_results_and_threshold() {
        let dir = fixture();
        let found = find_in_roots("r", &[dir.path().to_path_buf()], 2, 0.6).unwrap();
        assert_eq!(found.results.len(), 2);

        let none = find_in_roots("zzzzzz", &[dir.path().to_path_buf()], 20, 0.6).unwrap();
        assert!(none.results.is_empty());
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let err = find_in_roots("   ", &[], 20, 0.6).unwrap_err();
        assert_eq!(err.to_string(), "empty name for find_item");
    }
}
