// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Line diff of two text files

use async_trait::async_trait;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::Path;

use super::{Comparison, Tool, ToolArgs, ToolOutput};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

pub struct CompareFilesTool {
    context_lines: usize,
}

impl CompareFilesTool {
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }
}

#[async_trait]
impl Tool for CompareFilesTool {
    fn name(&self) -> &'static str {
        "compare_files"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Compare two text files and show their differences (unified diff).
- args schema:
  {
    "file1": "string, path to the first file",
    "file2": "string, path to the second file",
    "context_lines": "optional integer, lines of context around changes (default 3)"
  }
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let file1 = args.require("file1")?;
        let file2 = args.require("file2")?;
        let context = args.usize_or("context_lines", self.context_lines);
        Ok(ToolOutput::Comparison(compare_files(&file1, &file2, context)?))
    }
}

pub fn compare_files(file1: &str, file2: &str, context_lines: usize) -> Result<Comparison> {
    let p1 = normalize_path(file1);
    let p2 = normalize_path(file2);

    if !p1.exists() {
        return Err(AgentError::tool(format!("First file not found: {}", file1)));
    }
    if !p2.exists() {
        return Err(AgentError::tool(format!("Second file not found: {}", file2)));
    }

    let old = read_text(&p1, file1)?;
    let new = read_text(&p2, file2)?;

    let diff = TextDiff::from_lines(&old, &new);
    let changes = diff
        .iter_all_changes()
        .filter(|c| c.tag() != ChangeTag::Equal)
        .count();

    let (identical, text) = if changes == 0 {
        (true, String::new())
    } else {
        let text = diff
            .unified_diff()
            .context_radius(context_lines)
            .header(&p1.display().to_string(), &p2.display().to_string())
            .to_string();
        (false, text)
    };

    Ok(Comparison {
        file1: p1,
        file2: p2,
        identical,
        diff: text,
        changes,
    })
}

fn read_text(path: &Path, shown: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|_| AgentError::tool(format!("Cannot read {} as text (binary file?)", shown)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair(a: &str, b: &str) -> (TempDir, String, String) {
        let dir = TempDir::new().unwrap();
        let p1 = dir.path().join("a.txt");
        let p2 = dir.path().join("b.txt");
        fs::write(&p1, a).unwrap();
        fs::write(&p2, b).unwrap();
        let (s1, s2) = (p1.to_string_lossy().into_owned(), p2.to_string_lossy().into_owned());
        (dir, s1, s2)
    }

    #[test]
    fn test_identical_files() {
        let (_dir, a, b) = pair("same\n", "same\n");
        let cmp = compare_files(&a, &b, 3).unwrap();
        assert!(cmp.identical);
        assert!(cmp.diff.is_empty());
        assert_eq!(cmp.changes, 0);
    }

    #[test]
    fn test_unified_diff_and_change_count() {
        let (_dir, a, b) = pair("one\ntwo\nthree\n", "one\n2\nthree\nfour\n");
        let cmp = compare_files(&a, &b, 3).unwrap();

        assert!(!cmp.identical);
        assert_eq!(cmp.changes, 3);
        assert!(cmp.diff.starts_with(&format!("--- {}\n+++ {}\n", a, b)));
        assert!(cmp.diff.contains("-two\n"));
        assert!(cmp.diff.contains("+2\n"));
        assert!(cmp.diff.contains("+four\n"));
    }

    #[test]
    fn test_binary_file_rejected() {
        let (dir, a, _) = pair("text\n", "");
        let bin = dir.path().join("blob.bin");
        fs::write(&bin, [0xffu8, 0xfe, 0x00]).unwrap();
        let bin = bin.to_string_lossy().into_owned();

        let err = compare_files(&a, &bin, 3).unwrap_err();
        assert_eq!(err.to_string(), format!("Cannot read {} as text (binary file?)", bin));
    }

    #[test]
    fn test_missing_files() {
        let (dir, a, _) = pair("", "");
        let missing = dir.path().join("zz.txt").to_string_lossy().into_owned();
        assert_eq!(
            compare_files(&missing, &a, 3).unwrap_err().to_string(),
            format!("First file not found: {}", missing)
        );
        assert_eq!(
            compare_files(&a, &missing, 3).unwrap_err().to_string(),
            format!("Second file not found: {}", missing)
        );
    }
}
