// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Reading and writing text files

use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, info};

use super::{FileContent, FileWrite, Tool, ToolArgs, ToolOutput, WriteMode};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

/// Reads the head of a text file
pub struct ReadFileTool {
    max_bytes: usize,
}

impl ReadFileTool {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Read a text file from disk (for inspection).
- args schema:
  {
    "path": "string, absolute or relative file path",
    "max_bytes": "optional integer, maximum number of bytes to read (default 5000)"
  }
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let path = args.require("path")?;
        let max_bytes = args.usize_or("max_bytes", self.max_bytes);
        Ok(ToolOutput::Content(read_file(&path, max_bytes)?))
    }
}

/// Creates, overwrites or appends to a text file
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Create or modify a text file on disk. Intended for small to medium text files (configs, scripts, code).
- args schema:
  {
    "path": "string, file path - can use shortcuts like 'downloads/file.txt', 'documents/file.txt', 'desktop/file.txt'",
    "content": "string, full new content to write",
    "mode": "optional string, either 'overwrite' or 'append' (default 'overwrite')"
  }
- notes:
  - 'overwrite' replaces the entire file, 'append' adds to the end.
  - Parent directories are created automatically.
  - Examples: "downloads/jokes.txt", "documents/notes.md", "~/myfile.txt"
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let path = args.require("path")?;
        let content = args.string("content").unwrap_or_default();
        let mode = WriteMode::parse(&args.string_or("mode", "overwrite"));
        Ok(ToolOutput::Written(write_file(&path, &content, mode)?))
    }
}

/// Read at most `max_bytes` from a file, decoding lossily as UTF-8
pub fn read_file(path: &str, max_bytes: usize) -> Result<FileContent> {
    read_path(&normalize_path(path), path, max_bytes)
}

/// Read a path that is already resolved, such as a `find_item` result
pub fn read_resolved(path: &Path, max_bytes: usize) -> Result<FileContent> {
    read_path(path, &path.to_string_lossy(), max_bytes)
}

fn read_path(p: &Path, shown: &str, max_bytes: usize) -> Result<FileContent> {
    debug!("Reading {:?} (max {} bytes)", p, max_bytes);

    let file = File::open(p).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AgentError::tool(format!("file not found: {}", shown)),
        _ => AgentError::FileSystem(e),
    })?;

    let (content, truncated) = read_head(file, max_bytes)?;

    Ok(FileContent {
        path: p.to_path_buf(),
        content,
        truncated,
    })
}

/// First `max_bytes` of a reader as text, and whether more followed
pub(crate) fn read_head<R: Read>(reader: R, max_bytes: usize) -> Result<(String, bool)> {
    let mut data = Vec::with_capacity(max_bytes.min(64 * 1024) + 1);
    reader.take((max_bytes as u64).saturating_add(1)).read_to_end(&mut data)?;

    let truncated = data.len() > max_bytes;
    data.truncate(max_bytes);

    Ok((String::from_utf8_lossy(&data).into_owned(), truncated))
}

/// Write `content` to a file, creating parent directories as needed
pub fn write_file(path: &str, content: &str, mode: WriteMode) -> Result<FileWrite> {
    let p = normalize_path(path);

    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                AgentError::tool(format!("could not create parent directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let existed_before = p.exists();
    let bytes_before = file_len(&p);

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Overwrite => options.write(true).truncate(true),
    };

    let mut file = options.open(&p)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    drop(file);

    let bytes_after = file_len(&p);
    info!("Wrote {:?} ({}, {} -> {} bytes)", p, mode, bytes_before, bytes_after);

    Ok(FileWrite {
        path: p,
        mode,
        existed_before,
        bytes_before,
        bytes_after,
    })
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path_str(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_truncates_at_max_bytes() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "big.txt");
        fs::write(&path, "0123456789").unwrap();

        let head = read_file(&path, 4).unwrap();
        assert_eq!(head.content, "0123");
        assert!(head.truncated);

        let whole = read_file(&path, 10).unwrap();
        assert_eq!(whole.content, "0123456789");
        assert!(!whole.truncated);
    }

    #[tokio::test]
    async fn test_huge_max_bytes_reads_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "small.txt");
        fs::write(&path, "all of it").unwrap();

        let args = serde_json::json!({"path": path, "max_bytes": u64::MAX});
        let map = args.as_object().unwrap();
        let output = ReadFileTool::new(5000)
            .run(&ToolArgs::new("read_file", map))
            .await
            .unwrap();
        match output {
            ToolOutput::Content(c) => {
                assert_eq!(c.content, "all of it");
                assert!(!c.truncated);
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_resolved_path_skips_shortcuts() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("project/desktop/notes.txt");
        fs::create_dir_all(nested.parent().unwrap()).unwrap();
        fs::write(&nested, "kept in place").unwrap();

        let content = read_resolved(&nested, 100).unwrap();
        assert_eq!(content.content, "kept in place");
        assert_eq!(content.path, nested);
    }

    #[test]
    fn test_read_missing_file_message() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "nope.txt");
        let err = read_file(&path, 100).unwrap_err();
        assert_eq!(err.to_string(), format!("file not found: {}", path));
    }

    #[test]
    fn test_read_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "bin.dat");
        fs::write(&path, [b'o', b'k', 0xff, b'!']).unwrap();
        let content = read_file(&path, 100).unwrap().content;
        assert_eq!(content, "ok\u{fffd}!");
    }

    #[test]
    fn test_write_overwrite_then_append() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "nested/dir/notes.txt");

        let first = write_file(&path, "hello\n", WriteMode::Overwrite).unwrap();
        assert!(!first.existed_before);
        assert_eq!(first.bytes_before, 0);
        assert_eq!(first.bytes_after, 6);

        let second = write_file(&path, "world\n", WriteMode::Append).unwrap();
        assert!(second.existed_before);
        assert_eq!(second.bytes_before, 6);
        assert_eq!(second.bytes_after, 12);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld\n");

        let third = write_file(&path, "x", WriteMode::Overwrite).unwrap();
        assert_eq!(third.bytes_after, 1);
    }

    #[test]
    fn test_unknown_mode_overwrites() {
        assert_eq!(WriteMode::parse("APPEND"), WriteMode::Append);
        assert_eq!(WriteMode::parse("replace"), WriteMode::Overwrite);
    }
}
