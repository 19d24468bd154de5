// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Copying and moving files

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Tool, ToolArgs, ToolOutput, Transfer, TransferKind};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

pub struct CopyFileTool;

#[async_trait]
impl Tool for CopyFileTool {
    fn name(&self) -> &'static str {
        "copy_file"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Copy a file to a new location.
- args schema:
  {
    "source": "string, path to the source file",
    "destination": "string, destination path (file or directory)"
  }
- notes:
  - If the destination is a directory, the file keeps its name inside it.
  - Fails if the destination file already exists.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let source = args.require("source")?;
        let destination = args.require("destination")?;
        Ok(ToolOutput::Transfer(copy_file(&source, &destination)?))
    }
}

pub struct MoveFileTool;

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &'static str {
        "move_file"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Move or rename a file.
- args schema:
  {
    "source": "string, path to the source file",
    "destination": "string, destination path (file or directory)"
  }
- notes:
  - Use it to rename files as well as to move them.
  - Overwrites the destination if it exists.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let source = args.require("source")?;
        let destination = args.require("destination")?;
        Ok(ToolOutput::Transfer(move_file(&source, &destination)?))
    }
}

/// Copy `source` to `destination`, refusing to overwrite
pub fn copy_file(source: &str, destination: &str) -> Result<Transfer> {
    let src = checked_source(source)?;
    let dst = resolve_destination(&src, destination);

    if dst.exists() {
        return Err(AgentError::tool(format!(
            "Destination already exists: {}. Use move_file to overwrite.",
            dst.display()
        )));
    }

    create_parent(&dst)?;
    let size = fs::copy(&src, &dst)?;
    info!("Copied {:?} -> {:?}", src, dst);

    Ok(Transfer {
        source: src,
        destination: dst,
        size: Some(size),
        kind: TransferKind::Copied,
    })
}

/// Move or rename `source`, overwriting any existing destination
pub fn move_file(source: &str, destination: &str) -> Result<Transfer> {
    let src = checked_source(source)?;
    let dst = resolve_destination(&src, destination);
    create_parent(&dst)?;

    let size = fs::metadata(&src).map(|m| m.len()).ok();

    if let Err(e) = fs::rename(&src, &dst) {
        // Rename fails across filesystems
        debug!("rename failed ({}), falling back to copy", e);
        fs::copy(&src, &dst)?;
        fs::remove_file(&src)?;
    }

    let kind = if src.parent() == dst.parent() {
        TransferKind::Renamed
    } else {
        TransferKind::Moved
    };
    info!("{} {:?} -> {:?}", kind, src, dst);

    Ok(Transfer {
        source: src,
        destination: dst,
        size,
        kind,
    })
}

fn checked_source(source: &str) -> Result<PathBuf> {
    let src = normalize_path(source);
    if !src.exists() {
        return Err(AgentError::tool(format!("Source file not found: {}", source)));
    }
    if src.is_dir() {
        return Err(AgentError::tool(format!("Source is a directory, not a file: {}", source)));
    }
    Ok(src)
}

fn resolve_destination(src: &Path, destination: &str) -> PathBuf {
    let dst = normalize_path(destination);
    match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst,
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn s(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_copy_into_directory_keeps_name() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let target = dir.path().join("backup");
        fs::write(&src, "abc").unwrap();
        fs::create_dir(&target).unwrap();

        let copied = copy_file(&s(&src), &s(&target)).unwrap();
        assert_eq!(copied.destination, target.join("a.txt"));
        assert_eq!(copied.size, Some(3));
        assert_eq!(copied.kind, TransferKind::Copied);
        assert!(src.exists());
    }

    #[test]
    fn test_copy_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let err = copy_file(&s(&src), &s(&dst)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Destination already exists: {}. Use move_file to overwrite.", dst.display())
        );
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");
    }

    #[test]
    fn test_copy_creates_parents() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "abc").unwrap();

        let dst = dir.path().join("x/y/z.txt");
        copy_file(&s(&src), &s(&dst)).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "abc");
    }

    #[test]
    fn test_source_checks() {
        let dir = TempDir::new().unwrap();
        let missing = s(&dir.path().join("missing.txt"));
        assert_eq!(
            copy_file(&missing, "anywhere").unwrap_err().to_string(),
            format!("Source file not found: {}", missing)
        );

        let folder = s(dir.path());
        assert_eq!(
            move_file(&folder, "anywhere").unwrap_err().to_string(),
            format!("Source is a directory, not a file: {}", folder)
        );
    }

    #[test]
    fn test_move_rename_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("draft.md");
        let dst = dir.path().join("final.md");
        fs::write(&src, "v2").unwrap();
        fs::write(&dst, "v1").unwrap();

        let moved = move_file(&s(&src), &s(&dst)).unwrap();
        assert_eq!(moved.kind, TransferKind::Renamed);
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "v2");
    }

    #[test]
    fn test_move_to_other_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("draft.md");
        let archive = dir.path().join("archive");
        fs::write(&src, "v1").unwrap();
        fs::create_dir(&archive).unwrap();

        let moved = move_file(&s(&src), &s(&archive)).unwrap();
        assert_eq!(moved.kind, TransferKind::Moved);
        assert_eq!(moved.destination, archive.join("draft.md"));
        assert_eq!(moved.size, Some(2));
    }
}
