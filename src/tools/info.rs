// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File metadata tool

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use super::{FileInfo, Tool, ToolArgs, ToolOutput};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reports size, timestamps and permissions of a path
pub struct GetFileInfoTool;

#[async_trait]
impl Tool for GetFileInfoTool {
    fn name(&self) -> &'static str {
        "get_file_info"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Get detailed information about a file or directory.
  Shows size, creation/modification dates, permissions, and file type.
- args schema:
  {
    "path": "string, path to a file or directory"
  }
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let path = args.require("path")?;
        Ok(ToolOutput::Info(get_file_info(&path)?))
    }
}

pub fn get_file_info(path: &str) -> Result<FileInfo> {
    let p = normalize_path(path);
    let metadata = fs::metadata(&p).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AgentError::tool(format!("Path not found: {}", path)),
        _ => AgentError::FileSystem(e),
    })?;

    let is_directory = metadata.is_dir();
    let name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string());

    Ok(FileInfo {
        kind: describe_kind(&p, is_directory),
        name,
        is_directory,
        size: metadata.len(),
        created: format_time(metadata.created()),
        modified: format_time(metadata.modified()),
        accessed: format_time(metadata.accessed()),
        permissions: permissions(&metadata),
        path: p,
    })
}

/// Human description of what a path holds
pub fn describe_kind(path: &Path, is_directory: bool) -> String {
    if is_directory {
        return "directory".to_string();
    }

    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return "Unknown".to_string(),
    };

    let known = match ext.as_str() {
        "py" => "Python script",
        "js" => "JavaScript file",
        "txt" => "Text file",
        "md" => "Markdown file",
        "json" => "JSON file",
        "pdf" => "PDF document",
        "zip" => "ZIP archive",
        "tar" => "TAR archive",
        "gz" => "GZIP archive",
        _ => return format!("{} file", ext.to_uppercase()),
    };
    known.to_string()
}

fn format_time(time: io::Result<SystemTime>) -> String {
    match time {
        Ok(t) => DateTime::<Local>::from(t).format(TIME_FORMAT).to_string(),
        Err(_) => "unknown".to_string(),
    }
}

#[cfg(unix)]
fn permissions(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permissions(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "444".to_string()
    } else {
        "666".to_string()
    }
}
