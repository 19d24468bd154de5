// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Typed results returned by tools

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// Result of a successful tool run
#[derive(Debug, Clone)]
pub enum ToolOutput {
    Shell(ShellResult),
    Content(FileContent),
    Written(FileWrite),
    Found(FindResults),
    Summary(FileSummary),
    Listing(DirectoryListing),
    Search(ContentSearch),
    Info(FileInfo),
    Transfer(Transfer),
    Comparison(Comparison),
    Extraction(Extraction),
}

#[derive(Debug, Clone)]
pub struct ShellResult {
    pub command: String,
    /// `None` when the process was terminated by a signal
    pub returncode: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
pub struct FileContent {
    pub path: PathBuf,
    pub content: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

impl WriteMode {
    /// Anything other than `append` overwrites
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("append") {
            WriteMode::Append
        } else {
            WriteMode::Overwrite
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Overwrite => write!(f, "overwrite"),
            WriteMode::Append => write!(f, "append"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileWrite {
    pub path: PathBuf,
    pub mode: WriteMode,
    pub existed_before: bool,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

#[derive(Debug, Clone)]
pub struct FoundItem {
    pub path: PathBuf,
    pub root: PathBuf,
    pub is_dir: bool,
    pub size: Option<u64>,
    /// 0.0 - 1.0, how well the name matched
    pub match_score: f64,
}

#[derive(Debug, Clone)]
pub struct FindResults {
    pub query: String,
    pub roots: Vec<PathBuf>,
    /// Best matches first
    pub results: Vec<FoundItem>,
    pub fuzzy_threshold: f64,
}

impl FindResults {
    /// Matches that are files rather than directories
    pub fn files(&self) -> impl Iterator<Item = &FoundItem> {
        self.results.iter().filter(|r| !r.is_dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Pdf,
}

#[derive(Debug, Clone)]
pub struct FileSummary {
    pub query: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub match_score: f64,
    pub content_preview: String,
    pub truncated: bool,
    /// Number of matching files; the best one is summarised
    pub match_count: usize,
    pub file_kind: FileKind,
    pub page_count: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<DateTime<Local>>,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub path: PathBuf,
    pub items: Vec<DirEntryInfo>,
}

#[derive(Debug, Clone)]
pub struct ContentMatch {
    /// Relative to the searched directory
    pub file: String,
    /// 1-based
    pub line_number: usize,
    pub line_content: String,
}

#[derive(Debug, Clone)]
pub struct ContentSearch {
    pub query: String,
    pub search_path: PathBuf,
    pub results: Vec<ContentMatch>,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub kind: String,
    pub is_directory: bool,
    pub size: u64,
    pub created: String,
    pub modified: String,
    pub accessed: String,
    pub permissions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Copied,
    Moved,
    Renamed,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Copied => write!(f, "Copied"),
            TransferKind::Moved => write!(f, "Moved"),
            TransferKind::Renamed => write!(f, "Renamed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transfer {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size: Option<u64>,
    pub kind: TransferKind,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub file1: PathBuf,
    pub file2: PathBuf,
    pub identical: bool,
    /// Unified diff, empty when identical
    pub diff: String,
    /// Inserted plus deleted lines
    pub changes: usize,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub archive: PathBuf,
    pub destination: PathBuf,
    /// First entries only, see `total_files`
    pub extracted_files: Vec<String>,
    pub total_files: usize,
}
