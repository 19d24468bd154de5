// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Locate a file by name and extract its text for summarisation

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::files::read_head;
use super::find::{default_roots, find_in_roots};
use super::{FileKind, FileSummary, Tool, ToolArgs, ToolOutput};
use crate::{AgentError, Result};

/// How many fuzzy matches are considered before picking the best file
const CANDIDATES: usize = 5;

/// Extensions read as plain text
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "py", "js", "jsx", "ts", "tsx", "json", "xml", "html", "css", "scss",
    "yaml", "yml", "toml", "ini", "cfg", "conf", "sh", "bash", "zsh", "fish", "java",
    "c", "cpp", "h", "hpp", "rs", "go", "rb", "php", "swift", "kt", "r", "sql", "log",
    "csv", "rst", "tex",
];

/// Finds a file and returns its leading text
pub struct SummarizeFileTool {
    max_bytes: usize,
    threshold: f64,
}

impl SummarizeFileTool {
    pub fn new(max_bytes: usize, threshold: f64) -> Self {
        Self { max_bytes, threshold }
    }
}

#[async_trait]
impl Tool for SummarizeFileTool {
    fn name(&self) -> &'static str {
        "summarize_file"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Find a file by name and generate a concise summary of its contents.
  This is a SINGLE TOOL that both finds AND reads the file - do NOT use find_item first.
  Works with text files (txt, md, py, js, etc.), code files, and PDF documents.
  Use it whenever the user asks to "summarize", "explain", "overview",
  "what does X contain", or "tell me about" a file.
- args schema:
  {
    "name": "string, filename or fragment to search for (e.g. 'readme', 'config.py', 'presentation rubric')",
    "max_bytes": "optional integer, maximum bytes to read from file (default 10000)"
  }
- notes:
  - Use it ALONE, not together with find_item.
  - Matching is fuzzy; if several files match, the best match is used.
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let name = args.require("name")?;
        let max_bytes = args.usize_or("max_bytes", self.max_bytes);
        let summary = summarize_in_roots(&name, &default_roots(), max_bytes, self.threshold)?;
        Ok(ToolOutput::Summary(summary))
    }
}

/// Find the best file matching `name` below `roots` and extract its text
pub fn summarize_in_roots(
    name: &str,
    roots: &[PathBuf],
    max_bytes: usize,
    threshold: f64,
) -> Result<FileSummary> {
    let found = find_in_roots(name, roots, CANDIDATES, threshold)?;

    if found.results.is_empty() {
        return Err(AgentError::tool(format!(
            "No files found matching '{}'. Try a different search term.",
            name
        )));
    }

    let files: Vec<_> = found.files().collect();
    let best = match files.first() {
        Some(best) => *best,
        None => {
            return Err(AgentError::tool(format!(
                "Found {} match(es), but all were directories. Need a file to summarize.",
                found.results.len()
            )))
        }
    };

    info!("Summarising {:?} (score {:.2})", best.path, best.match_score);

    let extracted = extract(&best.path, max_bytes)?;
    let file_size = std::fs::metadata(&best.path)?.len();

    Ok(FileSummary {
        query: name.to_string(),
        file_path: best.path.clone(),
        file_size,
        match_score: best.match_score,
        content_preview: extracted.text,
        truncated: extracted.truncated,
        match_count: files.len(),
        file_kind: extracted.kind,
        page_count: extracted.page_count,
    })
}

struct Extracted {
    text: String,
    truncated: bool,
    kind: FileKind,
    page_count: Option<usize>,
}

fn extract(path: &Path, max_bytes: usize) -> Result<Extracted> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("pdf") => extract_pdf(path, max_bytes),
        Some(ext) if !TEXT_EXTENSIONS.contains(&ext) => Err(AgentError::tool(format!(
            "File type '.{}' may not be a text file. File: {}",
            ext,
            path.display()
        ))),
        _ => {
            let (text, truncated) = read_head(File::open(path)?, max_bytes)?;
            Ok(Extracted {
                text,
                truncated,
                kind: FileKind::Text,
                page_count: None,
            })
        }
    }
}

fn extract_pdf(path: &Path, max_chars: usize) -> Result<Extracted> {
    let bytes = std::fs::read(path)?;

    let page_count = lopdf::Document::load_mem(&bytes)
        .map(|doc| doc.get_pages().len())
        .ok();

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| AgentError::Pdf(format!("Text extraction failed: {}", e)))?;

    if text.trim().is_empty() {
        return Err(AgentError::Pdf(
            "Could not extract text from PDF. It may be image-based or encrypted.".to_string(),
        ));
    }

    debug!("Extracted {} chars from {:?}", text.len(), path);

    let (text, truncated) = truncate_chars(text, max_chars);
    Ok(Extracted {
        text,
        truncated,
        kind: FileKind::Pdf,
        page_count,
    })
}

/// Keep at most `max_chars` characters
fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (text[..idx].to_string(), true),
        None => (text, false),
    }
}
