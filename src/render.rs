// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Console rendering: panels, rules, tables and tool results
//!
//! Everything here returns a `String` so callers decide where it goes and
//! tests can inspect it.

use colored::{Color, Colorize};
use serde_json::Value;

use crate::plan::Plan;
use crate::tools::{
    Comparison, ContentSearch, DirectoryListing, Extraction, FileContent, FileInfo, FileKind,
    FileSummary, FileWrite, FindResults, ShellResult, ToolOutput, Transfer,
};

/// Characters of a summarised file shown before the model's summary
pub const PREVIEW_CHARS: usize = 800;

/// Characters of a matching line shown in search results
pub const SEARCH_LINE_CHARS: usize = 100;

/// Archive entries listed after extraction
pub const LISTED_ENTRIES: usize = 20;

const RULE_WIDTH: usize = 72;
const CELL_WIDTH: usize = SEARCH_LINE_CHARS;
const TRUNCATED: &str = "[..TRUNCATED..]";

/// Bordered box with a title
pub fn panel(title: &str, body: &str, color: Color) -> String {
    let lines: Vec<&str> = if body.is_empty() { vec![""] } else { body.lines().collect() };
    let width = lines
        .iter()
        .map(|l| visible_width(l))
        .chain(std::iter::once(visible_width(title) + 2))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let top_fill = width.saturating_sub(visible_width(title) + 1);
    out.push_str(&format!(
        "{} {} {}\n",
        "╭─".color(color),
        title.bold(),
        format!("{}╮", "─".repeat(top_fill)).color(color)
    ));
    for line in lines {
        let pad = width - visible_width(line);
        out.push_str(&format!(
            "{} {}{} {}\n",
            "│".color(color),
            line,
            " ".repeat(pad),
            "│".color(color)
        ));
    }
    out.push_str(&format!("{}", format!("╰{}╯", "─".repeat(width + 2)).color(color)));
    out
}

/// Horizontal rule with a centred title
pub fn rule(title: &str) -> String {
    let text = format!(" {} ", title);
    let fill = RULE_WIDTH.saturating_sub(visible_width(&text));
    let left = fill / 2;
    format!(
        "{}{}{}",
        "─".repeat(left).dimmed(),
        text.bold(),
        "─".repeat(fill - left).dimmed()
    )
}

/// Red "Error" panel
pub fn error_panel(message: &str) -> String {
    panel("Error", message, Color::Red)
}

/// Table cell with an optional colour
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub fn styled(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, color: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// Column table; cells longer than the cap are shortened
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let rows: Vec<Vec<Cell>> = self
            .rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|c| Cell {
                        text: clip(&c.text.replace('\n', " "), CELL_WIDTH),
                        color: c.color,
                    })
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_width(h)).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                let w = visible_width(&cell.text);
                match widths.get_mut(i) {
                    Some(slot) => *slot = (*slot).max(w),
                    None => widths.push(w),
                }
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        let header = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| pad(h, widths[i]).magenta().bold().to_string())
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(header.trim_end().to_string());

        for row in rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let padded = pad(&cell.text, widths[i]);
                    match cell.color {
                        Some(color) => padded.color(color).to_string(),
                        None => padded,
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

/// Plan description and action table
pub fn render_plan(plan: &Plan, dry_run: bool) -> String {
    let text = if plan.plan.trim().is_empty() {
        "No plan description."
    } else {
        plan.plan.as_str()
    };
    let mut out = panel("Plan", text, Color::Cyan);

    if plan.actions.is_empty() {
        out.push('\n');
        out.push_str(&"No actions proposed.".yellow().bold().to_string());
        return out;
    }

    let mut table = Table::new(&["#", "Tool", "Args"]);
    for (i, action) in plan.actions.iter().enumerate() {
        table.row(vec![
            Cell::styled((i + 1).to_string(), Color::BrightBlack),
            action.tool.clone().into(),
            Value::Object(action.args.clone()).to_string().into(),
        ]);
    }
    out.push('\n');
    out.push_str(&panel("Actions", &table.render(), Color::Green));

    if dry_run {
        out.push('\n');
        out.push_str(&format!("{} No actions will be executed.", "(DRY RUN)".yellow().bold()));
    }
    out
}

/// Render any tool result
pub fn render_output(output: &ToolOutput) -> String {
    match output {
        ToolOutput::Shell(r) => render_shell(r),
        ToolOutput::Content(r) => render_content(r),
        ToolOutput::Written(r) => render_write(r),
        ToolOutput::Found(r) => render_found(r),
        ToolOutput::Summary(r) => render_summary(r),
        ToolOutput::Listing(r) => render_listing(r),
        ToolOutput::Search(r) => render_search(r),
        ToolOutput::Info(r) => render_info(r),
        ToolOutput::Transfer(r) => render_transfer(r),
        ToolOutput::Comparison(r) => render_comparison(r),
        ToolOutput::Extraction(r) => render_extraction(r),
    }
}

fn render_shell(r: &ShellResult) -> String {
    let code = r
        .returncode
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none (terminated by signal)".to_string());
    let mut out = panel("Command Result", &format!("returncode={}", code), Color::Green);

    if !r.stdout.is_empty() {
        out.push('\n');
        out.push_str(&panel("stdout", r.stdout.trim_end(), Color::Cyan));
    }
    if !r.stderr.is_empty() {
        out.push('\n');
        out.push_str(&panel("stderr", r.stderr.trim_end(), Color::Yellow));
    }
    out
}

fn render_content(r: &FileContent) -> String {
    let mut body = r.content.clone();
    if r.truncated {
        body.push_str(&format!("\n\n{}", TRUNCATED.dimmed()));
    }
    panel(&r.path.display().to_string(), &body, Color::Blue)
}

fn render_write(r: &FileWrite) -> String {
    let body = [
        label("Path", r.path.display()),
        label("Mode", r.mode),
        label("Existed before", r.existed_before),
        label("Size before", format!("{} bytes", r.bytes_before)),
        label("Size after", format!("{} bytes", r.bytes_after)),
    ]
    .join("\n");
    panel("File Written", &body, Color::Green)
}

fn render_found(r: &FindResults) -> String {
    let threshold = percent(r.fuzzy_threshold);

    if r.results.is_empty() {
        return panel(
            "Search Results",
            &format!("No items found matching: {} (threshold: {})", r.query.bold(), threshold),
            Color::Yellow,
        );
    }

    let mut table = Table::new(&["#", "Match", "Type", "Path", "Size"]);
    for (i, item) in r.results.iter().enumerate() {
        let color = if item.match_score >= 0.9 {
            Color::BrightGreen
        } else if item.match_score >= 0.7 {
            Color::Yellow
        } else {
            Color::BrightBlack
        };
        table.row(vec![
            Cell::styled((i + 1).to_string(), Color::BrightBlack),
            Cell::styled(percent(item.match_score), color),
            Cell::from(if item.is_dir { "DIR" } else { "FILE" }),
            item.path.display().to_string().into(),
            item.size
                .map(|s| format!("{} bytes", group_thousands(s)))
                .unwrap_or_else(|| "-".to_string())
                .into(),
        ]);
    }

    let title = format!(
        "Search Results - Found {} item(s) matching: {} (min match: {})",
        r.results.len(),
        r.query,
        threshold
    );
    panel(&title, &table.render(), Color::Green)
}

fn render_summary(r: &FileSummary) -> String {
    let mut info = vec![
        label("File", r.file_path.display()),
        label("Size", format!("{} bytes", group_thousands(r.file_size))),
        label("Match Score", percent(r.match_score)),
    ];
    if r.file_kind == FileKind::Pdf {
        if let Some(pages) = r.page_count {
            info.push(label("Pages", pages));
        }
    }
    if r.match_count > 1 {
        info.push(format!(
            "{} {} files matched, showing best match",
            "Note:".yellow().bold(),
            r.match_count
        ));
    }
    if r.truncated {
        info.push(format!("{} Showing first portion (truncated)", "Content:".yellow().bold()));
    } else {
        info.push(label("Content", "Complete file"));
    }

    let mut preview: String = r.content_preview.chars().take(PREVIEW_CHARS).collect();
    if r.content_preview.chars().count() > PREVIEW_CHARS {
        preview.push_str(&format!("\n\n{}", "...[content truncated for display]".dimmed()));
    }

    format!(
        "{}\n{}",
        panel("File Summary", &info.join("\n"), Color::Cyan),
        panel("Content Preview", &preview, Color::Blue)
    )
}

fn render_listing(r: &DirectoryListing) -> String {
    let dir = r.path.display().to_string();
    if r.items.is_empty() {
        return panel(
            "Directory Listing",
            &format!("Directory is empty: {}", dir.bold()),
            Color::Yellow,
        );
    }

    let mut table = Table::new(&["Type", "Name", "Size", "Modified"]);
    for item in &r.items {
        table.row(vec![
            Cell::from(if item.is_dir { "DIR" } else { "FILE" }),
            item.name.clone().into(),
            item.size
                .map(group_thousands)
                .unwrap_or_else(|| "-".to_string())
                .into(),
            item.modified
                .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string())
                .into(),
        ]);
    }

    panel(
        &format!("Directory: {} ({} items)", dir, r.items.len()),
        &table.render(),
        Color::Green,
    )
}

fn render_search(r: &ContentSearch) -> String {
    if r.results.is_empty() {
        return panel(
            "Content Search",
            &format!("No matches found for: {}", r.query.bold()),
            Color::Yellow,
        );
    }

    let mut table = Table::new(&["#", "File", "Line", "Content"]);
    for (i, m) in r.results.iter().enumerate() {
        table.row(vec![
            Cell::styled((i + 1).to_string(), Color::BrightBlack),
            m.file.clone().into(),
            m.line_number.to_string().into(),
            m.line_content.chars().take(SEARCH_LINE_CHARS).collect::<String>().into(),
        ]);
    }

    let mut title = format!("Search: '{}' - {} matches", r.query, r.results.len());
    if r.truncated {
        title.push_str(" (truncated)");
    }
    panel(&title, &table.render(), Color::Green)
}

fn render_info(r: &FileInfo) -> String {
    let body = [
        label("Path", r.path.display()),
        label("Type", &r.kind),
        label("Size", format!("{} bytes", group_thousands(r.size))),
        label("Created", &r.created),
        label("Modified", &r.modified),
        label("Accessed", &r.accessed),
        label("Permissions", &r.permissions),
    ]
    .join("\n");
    panel("File Information", &body, Color::Cyan)
}

fn render_transfer(r: &Transfer) -> String {
    let mut lines = vec![
        label("Source", r.source.display()),
        label("Destination", r.destination.display()),
    ];
    if let Some(size) = r.size {
        lines.push(label("Size", format!("{} bytes", group_thousands(size))));
    }
    panel(&format!("File {}", r.kind), &lines.join("\n"), Color::Green)
}

fn render_comparison(r: &Comparison) -> String {
    let (f1, f2) = (r.file1.display().to_string(), r.file2.display().to_string());
    if r.identical {
        return panel(
            "File Comparison",
            &format!("Files are identical:\n{}\n{}", f1.bold(), f2.bold()),
            Color::Green,
        );
    }

    let body = r
        .diff
        .lines()
        .map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    panel(
        &format!("Comparing: {} <-> {} ({} changed lines)", f1, f2, r.changes),
        &body,
        Color::Cyan,
    )
}

fn render_extraction(r: &Extraction) -> String {
    let mut lines = vec![
        label("Archive", r.archive.display()),
        label("Destination", r.destination.display()),
        label("Files extracted", r.total_files),
        String::new(),
    ];
    for name in r.extracted_files.iter().take(LISTED_ENTRIES) {
        lines.push(format!("  • {}", name));
    }
    if r.total_files > LISTED_ENTRIES {
        lines.push(format!("  ... and {} more files", r.total_files - LISTED_ENTRIES));
    }
    panel("Archive Extracted", &lines.join("\n"), Color::Green)
}

fn label(name: &str, value: impl std::fmt::Display) -> String {
    format!("{} {}", format!("{}:", name).bold(), value)
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let w = visible_width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(w)))
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Display width in characters, ignoring ANSI colour sequences
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // CSI sequence: ESC [ ... final byte in @..~
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) && c != '[' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
