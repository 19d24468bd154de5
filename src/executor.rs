// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Confirming and running an action plan
//!
//! Every action is confirmed once as part of the whole plan. `write_file`
//! gets a second, per-file confirmation with a preview. Tool failures are
//! rendered and the run moves on to the next action; only a failing
//! confirmation prompt aborts the run.

use colored::{Color, Colorize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::ollama::ChatModel;
use crate::paths::normalize_path;
use crate::plan::{Action, Plan};
use crate::planner;
use crate::prompts::PromptSet;
use crate::render::{error_panel, panel, render_output, render_plan, rule};
use crate::tools::files::read_resolved;
use crate::tools::{
    FileContent, FileKind, FileSummary, FindResults, FoundItem, ToolArgs, ToolOutput, ToolRegistry, WriteMode,
};
use crate::{AgentError, Result};

/// Lines of existing and new content shown before a write
const PREVIEW_LINES: usize = 40;

/// Yes/no questions put to the user
pub trait Confirm {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompt
pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| AgentError::Prompt(e.to_string()))
    }
}

/// What happened to one action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Completed,
    Skipped(String),
    Blocked,
    Failed(String),
    UnknownTool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    /// The user declined the plan; nothing ran
    pub cancelled: bool,
    /// One entry per action, in plan order
    pub outcomes: Vec<ActionOutcome>,
}

/// True unless the command contains a blocked substring (case-insensitive)
pub fn is_command_safe(command: &str, blocked: &[String]) -> bool {
    let lower = command.to_lowercase();
    !blocked
        .iter()
        .filter(|b| !b.is_empty())
        .any(|b| lower.contains(&b.to_lowercase()))
}

/// Print the plan panel and action table
pub fn show_plan(plan: &Plan, dry_run: bool) {
    println!("{}", render_plan(plan, dry_run));
}

/// The file a `find_item` result should offer to open, if any
///
/// Exactly one file at or above `offer` wins; failing that, a lone file
/// result at or above `single`.
pub fn read_candidate(found: &FindResults, offer: f64, single: f64) -> Option<&FoundItem> {
    let files: Vec<&FoundItem> = found.files().collect();

    let confident: Vec<&FoundItem> = files
        .iter()
        .copied()
        .filter(|f| f.match_score >= offer)
        .collect();
    if confident.len() == 1 {
        return Some(confident[0]);
    }

    match files.as_slice() {
        [only] if only.match_score >= single => Some(*only),
        _ => None,
    }
}

/// Preview shown before `write_file` asks for confirmation
pub fn write_preview(path: &Path, mode: WriteMode, content: &str) -> String {
    let mut body = vec![
        format!("{} {}", "Path:".bold(), path.display()),
        format!("{} {}", "Mode:".bold(), mode),
        String::new(),
    ];

    if path.exists() {
        let existing = fs::read_to_string(path)
            .unwrap_or_else(|_| "<could not read existing file as utf-8>".to_string());
        body.push(format!("{}", "Existing content (first ~40 lines):".bold()));
        body.push(String::new());
        push_head(&mut body, &existing, "<empty file>");
    } else {
        body.push(format!(
            "{}",
            "File does not currently exist. It will be created.".yellow().bold()
        ));
    }

    body.push(String::new());
    body.push(format!("{}", "New content (first ~40 lines):".bold()));
    body.push(String::new());
    push_head(&mut body, content, "<empty content>");

    panel("File Write Preview", &body.join("\n"), Color::Blue)
}

fn push_head(body: &mut Vec<String>, text: &str, empty: &str) {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        body.push(empty.to_string());
        return;
    }
    body.extend(lines.iter().take(PREVIEW_LINES).map(|l| l.to_string()));
    if lines.len() > PREVIEW_LINES {
        body.push(String::new());
        body.push(format!("{}", "[..TRUNCATED..]".dimmed()));
    }
}

/// Runs confirmed plans against the tool registry
pub struct Executor<'a> {
    registry: &'a ToolRegistry,
    model: &'a dyn ChatModel,
    prompts: &'a PromptSet,
    confirm: &'a dyn Confirm,
    config: &'a AppConfig,
}

impl<'a> Executor<'a> {
    pub fn new(
        registry: &'a ToolRegistry,
        model: &'a dyn ChatModel,
        prompts: &'a PromptSet,
        confirm: &'a dyn Confirm,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            registry,
            model,
            prompts,
            confirm,
            config,
        }
    }

    /// Show the plan, ask once, then run every action in order
    pub async fn execute_plan(&self, plan: &Plan) -> Result<ExecutionReport> {
        show_plan(plan, false);
        println!();

        if !self.confirm.confirm("Proceed with these actions?", false)? {
            println!("{}", "Cancelled.".red().bold());
            return Ok(ExecutionReport {
                cancelled: true,
                outcomes: Vec::new(),
            });
        }

        if plan.is_empty() {
            println!("{}", "Nothing to do.".yellow().bold());
            return Ok(ExecutionReport::default());
        }

        let mut report = ExecutionReport::default();
        for (i, action) in plan.actions.iter().enumerate() {
            println!();
            println!("{}", rule(&format!("Action {}: {}", i + 1, action.tool)));

            let outcome = self.execute_action(action).await?;
            debug!("Action {} ({}) -> {:?}", i + 1, action.tool, outcome);
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    async fn execute_action(&self, action: &Action) -> Result<ActionOutcome> {
        let tool = match self.registry.get(&action.tool) {
            Some(tool) => tool,
            None => {
                warn!("Model asked for unknown tool {:?}", action.tool);
                println!("{} '{}', skipping.", "Unknown tool:".yellow(), action.tool);
                return Ok(ActionOutcome::UnknownTool);
            }
        };

        let args = ToolArgs::new(&action.tool, &action.args);

        match action.tool.as_str() {
            "run_shell" => {
                if let Some(command) = args.optional("command") {
                    if !is_command_safe(&command, &self.config.safety.blocked_substrings) {
                        warn!("Blocked shell command {:?}", command);
                        println!("{}", AgentError::BlockedCommand(command).to_string().red().bold());
                        return Ok(ActionOutcome::Blocked);
                    }
                }
            }
            "write_file" => {
                if let Some(path) = args.optional("path") {
                    if !self.confirm_write(&args, &path)? {
                        println!("{}", "Skipped write_file.".yellow().bold());
                        return Ok(ActionOutcome::Skipped("write declined".to_string()));
                    }
                }
            }
            _ => {}
        }

        match tool.run(&args).await {
            Ok(output) => {
                println!("{}", render_output(&output));
                self.after(&output).await?;
                Ok(ActionOutcome::Completed)
            }
            Err(AgentError::MissingArgument { tool, argument }) => {
                let message = format!("Missing '{}' argument for {}. Skipping.", argument, tool);
                warn!("{}", message);
                println!("{}", message.yellow());
                Ok(ActionOutcome::Skipped(message))
            }
            Err(e) => {
                info!("{} failed: {}", action.tool, e);
                println!("{}", error_panel(&e.to_string()));
                Ok(ActionOutcome::Failed(e.to_string()))
            }
        }
    }

    fn confirm_write(&self, args: &ToolArgs<'_>, path: &str) -> Result<bool> {
        let p = normalize_path(path);
        let mode = WriteMode::parse(&args.string_or("mode", "overwrite"));
        let content = args.string("content").unwrap_or_default();

        println!("{}", write_preview(&p, mode, &content));
        self.confirm.confirm(&format!("Write to file {}?", p.display()), false)
    }

    /// Follow-ups that depend on a tool's result
    async fn after(&self, output: &ToolOutput) -> Result<()> {
        match output {
            ToolOutput::Found(found) => self.offer_read(found).map(|_| ()),
            ToolOutput::Summary(summary) => {
                self.summarise(summary).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Offer to open a confidently found file; returns what was read
    fn offer_read(&self, found: &FindResults) -> Result<Option<FileContent>> {
        let t = &self.config.tools;
        let best = match read_candidate(found, t.offer_read_threshold, t.single_match_threshold) {
            Some(best) => best,
            None => return Ok(None),
        };

        println!();
        let default = best.match_score >= t.default_read_threshold;
        if !self.confirm.confirm("Would you like to read this file?", default)? {
            return Ok(None);
        }

        println!();
        println!("{}", rule(&format!("Reading file: {}", best.path.display())));
        match read_resolved(&best.path, t.read_max_bytes) {
            Ok(content) => {
                println!("{}", render_output(&ToolOutput::Content(content.clone())));
                Ok(Some(content))
            }
            Err(e) => {
                println!("{}", error_panel(&e.to_string()));
                Ok(None)
            }
        }
    }

    /// Ask the model for a summary of extracted text and print it
    pub async fn summarise(&self, summary: &FileSummary) -> Option<String> {
        if summary.content_preview.trim().is_empty() {
            return None;
        }

        let what = match summary.file_kind {
            FileKind::Pdf => "PDF document",
            FileKind::Text => "file",
        };
        let prompt = format!(
            "Please provide a concise summary of this {} ({}):\n\n{}",
            what,
            summary.file_path.display(),
            summary.content_preview
        );

        println!();
        println!("{}", "Generating summary...".cyan().bold());
        println!();

        match planner::ask(self.model, self.prompts, &prompt).await {
            Ok(text) => {
                println!("{}", panel("Summary", text.trim(), Color::Cyan));
                Some(text)
            }
            Err(e) => {
                warn!("Summary failed: {}", e);
                println!("{}", error_panel(&e.to_string()));
                None
            }
        }
    }
}
