// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Local file and shell tools the model can call

pub mod archive;
pub mod args;
pub mod compare;
pub mod files;
pub mod find;
pub mod info;
pub mod listing;
pub mod output;
pub mod search;
pub mod shell;
pub mod summarize;
pub mod transfer;

use async_trait::async_trait;
use crate::{AppConfig, Result};

pub use args::ToolArgs;
pub use output::*;

/// Trait for tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool
    fn name(&self) -> &'static str;

    /// Description and argument schema shown to the model
    fn description(&self) -> &'static str;

    /// Run the tool with the model's arguments
    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput>;
}

/// Registry of all tools, in catalogue order
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with every built-in tool
    pub fn new(config: &AppConfig) -> Self {
        let t = &config.tools;
        let mut registry = Self::empty();

        registry.register(Box::new(shell::RunShellTool));
        registry.register(Box::new(files::ReadFileTool::new(t.read_max_bytes)));
        registry.register(Box::new(files::WriteFileTool));
        registry.register(Box::new(find::FindItemTool::new(t.find_max_results, t.fuzzy_threshold)));
        registry.register(Box::new(summarize::SummarizeFileTool::new(t.summarize_max_bytes, t.fuzzy_threshold)));
        registry.register(Box::new(listing::ListDirectoryTool));
        registry.register(Box::new(search::SearchContentTool::new(t.search_max_results, t.search_max_file_bytes)));
        registry.register(Box::new(info::GetFileInfoTool));
        registry.register(Box::new(transfer::CopyFileTool));
        registry.register(Box::new(transfer::MoveFileTool));
        registry.register(Box::new(compare::CompareFilesTool::new(t.compare_context_lines)));
        registry.register(Box::new(archive::ExtractArchiveTool));

        registry
    }

    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a new tool; a tool with the same name is replaced
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Find a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Numbered tool descriptions for the action prompt
    pub fn catalogue(&self) -> String {
        self.tools
            .iter()
            .enumerate()
            .map(|(i, tool)| {
                let body = tool
                    .description()
                    .trim()
                    .lines()
                    .map(|line| format!("   {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}. \"{}\"\n{}", i + 1, tool.name(), body)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
