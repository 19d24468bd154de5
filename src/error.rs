// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for the terminal agent

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Ollama not available: {0}")]
    OllamaUnavailable(String),

    #[error("Invalid action plan: {0}")]
    InvalidPlan(String),

    #[error("Missing '{argument}' argument for {tool}")]
    MissingArgument { tool: String, argument: String },

    #[error("{0}")]
    Tool(String),

    #[error("Blocked dangerous command: {0:?}")]
    BlockedCommand(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl AgentError {
    /// Shorthand for a tool-level failure message
    pub fn tool(message: impl Into<String>) -> Self {
        AgentError::Tool(message.into())
    }

    pub fn missing(tool: &str, argument: &str) -> Self {
        AgentError::MissingArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
        }
    }
}
