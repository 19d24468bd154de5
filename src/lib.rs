// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! terminal-agent: natural language to file and shell actions
//!
//! A local Ollama model either answers a question (`ask`) or proposes a JSON
//! action plan (`do`) that is shown, confirmed and run against a fixed set of
//! file and shell tools.

pub mod config;
pub mod error;
pub mod executor;
pub mod fuzzy;
pub mod ollama;
pub mod paths;
pub mod plan;
pub mod planner;
pub mod prompts;
pub mod render;
pub mod tools;

pub use config::AppConfig;
pub use error::{AgentError, Result};
