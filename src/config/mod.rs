// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for the terminal agent

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the Ollama base URL
pub const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";

/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "TERMINAL_AGENT_MODEL";

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// AI engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Prompt file location
    #[serde(default)]
    pub prompts: PromptConfig,

    /// Tool defaults and thresholds
    #[serde(default)]
    pub tools: ToolConfig,

    /// Shell command guardrails
    #[serde(default)]
    pub safety: SafetyConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PromptConfig {
    /// Markdown file with `## CHAT` and `## ACTION` sections
    #[serde(default = "default_prompt_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToolConfig {
    #[serde(default = "default_read_max_bytes")]
    pub read_max_bytes: usize,
    #[serde(default = "default_summarize_max_bytes")]
    pub summarize_max_bytes: usize,
    #[serde(default = "default_max_results")]
    pub find_max_results: usize,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_max_results")]
    pub search_max_results: usize,
    #[serde(default = "default_search_max_file_bytes")]
    pub search_max_file_bytes: u64,
    #[serde(default = "default_context_lines")]
    pub compare_context_lines: usize,
    /// A single file at or above this score is offered for reading
    #[serde(default = "default_offer_read_threshold")]
    pub offer_read_threshold: f64,
    /// A lone file result at or above this score is offered for reading
    #[serde(default = "default_single_match_threshold")]
    pub single_match_threshold: f64,
    /// Scores at or above this make "yes" the default answer
    #[serde(default = "default_default_read_threshold")]
    pub default_read_threshold: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SafetyConfig {
    /// Case-insensitive substrings that block a shell command
    #[serde(default = "default_blocked_substrings")]
    pub blocked_substrings: Vec<String>,
}

// Default value functions
fn default_url() -> String { "http://localhost:11434".to_string() }
fn default_model() -> String { "llama3.2".to_string() }
fn default_timeout() -> u64 { 60 }
fn default_prompt_path() -> PathBuf { PathBuf::from("patterns/welcome_prompt.md") }
fn default_read_max_bytes() -> usize { 5000 }
fn default_summarize_max_bytes() -> usize { 10_000 }
fn default_max_results() -> usize { 20 }
fn default_fuzzy_threshold() -> f64 { 0.6 }
fn default_search_max_file_bytes() -> u64 { 10_000_000 }
fn default_context_lines() -> usize { 3 }
fn default_offer_read_threshold() -> f64 { 0.85 }
fn default_single_match_threshold() -> f64 { 0.7 }
fn default_default_read_threshold() -> f64 { 0.9 }

fn default_blocked_substrings() -> Vec<String> {
    vec!["rm -rf /", "mkfs", ":(){ :|:& };:"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            path: default_prompt_path(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            read_max_bytes: default_read_max_bytes(),
            summarize_max_bytes: default_summarize_max_bytes(),
            find_max_results: default_max_results(),
            fuzzy_threshold: default_fuzzy_threshold(),
            search_max_results: default_max_results(),
            search_max_file_bytes: default_search_max_file_bytes(),
            compare_context_lines: default_context_lines(),
            offer_read_threshold: default_offer_read_threshold(),
            single_match_threshold: default_single_match_threshold(),
            default_read_threshold: default_default_read_threshold(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            blocked_substrings: default_blocked_substrings(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::AgentError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `OLLAMA_BASE_URL` / `TERMINAL_AGENT_MODEL` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_MODEL).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, model: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Engine URL overridden from environment: {}", url);
            self.engine.url = url;
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            tracing::debug!("Model overridden from environment: {}", model);
            self.engine.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.engine.url, "http://localhost:11434");
        assert_eq!(config.engine.model, "llama3.2");
        assert_eq!(config.tools.read_max_bytes, 5000);
        assert_eq!(config.safety.blocked_substrings.len(), 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"engine": {"model": "qwen2.5:3b"}, "tools": {"fuzzy_threshold": 0.75}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.engine.model, "qwen2.5:3b");
        assert_eq!(config.engine.timeout_secs, 60);
        assert_eq!(config.tools.fuzzy_threshold, 0.75);
        assert_eq!(config.tools.find_max_results, 20);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match AppConfig::load(&path) {
            Err(crate::AgentError::Config(msg)) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.safety.blocked_substrings.push("shutdown".to_string());
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert!(loaded.safety.blocked_substrings.contains(&"shutdown".to_string()));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("http://gpu-box:11434".to_string()), Some("  ".to_string()));
        assert_eq!(config.engine.url, "http://gpu-box:11434");
        assert_eq!(config.engine.model, "llama3.2");
    }
}
