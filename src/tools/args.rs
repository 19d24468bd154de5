// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Lenient access to model-provided tool arguments
//!
//! Models are sloppy with JSON types: numbers arrive as strings, booleans as
//! `"true"`. Accessors coerce where the intent is obvious and fall back to
//! the default otherwise.

use serde_json::{Map, Value};

use crate::{AgentError, Result};

/// Arguments of one action, tagged with the tool they belong to
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    tool: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> ToolArgs<'a> {
    pub fn new(tool: &'a str, map: &'a Map<String, Value>) -> Self {
        Self { tool, map }
    }

    pub fn tool(&self) -> &str {
        self.tool
    }

    /// String form of any scalar value; `None` for missing or null
    pub fn string(&self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Like [`string`](Self::string) but blank values count as missing
    pub fn optional(&self, key: &str) -> Option<String> {
        self.string(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// A non-blank, trimmed value or [`AgentError::MissingArgument`]
    pub fn require(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| AgentError::missing(self.tool, key))
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    pub fn usize_or(&self, key: &str, default: usize) -> usize {
        match self.map.get(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|v| v as usize)
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as usize))
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.map.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }
}
