// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Action plans and their extraction from model output
//!
//! Models asked for "JSON only" still wrap their reply in Markdown fences
//! often enough that a strict parse would fail most of the time. Extraction
//! tries the raw text first, then the first fenced block, then a
//! line-by-line fence scan.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{AgentError, Result};

const FENCE: &str = "```";

/// One tool call proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the tool to call, e.g. `run_shell`
    pub tool: String,
    /// Arguments for the tool
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// A description plus an ordered list of tool calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default = "default_plan_text")]
    pub plan: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_plan_text() -> String {
    "No high-level plan provided.".to_string()
}

impl Action {
    pub fn new(tool: impl Into<String>, args: Map<String, Value>) -> Self {
        Self { tool: tool.into(), args }
    }
}

impl Plan {
    /// Validate an already-parsed JSON value as a plan
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(AgentError::InvalidPlan(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| AgentError::InvalidPlan(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Parse raw model output into a validated plan
pub fn parse_plan(raw: &str) -> Result<Plan> {
    let value = extract_json(raw)
        .ok_or_else(|| AgentError::InvalidPlan("no JSON found in model response".to_string()))?;
    Plan::from_value(value)
}

/// Find a JSON document in model output, tolerating Markdown fences
pub fn extract_json(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }

    if !raw.contains(FENCE) {
        debug!("Model response has no JSON and no code fence");
        return None;
    }

    // First fenced block: skip the opening fence line (and its language tag)
    let start = raw.find(FENCE)?;
    let body_start = start + raw[start..].find('\n')? + 1;
    if let Some(len) = raw[body_start..].find(FENCE) {
        let inner = raw[body_start..body_start + len].trim();
        if let Ok(value) = serde_json::from_str(inner) {
            return Some(value);
        }
    }

    // Fence lines may be indented or carry trailing text
    let mut inner: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for line in raw.lines() {
        if line.trim().starts_with(FENCE) {
            if in_fence {
                break;
            }
            in_fence = true;
            continue;
        }
        if in_fence {
            inner.push(line);
        }
    }

    let joined = inner.join("\n");
    let joined = joined.trim();
    if joined.is_empty() {
        return None;
    }
    serde_json::from_str(joined).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
