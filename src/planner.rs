// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Turning a user request into an action plan

use tracing::{debug, warn};

use crate::ollama::ChatModel;
use crate::plan::{parse_plan, Plan};
use crate::prompts::{Mode, PromptSet};
use crate::{AgentError, Result};

/// Ask the model a question in chat mode
pub async fn ask(model: &dyn ChatModel, prompts: &PromptSet, query: &str) -> Result<String> {
    let messages = prompts.messages(Mode::Chat, query, None);
    model.chat(&messages).await
}

/// Ask the model for a JSON action plan and validate it
///
/// Model transport errors propagate unchanged; anything wrong with the reply
/// itself is reported as [`AgentError::InvalidPlan`].
pub async fn get_action_plan(
    model: &dyn ChatModel,
    prompts: &PromptSet,
    query: &str,
    tools: &str,
) -> Result<Plan> {
    let messages = prompts.messages(Mode::Action, query, Some(tools));
    let raw = model.chat(&messages).await?;
    debug!("Raw plan response: {}", raw);

    parse_plan(&raw).map_err(|e| {
        warn!("Rejected model plan: {}", e);
        match e {
            AgentError::InvalidPlan(_) => e,
            other => AgentError::InvalidPlan(other.to_string()),
        }
    })
}
