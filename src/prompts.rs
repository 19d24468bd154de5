// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! System prompts for chat and action modes

use std::path::Path;
use tracing::{debug, info};

use crate::ollama::ChatMessage;

/// Placeholder in the action prompt replaced by the tool catalogue
pub const TOOLS_PLACEHOLDER: &str = "{{TOOLS}}";

const BUILTIN_PROMPTS: &str = include_str!("../patterns/welcome_prompt.md");

const FALLBACK_CHAT: &str =
    "You are a helpful offline terminal assistant. Answer succinctly and safely.";

const FALLBACK_ACTION: &str = "You are a terminal control agent. Respond ONLY with JSON using \
schema: {\"plan\": string, \"actions\": [{\"tool\": \"...\", \"args\": {...}}]}.\n\
Valid tools:\n{{TOOLS}}\n\
No extra text outside JSON.";

/// How the model should respond
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Free-form answer, nothing is executed
    Chat,
    /// JSON action plan only
    Action,
}

/// The pair of system prompts
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    pub chat: String,
    pub action: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::parse(BUILTIN_PROMPTS)
    }
}

impl PromptSet {
    /// Load prompts from a Markdown file, falling back to the built-in set
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded prompts from {:?}", path);
                Self::parse(&text)
            }
            Err(e) => {
                info!("Prompt file {:?} not readable ({}), using built-in prompts", path, e);
                Self::default()
            }
        }
    }

    /// Split text on `## CHAT` / `## ACTION` headings
    pub fn parse(text: &str) -> Self {
        let mut chat: Option<String> = None;
        let mut action: Option<String> = None;
        let mut current: Option<Mode> = None;
        let mut buffer = String::new();

        let mut flush = |section: Option<Mode>, buffer: &mut String| {
            match section {
                Some(Mode::Chat) => chat = Some(buffer.trim().to_string()),
                Some(Mode::Action) => action = Some(buffer.trim().to_string()),
                None => {}
            }
            buffer.clear();
        };

        for line in text.split_inclusive('\n') {
            let stripped = line.trim();
            if let Some(heading) = stripped.strip_prefix("## ") {
                let section = match heading.trim().to_uppercase().as_str() {
                    "CHAT" => Some(Mode::Chat),
                    "ACTION" => Some(Mode::Action),
                    _ => None,
                };
                if section.is_some() {
                    flush(current, &mut buffer);
                    current = section;
                    continue;
                }
            }
            if current.is_some() {
                buffer.push_str(line);
            }
        }
        flush(current, &mut buffer);

        Self {
            chat: chat.unwrap_or_else(|| FALLBACK_CHAT.to_string()),
            action: action.unwrap_or_else(|| FALLBACK_ACTION.to_string()),
        }
    }

    /// System prompt for the given mode
    pub fn system_prompt(&self, mode: Mode, tools: Option<&str>) -> String {
        match mode {
            Mode::Chat => self.chat.clone(),
            Mode::Action => self.action.replace(TOOLS_PLACEHOLDER, tools.unwrap_or("")),
        }
    }

    /// Build the `[system, user]` conversation for one request
    pub fn messages(&self, mode: Mode, query: &str, tools: Option<&str>) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt(mode, tools)),
            ChatMessage::user(query),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let text = "intro ignored\n## CHAT\nBe nice.\n\n## ACTION\nTools:\n{{TOOLS}}\n";
        let prompts = PromptSet::parse(text);
        assert_eq!(prompts.chat, "Be nice.");
        assert_eq!(prompts.action, "Tools:\n{{TOOLS}}");
    }

    #[test]
    fn test_headings_are_case_insensitive_and_other_headings_are_content() {
        let text = "##   chat\nhello\n## Notes\nstill chat\n## Action\njson only";
        let prompts = PromptSet::parse(text);
        assert_eq!(prompts.chat, "hello\n## Notes\nstill chat");
        assert_eq!(prompts.action, "json only");
    }

    #[test]
    fn test_missing_section_falls_back() {
        let prompts = PromptSet::parse("## CHAT\nonly chat here");
        assert_eq!(prompts.chat, "only chat here");
        assert!(prompts.action.contains(TOOLS_PLACEHOLDER));
        assert!(prompts.action.contains("Respond ONLY with JSON"));
    }

    #[test]
    fn test_builtin_prompts_have_both_sections() {
        let prompts = PromptSet::default();
        assert!(prompts.chat.contains("terminal assistant"));
        assert!(prompts.action.contains(TOOLS_PLACEHOLDER));
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let prompts = PromptSet::load(Path::new("/definitely/not/here/prompt.md"));
        assert_eq!(prompts, PromptSet::default());
    }

    #[test]
    fn test_action_messages_substitute_tools() {
        let prompts = PromptSet::parse("## CHAT\nchat\n## ACTION\nuse: {{TOOLS}}.");
        let messages = prompts.messages(Mode::Action, "list files", Some("1. run_shell"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "use: 1. run_shell.");
        assert_eq!(messages[1].content, "list files");

        let bare = prompts.system_prompt(Mode::Action, None);
        assert_eq!(bare, "use: .");
        assert_eq!(prompts.system_prompt(Mode::Chat, Some("ignored")), "chat");
    }
}
