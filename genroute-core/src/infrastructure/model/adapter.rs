//! Message adapters - convert the role-tagged conversation into each
//! backend's prompt or payload shape. Order is always preserved.

use crate::domain::{ChatMessage, MessageRole};
use serde_json::{Value, json};

/// Role marker used in flattened prompts
fn marker(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "User",
        MessageRole::Assistant => "Assistant",
    }
}

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }

    /// Flatten into a single prompt with role markers, ending with an
    /// assistant cue:
    ///
    /// ```text
    /// System: ...
    ///
    /// User: ...
    ///
    /// Assistant:
    /// ```
    pub fn to_role_marked_prompt(messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();
        for message in messages {
            prompt.push_str(marker(message.role));
            prompt.push_str(": ");
            prompt.push_str(&message.content);
            prompt.push_str("\n\n");
        }
        prompt.push_str(marker(MessageRole::Assistant));
        prompt.push(':');
        prompt
    }

    /// Instruction-tuned marker format (`<s>[INST] ... [/INST] ...</s>`).
    /// System text is folded into the next user turn.
    pub fn to_instruction_prompt(messages: &[ChatMessage]) -> String {
        let mut prompt = String::from("<s>");
        let mut pending_system: Vec<&str> = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => pending_system.push(&message.content),
                MessageRole::User => {
                    let mut turn = pending_system.join("\n\n");
                    pending_system.clear();
                    if !turn.is_empty() {
                        turn.push_str("\n\n");
                    }
                    turn.push_str(&message.content);
                    prompt.push_str(&format!("[INST] {turn} [/INST]"));
                }
                MessageRole::Assistant => {
                    prompt.push_str(&format!(" {}</s>", message.content));
                }
            }
        }

        if !pending_system.is_empty() {
            prompt.push_str(&format!("[INST] {} [/INST]", pending_system.join("\n\n")));
        }
        prompt
    }

    /// Convert messages to Gemini format
    /// Returns: (system_instruction_text, contents)
    pub fn to_gemini_format(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content.clone()),
                MessageRole::User => contents.push(json!({
                    "role": "user",
                    "parts": [{"text": message.content.clone()}]
                })),
                MessageRole::Assistant => contents.push(json!({
                    "role": "model",
                    "parts": [{"text": message.content.clone()}]
                })),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system_instruction, contents)
    }
}
