//! Completion Adapter
//!
//! Seam between the session orchestrator and the language-model provider.
//! [`assemble_prompt`] is a pure function from conversation state to an
//! ordered sequence of role-tagged prompt messages; [`CompletionProvider`] is
//! the contract a concrete provider implements, enabling tests to substitute
//! a stub for the real model.

use crate::memory::{Message, MessageRole};
use async_trait::async_trait;
use std::fmt;

pub mod openai;

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Errors that can occur during a completion call
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Fixed system instruction prepended to every prompt
pub const SYSTEM_PROMPT: &str = "\
You are PodBot, an enthusiastic podcast expert and recommendation engine.
You ONLY discuss podcasts - shows, hosts, episodes, formats, platforms, and the
podcasting industry.

You have extensive knowledge of podcasts across all genres and formats,
from popular mainstream shows to niche indie productions. You're also
well-versed in podcast platforms, apps, and the broader podcasting industry.

Always stay on topic - if someone asks about anything other than podcasts,
politely redirect them back to podcast discussions. Remember their preferences
and past recommendations across our conversations.

Be enthusiastic, knowledgeable, and ready to make personalized recommendations
based on what they've enjoyed before.";

/// Role of a prompt message in the provider's native vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    /// Instruction to the model
    System,

    /// Human turn
    User,

    /// Model turn
    Assistant,
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::System => write!(f, "system"),
            PromptRole::User => write!(f, "user"),
            PromptRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A role-tagged line of prompt text, independent of any provider's types
#[derive(Debug, Clone, PartialEq)]
pub struct PromptMessage {
    /// Role the content is attributed to
    pub role: PromptRole,

    /// Prompt text
    pub content: String,
}

impl PromptMessage {
    /// Create a system prompt line
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// Create a user prompt line
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant prompt line
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// Build the ordered prompt for one conversational turn.
///
/// Order: the fixed system instruction, a context-summary system line iff
/// `context` is non-empty, the prior history with roles and order preserved,
/// then the new user turn last.
pub fn assemble_prompt(
    context: &str,
    history: &[Message],
    new_message: &Message,
) -> Vec<PromptMessage> {
    let mut prompt = Vec::with_capacity(history.len() + 3);

    prompt.push(PromptMessage::system(SYSTEM_PROMPT));

    if !context.is_empty() {
        prompt.push(PromptMessage::system(format!(
            "Previous conversation context: {}",
            context
        )));
    }

    for msg in history {
        let role = match msg.role {
            MessageRole::User => PromptRole::User,
            MessageRole::Assistant => PromptRole::Assistant,
        };
        prompt.push(PromptMessage {
            role,
            content: msg.content.clone(),
        });
    }

    prompt.push(PromptMessage::user(new_message.content.clone()));

    prompt
}

/// Completion provider contract the orchestrator depends on
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Name of the provider (e.g. "openai"), used for logging
    fn name(&self) -> &str;

    /// Produce exactly one assistant reply for the assembled prompt
    async fn complete(&self, prompt: &[PromptMessage]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_role_display() {
        assert_eq!(PromptRole::System.to_string(), "system");
        assert_eq!(PromptRole::User.to_string(), "user");
        assert_eq!(PromptRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_assemble_prompt_empty_session() {
        let new_message = Message::user("any podcasts about space?");
        let prompt = assemble_prompt("", &[], &new_message);

        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, PromptRole::System);
        assert_eq!(prompt[0].content, SYSTEM_PROMPT);
        assert_eq!(prompt[1].role, PromptRole::User);
        assert_eq!(prompt[1].content, "any podcasts about space?");
    }

    #[test]
    fn test_assemble_prompt_includes_context_line() {
        let new_message = Message::user("more like that?");
        let prompt = assemble_prompt("likes true crime", &[], &new_message);

        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[1].role, PromptRole::System);
        assert_eq!(
            prompt[1].content,
            "Previous conversation context: likes true crime"
        );
    }

    #[test]
    fn test_assemble_prompt_preserves_history_order_and_roles() {
        let history = vec![
            Message::user("recommend a history podcast"),
            Message::assistant("Try Hardcore History!"),
        ];
        let new_message = Message::user("something shorter?");
        let prompt = assemble_prompt("", &history, &new_message);

        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[1].role, PromptRole::User);
        assert_eq!(prompt[1].content, "recommend a history podcast");
        assert_eq!(prompt[2].role, PromptRole::Assistant);
        assert_eq!(prompt[2].content, "Try Hardcore History!");
        assert_eq!(prompt[3].role, PromptRole::User);
        assert_eq!(prompt[3].content, "something shorter?");
    }

    #[test]
    fn test_assemble_prompt_new_turn_always_last() {
        let history = vec![Message::user("hi"), Message::assistant("hello")];
        let new_message = Message::user("bye");
        let prompt = assemble_prompt("summary", &history, &new_message);

        let last = prompt.last().expect("prompt is never empty");
        assert_eq!(last.role, PromptRole::User);
        assert_eq!(last.content, "bye");
    }
}
