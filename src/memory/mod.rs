//! Working-Memory Store Client
//!
//! Typed HTTP client for the remote Agent Memory Server (AMS). The store
//! holds one working memory per (session id, namespace) pair: a free-form
//! context summary plus an ordered message history. This client owns no
//! session state; every operation is a single request/response exchange.
//!
//! Sessions are created lazily by the store, so a 404 on read is not an
//! error — it synthesizes an empty working memory instead. Writes are full
//! replacements; the store itself trims the history to the submitted window
//! bound. Retry policy, if any, belongs to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical partition for chat conversations within the memory store
pub const CHAT_NAMESPACE: &str = "chat";

/// Client-version header value sent with every store request
const CLIENT_VERSION: &str = "0.12.0";

/// Result type for memory store operations
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors that can occur talking to the memory store
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Store unreachable or response body malformed
    #[error("Memory store transport error: {0}")]
    Transport(String),

    /// Store completed the exchange but rejected the request
    #[error("Memory store rejected request ({status}): {message}")]
    Store { status: u16, message: String },
}

/// Role of a conversational turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// End-user message
    User,

    /// Model reply
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversational turn
///
/// Immutable once created; ordering within a working memory is chronological
/// and significant, most-recent last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Persisted session state for one (session id, namespace) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingMemory {
    /// Opaque user identifier; primary key together with `namespace`
    pub session_id: String,

    /// Logical partition, `"chat"` for this service
    pub namespace: String,

    /// Free-form summary of older conversation the store no longer retains
    /// verbatim. Forwarded untouched; this service never generates it.
    pub context: String,

    /// Ordered message history, most-recent last
    pub messages: Vec<Message>,
}

impl WorkingMemory {
    /// Synthesize the empty memory of a session that does not exist yet
    pub fn empty(session_id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            namespace: namespace.into(),
            context: String::new(),
            messages: Vec::new(),
        }
    }
}

/// Replace request body: the full memory plus the desired post-write bound
#[derive(Serialize)]
struct ReplacePayload<'a> {
    #[serde(flatten)]
    memory: &'a WorkingMemory,
    context_window_max: u32,
}

/// HTTP client for the working-memory store
pub struct MemoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl MemoryClient {
    /// Create a new client for the store at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Retrieve the working memory for a session.
    ///
    /// A 404 from the store is treated as "session does not exist yet" and
    /// returns an empty memory for that session id and namespace. Any other
    /// non-success status is surfaced as [`MemoryError::Store`].
    pub async fn read(&self, session_id: &str, namespace: &str) -> Result<WorkingMemory> {
        let url = format!(
            "{}/v1/working-memory/{}?namespace={}",
            self.base_url, session_id, namespace
        );
        tracing::debug!("AMS GET {}", url);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        if response.status().as_u16() == 404 {
            tracing::debug!("AMS GET session not found, returning empty session");
            return Ok(WorkingMemory::empty(session_id, namespace));
        }

        if !response.status().is_success() {
            return Err(Self::store_error(response).await);
        }

        response
            .json::<WorkingMemory>()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))
    }

    /// Overwrite the stored memory for a session.
    ///
    /// Sends the full memory plus `context_window_max` as the desired
    /// post-write shape; trimming the history to that bound is the store's
    /// responsibility, not performed locally. This is a replacement, never a
    /// merge or append.
    pub async fn replace(&self, memory: &WorkingMemory, context_window_max: u32) -> Result<()> {
        let url = format!("{}/v1/working-memory/{}", self.base_url, memory.session_id);
        tracing::debug!("AMS PUT {}", url);

        let payload = ReplacePayload {
            memory,
            context_window_max,
        };

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::store_error(response).await);
        }

        tracing::debug!("AMS PUT succeeded with status {}", response.status());
        Ok(())
    }

    /// Delete the stored memory for a session.
    ///
    /// Any non-success status, including a 404, is surfaced as
    /// [`MemoryError::Store`]; tolerance is the caller's decision.
    pub async fn remove(&self, session_id: &str, namespace: &str) -> Result<()> {
        let url = format!(
            "{}/v1/working-memory/{}?namespace={}",
            self.base_url, session_id, namespace
        );
        tracing::debug!("AMS DELETE {}", url);

        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::store_error(response).await);
        }

        tracing::debug!("AMS DELETE succeeded with status {}", response.status());
        Ok(())
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header("X-Client-Version", CLIENT_VERSION)
    }

    async fn store_error(response: reqwest::Response) -> MemoryError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        MemoryError::Store { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, MessageRole::User);
        assert_eq!(user_msg.content, "Hello");

        let assistant_msg = Message::assistant("Hi there");
        assert_eq!(assistant_msg.role, MessageRole::Assistant);
        assert_eq!(assistant_msg.content, "Hi there");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::user("test");
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(value, json!({"role": "user", "content": "test"}));

        let msg = Message::assistant("test");
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(value["role"], "assistant");
    }

    #[test]
    fn test_working_memory_round_trip() {
        let memory = WorkingMemory {
            session_id: "alice".to_string(),
            namespace: CHAT_NAMESPACE.to_string(),
            context: "likes true crime".to_string(),
            messages: vec![Message::user("hi"), Message::assistant("hello")],
        };

        let encoded = serde_json::to_string(&memory).expect("serialize");
        let decoded: WorkingMemory = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(memory, decoded);
    }

    #[test]
    fn test_empty_working_memory() {
        let memory = WorkingMemory::empty("bob", CHAT_NAMESPACE);
        assert_eq!(memory.session_id, "bob");
        assert_eq!(memory.namespace, "chat");
        assert_eq!(memory.context, "");
        assert!(memory.messages.is_empty());
    }

    #[test]
    fn test_replace_payload_flattens_memory() {
        let memory = WorkingMemory::empty("alice", CHAT_NAMESPACE);
        let payload = ReplacePayload {
            memory: &memory,
            context_window_max: 20,
        };

        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["session_id"], "alice");
        assert_eq!(value["namespace"], "chat");
        assert_eq!(value["context_window_max"], 20);
        assert!(value["messages"].as_array().is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MemoryClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
