//! Session Orchestration
//!
//! Implements the single-turn state transition (read, complete, append,
//! persist) and the session lifecycle operations on top of the memory client
//! and the completion provider, independent of transport and model details.
//!
//! Read and delete paths are best-effort: a store failure degrades to the
//! documented fallback (empty history, no-op clear) rather than failing the
//! caller. Turn processing propagates a typed [`ChatError`]; the HTTP layer
//! decides the status code.

use crate::llm::{assemble_prompt, CompletionError, CompletionProvider};
use crate::memory::{Message, MemoryClient, MemoryError, WorkingMemory, CHAT_NAMESPACE};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Errors that can occur while processing a turn
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Keyed async locks serializing turns per session.
///
/// A turn is a read-modify-write against the store's full-replace endpoint;
/// without serialization two concurrent turns for the same username race and
/// the later write silently drops the earlier turn's messages.
#[derive(Default)]
struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Session orchestrator: one working memory per username in the chat
/// namespace, replaced wholesale on every turn
pub struct ChatService {
    memory: MemoryClient,
    provider: Arc<dyn CompletionProvider>,
    context_window_max: u32,
    locks: SessionLocks,
}

impl ChatService {
    /// Create a new orchestrator with its collaborators injected
    pub fn new(
        memory: MemoryClient,
        provider: Arc<dyn CompletionProvider>,
        context_window_max: u32,
    ) -> Self {
        Self {
            memory,
            provider,
            context_window_max,
            locks: SessionLocks::default(),
        }
    }

    /// Retrieve the conversation history for a session.
    ///
    /// Best-effort: any store failure is logged and degrades to an empty
    /// history so the caller can always proceed.
    pub async fn fetch_history(&self, username: &str) -> Vec<Message> {
        match self.memory.read(username, CHAT_NAMESPACE).await {
            Ok(memory) => memory.messages,
            Err(e) => {
                tracing::warn!("Error reading working memory for {}: {}", username, e);
                Vec::new()
            }
        }
    }

    /// Process one conversational turn.
    ///
    /// Reads the current working memory (empty defaults if the session does
    /// not exist), asks the provider for a reply conditioned on context and
    /// history, appends exactly the user turn and the assistant reply, and
    /// persists the result with the configured window bound. The context
    /// summary is forwarded untouched. No write happens if the completion
    /// call fails.
    pub async fn process_turn(&self, username: &str, text: &str) -> Result<String, ChatError> {
        let _guard = self.locks.acquire(username).await;

        let memory = self.memory.read(username, CHAT_NAMESPACE).await?;

        let user_message = Message::user(text);
        let prompt = assemble_prompt(&memory.context, &memory.messages, &user_message);

        tracing::debug!(
            "Requesting completion from {} for {} ({} prompt messages)",
            self.provider.name(),
            username,
            prompt.len()
        );
        let reply = self.provider.complete(&prompt).await?;

        let mut messages = memory.messages;
        messages.push(user_message);
        messages.push(Message::assistant(reply.clone()));

        let updated = WorkingMemory {
            session_id: username.to_string(),
            namespace: CHAT_NAMESPACE.to_string(),
            context: memory.context,
            messages,
        };
        self.memory.replace(&updated, self.context_window_max).await?;

        Ok(reply)
    }

    /// Delete the working memory for a session.
    ///
    /// Best-effort: failures, including a store-side not-found, are logged
    /// and swallowed, so clearing always succeeds from the caller's view and
    /// repeated calls are harmless.
    pub async fn clear_session(&self, username: &str) {
        if let Err(e) = self.memory.remove(username, CHAT_NAMESPACE).await {
            tracing::warn!("Error clearing session for {}: {}", username, e);
        }
    }
}
