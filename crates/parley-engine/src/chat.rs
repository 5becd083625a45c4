//! Conversation state management.
//!
//! [`ChatState`] is the single source of truth for the visible conversation
//! and the request lifecycle. The presentation layer receives read-only
//! snapshots and drives sends through [`ChatState::begin_send`] /
//! [`ChatState::complete_send`] (or the composed [`ChatState::send_message`]
//! for headless use).

use serde::{Deserialize, Serialize};

use crate::client::{ChatClient, ClientError};

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// A single message in a conversation.
///
/// Immutable once created. Conversation order is vector order, append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors that can occur when starting a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// A request is already outstanding; at most one is allowed at a time.
    #[error("a request is already in flight")]
    RequestInFlight,
}

/// Single source of truth for the conversation and request lifecycle.
///
/// Invariant: `is_loading` is true only strictly between a successful
/// [`begin_send`](Self::begin_send) and the matching settlement call.
/// Overlapping sends are rejected here, not just by the input widget.
#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    is_loading: bool,
    error: Option<String>,
}

impl ChatState {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the ordered message list.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The error from the most recent failed send, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a send: clear any prior error, append the user message, and
    /// mark the conversation loading.
    ///
    /// Returns a snapshot of the full history (including the just-appended
    /// user message) to hand to the transport client. Content is not
    /// validated here; callers are expected to reject blank input.
    ///
    /// Every `Ok` must be settled by exactly one call to
    /// [`complete_send`](Self::complete_send) or
    /// [`fail_send`](Self::fail_send).
    pub fn begin_send(&mut self, content: impl Into<String>) -> Result<Vec<Message>, SendError> {
        if self.is_loading {
            return Err(SendError::RequestInFlight);
        }

        self.error = None;
        self.messages.push(Message::user(content));
        self.is_loading = true;

        Ok(self.messages.clone())
    }

    /// Settle a send with the transport outcome.
    ///
    /// On success the assistant reply is appended; on failure exactly one
    /// user-visible error string is recorded (overwriting any previous one)
    /// and the assistant turn stays absent. The loading flag is always
    /// cleared.
    pub fn complete_send(&mut self, result: Result<String, ClientError>) {
        match result {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply));
                self.is_loading = false;
            }
            Err(err) => self.fail_send(err.to_string()),
        }
    }

    /// Settle a send as failed with a caller-supplied message.
    ///
    /// Used directly when the failure did not come from the transport
    /// client (for example the spawned request task panicked).
    pub fn fail_send(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_loading = false;
    }

    /// Send a message and wait for the settlement.
    ///
    /// Composes begin, transport call, and settle; the outcome (reply or
    /// error) lands in the conversation state either way. The only `Err`
    /// is an overlapping send. Interactive callers should prefer the split
    /// form so rendering is not blocked on the network.
    pub async fn send_message(
        &mut self,
        client: &ChatClient,
        content: impl Into<String>,
        use_rag: bool,
    ) -> Result<(), SendError> {
        let history = self.begin_send(content)?;
        let result = client.complete(&history, use_rag).await;
        self.complete_send(result);
        Ok(())
    }

    /// Reset the message list to empty and clear any error.
    ///
    /// Does not touch an in-flight request; the loading flag is left as-is.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.error = None;
    }
}
