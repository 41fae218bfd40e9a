//! Conversation history threaded through the pipeline stages.
//!
//! Each pipeline run owns exactly one `Conversation`. Stages append to it
//! and never remove or rewrite entries, so the model sees every earlier
//! stage's prompt and reply as context for the next call.

use crate::llm_client::{ChatMessage, Role};

/// Append-only message log for a single pipeline run.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the prompt the pipeline is about to send.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Appends the model's reply to the most recent prompt.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// The full history, oldest first, as sent to the completion API.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of assistant entries — one per stage the model has answered.
    pub fn assistant_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }
}
