/// LLM Client — the single point of entry for all Together API calls in FastHire.
///
/// ARCHITECTURAL RULE: No other module may call the chat completion API directly.
/// All LLM interactions MUST go through this module.
///
/// The pipeline owns the conversation history; this client sends whatever
/// messages it is handed and appends nothing itself.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const TOGETHER_API_URL: &str = "https://api.together.xyz/v1/chat/completions";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Message author, serialized in the OpenAI-compatible wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a conversation, as sent over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantReply,
}

#[derive(Debug, Deserialize)]
struct AssistantReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The seam the pipeline depends on. Production uses [`TogetherClient`];
/// tests script this trait with canned replies.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Executes one chat completion over the given message history.
    ///
    /// Every failure mode — transport, non-2xx status, malformed body,
    /// empty completion — comes back as a [`CompletionError`]; callers
    /// treat them all the same way.
    async fn complete(&self, messages: &[ChatMessage], model: &str)
        -> Result<String, CompletionError>;
}

/// The single LLM client used by the generation pipeline.
/// Wraps the Together chat completions API (OpenAI-compatible).
#[derive(Clone)]
pub struct TogetherClient {
    client: Client,
    api_key: String,
}

impl TogetherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for TogetherClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages,
        };

        // Single attempt. A failed pipeline run is restarted by the caller
        // with a fresh request; the stage that failed is reported instead
        // of papered over with retries.
        let response = self
            .client
            .post(TOGETHER_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        match reply_text(&chat_response) {
            Some(text) => Ok(text.to_string()),
            None => Err(CompletionError::EmptyContent),
        }
    }
}

/// Extracts the assistant text from the first choice, with reasoning-model
/// scratchpad removed. Returns None when the reply is missing or blank.
fn reply_text(response: &ChatResponse) -> Option<&str> {
    let content = response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())?;
    let content = strip_reasoning_block(content).trim();
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

/// Strips a leading `<think> ... </think>` block from reasoning-model output.
/// EXAONE-Deep emits its chain of thought inside these tags before the answer.
fn strip_reasoning_block(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with("<think>") {
        return text;
    }
    match trimmed.split_once("</think>") {
        Some((_, answer)) => answer,
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_returns_first_choice_content() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "  Hello there.  "}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(&response), Some("Hello there."));
    }

    #[test]
    fn test_reply_text_none_on_empty_choices() {
        let json = r#"{"choices": []}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(&response), None);
    }

    #[test]
    fn test_reply_text_none_on_blank_content() {
        let json = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(&response), None);
    }

    #[test]
    fn test_strip_reasoning_block_removes_scratchpad() {
        let input = "<think>\nLet me reason about this.\n</think>\nFinal answer.";
        assert_eq!(strip_reasoning_block(input).trim(), "Final answer.");
    }

    #[test]
    fn test_strip_reasoning_block_keeps_plain_text() {
        let input = "No scratchpad here.";
        assert_eq!(strip_reasoning_block(input), input);
    }

    #[test]
    fn test_strip_reasoning_block_keeps_unclosed_tag() {
        // An unterminated block is left alone rather than guessed at.
        let input = "<think>never closed";
        assert_eq!(strip_reasoning_block(input), input);
    }

    #[test]
    fn test_chat_message_constructors_set_roles() {
        assert_eq!(ChatMessage::user("hi").role, Role::User);
        assert_eq!(ChatMessage::assistant("ok").role, Role::Assistant);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }
}
