//! OpenAI-compatible chat session.
//!
//! Talks to `POST {base_url}/v1/chat/completions` and keeps the conversation
//! history in memory, resending it with every prompt.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::ChatError;
use crate::domain::models::ChatConfig;
use crate::domain::ports::ChatSession;

/// Configuration for the OpenAI-compatible session.
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    pub api_key: String,
    /// API base URL, without the `/v1/...` path.
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub connect_timeout_secs: u64,
    /// Returned in place of an empty reply.
    pub unavailable_message: String,
}

impl OpenAiChatConfig {
    /// Build from settings, reading the API key from the configured variable.
    pub fn from_settings(settings: &ChatConfig) -> Result<Self, ChatError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ChatError::MissingApiKey(settings.api_key_env.clone()))?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            connect_timeout_secs: settings.connect_timeout_secs,
            unavailable_message: settings.unavailable_message.clone(),
        })
    }
}

/// Message role in the Chat Completions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: MessageRole::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: String) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat session backed by an OpenAI-compatible HTTP API.
pub struct OpenAiChatSession {
    config: OpenAiChatConfig,
    client: Client,
    history: Vec<ChatMessage>,
}

impl OpenAiChatSession {
    /// Create a new session with an empty conversation.
    pub fn new(config: OpenAiChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ChatError::Request(format!("Failed to create HTTP client: {e}")))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "chat session initialized"
        );

        Ok(Self {
            config,
            client,
            history: Vec::new(),
        })
    }

    /// Messages exchanged so far in the current conversation.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    fn classify_status(status: StatusCode, body: String) -> ChatError {
        match status.as_u16() {
            401 | 403 => ChatError::Authentication(body),
            429 | 502 | 503 | 504 | 529 => ChatError::ServiceUnavailable(format!("HTTP {status}")),
            code => ChatError::Api { status: code, body },
        }
    }
}

#[async_trait]
impl ChatSession for OpenAiChatSession {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn new_conversation(&mut self) -> Result<(), ChatError> {
        debug!(turns = self.history.len(), "starting new conversation");
        self.history.clear();
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> Result<String, ChatError> {
        // History is committed only once a reply arrives, so a dropped future
        // leaves the conversation as it was.
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(prompt));

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty());

        let Some(content) = content else {
            warn!(model = %self.config.model, "reply contained no usable content");
            return Ok(self.config.unavailable_message.clone());
        };

        self.history = messages;
        self.history.push(ChatMessage::assistant(content.clone()));
        Ok(content)
    }
}
