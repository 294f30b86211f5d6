//! Minimal client for OpenAI-compatible chat completion APIs (Groq by default).
//!
//! We only call chat.completions and request plain text.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::domain::{ConversationTurn, Role};
use crate::error::CompletionError;

/// Sampling and length limits for one completion call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
  pub temperature: f32,
  pub max_tokens: u32,
  pub top_p: Option<f32>,
}

/// The external language model, as seen by the request handler.
#[async_trait]
pub trait CompletionClient: Send + Sync {
  /// Send `messages` and return the assistant's text, trimmed.
  async fn complete(
    &self,
    messages: &[ConversationTurn],
    params: &GenerationParams,
  ) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAI {
  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self, CompletionError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), model })
  }
}

#[async_trait]
impl CompletionClient for OpenAI {
  #[instrument(
    level = "info",
    skip(self, messages, params),
    fields(model = %self.model, turns = messages.len(), max_tokens = params.max_tokens, temperature = params.temperature)
  )]
  async fn complete(
    &self,
    messages: &[ConversationTurn],
    params: &GenerationParams,
  ) -> Result<String, CompletionError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: &self.model,
      messages: messages
        .iter()
        .map(|t| ChatMessageReq { role: t.role, content: &t.content })
        .collect(),
      temperature: params.temperature,
      max_tokens: params.max_tokens,
      top_p: params.top_p,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "nexusai-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_provider_error(&body).unwrap_or(body);
      error!(elapsed = ?start.elapsed(), %status, "Completion provider returned an error status");
      return Err(CompletionError::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Completion usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .ok_or_else(|| CompletionError::Malformed("response has no message content".into()))?;
    let text = text.trim().to_string();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Completion received");
    Ok(text)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessageReq<'a>>,
  temperature: f32,
  max_tokens: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  top_p: Option<f32>,
}
#[derive(Serialize)]
struct ChatMessageReq<'a> { role: Role, content: &'a str }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI-style error body.
fn extract_provider_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
