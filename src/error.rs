//! Error types for the chat pipeline and its collaborators.
//!
//! Only `ChatError` crosses the HTTP boundary. Its `IntoResponse` impl keeps
//! internal detail in the logs and hands the caller a fixed message.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::error;

use crate::protocol::ErrorOut;

/// Message returned to callers for every server-side failure.
pub const GENERIC_ERROR_MESSAGE: &str =
  "An error occurred while processing your request. Please try again.";

/// Failure of a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
  #[error("{0}")]
  Validation(String),

  #[error("completion failed: {0}")]
  Completion(#[from] CompletionError),

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for ChatError {
  fn into_response(self) -> axum::response::Response {
    match self {
      ChatError::Validation(detail) => {
        (StatusCode::BAD_REQUEST, Json(ErrorOut { detail })).into_response()
      }
      other => {
        error!(target: "chat", error = %other, debug = ?other, "Chat request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(ErrorOut { detail: GENERIC_ERROR_MESSAGE.into() }),
        )
          .into_response()
      }
    }
  }
}

/// Failure reported by the completion provider.
#[derive(Debug, Error)]
pub enum CompletionError {
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("provider returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed provider response: {0}")]
  Malformed(String),
}

/// Failure of the translation collaborator. Never escapes the heading localizer.
#[derive(Debug, Error)]
pub enum TranslateError {
  #[error("translation service unavailable: {0}")]
  Unavailable(String),

  #[error("translation request failed: {0}")]
  Http(String),

  #[error("translation came back empty")]
  Empty,
}

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("missing required environment variable {0}")]
  MissingEnv(&'static str),

  #[error("invalid value for {key}: {message}")]
  Invalid { key: &'static str, message: String },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("TOML parse error: {0}")]
  Toml(#[from] toml::de::Error),
}

/// Failure of the ingestion batch job.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn validation_maps_to_bad_request_with_detail() {
    let resp = ChatError::Validation("No messages provided".into()).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["detail"], "No messages provided");
  }

  #[tokio::test]
  async fn upstream_failures_hide_their_detail() {
    let err = ChatError::Completion(CompletionError::Status { status: 401, message: "bad key sk-123".into() });
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains(GENERIC_ERROR_MESSAGE));
    assert!(!body.contains("sk-123"));
  }
}
