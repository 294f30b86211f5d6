//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; the chat handler tags its span with a request id.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ChatError;
use crate::logic::submit_conversation;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4(), turns = body.messages.len()))]
pub async fn http_post_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> Result<Json<ChatOut>, ChatError> {
  let response = submit_conversation(&state, &body.messages).await?;
  info!(target: "chat", response_len = response.len(), "HTTP chat served");
  Ok(Json(ChatOut { response }))
}
