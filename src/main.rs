//! NexusAI · Tutor Chat Backend
//!
//! - Axum HTTP API (`POST /api/chat`, `GET /api/health`)
//! - OpenAI-compatible completion provider (Groq by default)
//! - Rule-based mode selection and study-schedule table rendering
//!
//! Important env variables:
//!   PORT                : u16 (default 8000)
//!   GROQ_API_KEY        : required
//!   LLM_BASE_URL        : default "https://api.groq.com/openai/v1"
//!   LLM_MODEL           : default "llama-3.3-70b-versatile"
//!   TRANSLATOR          : "llm" (default), "libre" or "none"
//!   CORS_ALLOW_ORIGIN   : comma-separated origins or "*" (default "http://localhost:8080")
//!   PROMPTS_CONFIG_PATH : TOML file overriding instruction templates
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use nexusai_backend::config::Settings;
use nexusai_backend::routes::build_router;
use nexusai_backend::state::AppState;
use nexusai_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env()?;

  // Shared state: completion client, translator, caches, prompts.
  let state = Arc::new(AppState::from_settings(&settings)?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state, &settings.cors);

  let listener = TcpListener::bind(settings.addr).await?;
  info!(target: "nexusai_backend", addr = %settings.addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "nexusai_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "nexusai_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "nexusai_backend", "Shutdown signal received");
}
