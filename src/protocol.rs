//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::ConversationTurn;

#[derive(Debug, Deserialize)]
pub struct ChatIn {
    #[serde(default)]
    pub messages: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatOut {
    pub response: String,
}

/// Error body, for both client and server errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub detail: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
