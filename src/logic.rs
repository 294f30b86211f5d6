//! Chat request handling: validate, classify, prompt, complete, post-process.
//!
//! A request makes at most one completion call. Non-English explanations may
//! also trigger heading translations, which never fail the request.

use tracing::{debug, info, instrument};

use crate::domain::{ConversationTurn, HeadingSet, Mode, ModeDecision, Role};
use crate::error::ChatError;
use crate::language::detect_language;
use crate::prompt::{build_request, PromptContext};
use crate::schedule::replace_schedule;
use crate::state::AppState;

fn validate(turns: &[ConversationTurn]) -> Result<&ConversationTurn, ChatError> {
  let last = turns.last().ok_or_else(|| ChatError::Validation("No messages provided".into()))?;
  if last.role != Role::User {
    return Err(ChatError::Validation("The last message must come from the user".into()));
  }
  Ok(last)
}

/// Serve one conversation. Returns the text for the `response` field.
#[instrument(level = "info", skip(state, turns), fields(turns = turns.len()))]
pub async fn submit_conversation(state: &AppState, turns: &[ConversationTurn]) -> Result<String, ChatError> {
  let latest = validate(turns)?.content.as_str();

  let language = detect_language(latest);
  let mut decision = state.classifier.classify(latest);
  info!(target: "chat", mode = %decision.mode, parameter = decision.parameter, %language, msg_len = latest.len(), "Request classified");

  if decision.mode == Mode::Greeting {
    return Ok(state.prompts.greeting_reply.clone());
  }

  let questions = if decision.mode == Mode::Points {
    let qs = state.questions.extract(latest);
    if qs.is_empty() {
      debug!(target: "chat", "Points mode without extractable questions; serving default mode");
      decision = ModeDecision::plain(Mode::Default);
    }
    qs
  } else {
    Vec::new()
  };

  let headings = match decision.mode {
    Mode::DetailedNoSchedule | Mode::Default => state.headings.headings(language).await,
    _ => HeadingSet::english(),
  };

  let ctx = PromptContext { conversation: turns, language, headings: &headings, questions: &questions };
  let request = build_request(&state.prompts, decision, &ctx)
    .ok_or_else(|| ChatError::Internal(format!("no prompt for mode {}", decision.mode)))?;

  let raw = state.completion.complete(&request.messages, &request.params).await?;

  let response = if decision.mode == Mode::Default { replace_schedule(&raw, latest) } else { raw };
  info!(target: "chat", mode = %decision.mode, response_len = response.len(), "Request served");
  Ok(response)
}

