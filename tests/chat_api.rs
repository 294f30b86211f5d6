//! Router-level tests for `POST /api/chat` with mock collaborators.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
  body::Body,
  http::{Request, StatusCode},
  Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use nexusai_backend::config::{CorsOrigins, Prompts};
use nexusai_backend::domain::{ConversationTurn, Language, Role};
use nexusai_backend::error::{CompletionError, TranslateError, GENERIC_ERROR_MESSAGE};
use nexusai_backend::openai::{CompletionClient, GenerationParams};
use nexusai_backend::routes::build_router;
use nexusai_backend::state::AppState;
use nexusai_backend::translate::Translator;

/// Completion mock: records every call and replies with a fixed text (or fails).
struct MockCompletion {
  reply: Result<String, u16>,
  calls: AtomicUsize,
  last: Mutex<Option<(Vec<ConversationTurn>, GenerationParams)>>,
}

impl MockCompletion {
  fn replying(text: &str) -> Arc<Self> {
    Arc::new(Self { reply: Ok(text.into()), calls: AtomicUsize::new(0), last: Mutex::new(None) })
  }
  fn failing(status: u16) -> Arc<Self> {
    Arc::new(Self { reply: Err(status), calls: AtomicUsize::new(0), last: Mutex::new(None) })
  }
  fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
  fn last_messages(&self) -> Vec<ConversationTurn> {
    self.last.lock().unwrap().as_ref().map(|(m, _)| m.clone()).unwrap_or_default()
  }
  fn last_params(&self) -> GenerationParams {
    self.last.lock().unwrap().as_ref().map(|(_, p)| *p).expect("no completion call recorded")
  }
}

#[async_trait]
impl CompletionClient for MockCompletion {
  async fn complete(&self, messages: &[ConversationTurn], params: &GenerationParams) -> Result<String, CompletionError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    *self.last.lock().unwrap() = Some((messages.to_vec(), *params));
    match &self.reply {
      Ok(text) => Ok(text.clone()),
      Err(status) => Err(CompletionError::Status { status: *status, message: "quota exceeded for key sk-secret".into() }),
    }
  }
}

/// Translator mock that fails every call.
struct BrokenTranslator {
  calls: AtomicUsize,
}

#[async_trait]
impl Translator for BrokenTranslator {
  async fn translate(&self, _text: &str, _s: Language, _d: Language) -> Result<String, TranslateError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(TranslateError::Http("boom".into()))
  }
}

fn app(completion: Arc<MockCompletion>, translator: Option<Arc<dyn Translator>>) -> Router {
  let state = Arc::new(AppState::new(completion, translator, Prompts::default()));
  build_router(state, &CorsOrigins::Any)
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("POST")
    .uri("/api/chat")
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, value)
}

fn user(content: &str) -> Value {
  json!({ "role": "user", "content": content })
}

#[tokio::test]
async fn health_is_ok() {
  let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
  let resp = app(MockCompletion::replying(""), None).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_conversation_is_rejected_without_calls() {
  let completion = MockCompletion::replying("unused");
  let (status, body) = post_chat(app(completion.clone(), None), json!({ "messages": [] })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "No messages provided");
  assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn last_turn_must_be_from_user() {
  let completion = MockCompletion::replying("unused");
  let body = json!({ "messages": [user("hi"), { "role": "assistant", "content": "hello" }] });
  let (status, _) = post_chat(app(completion.clone(), None), body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn unknown_role_is_a_client_error() {
  let completion = MockCompletion::replying("unused");
  let body = json!({ "messages": [{ "role": "wizard", "content": "hi" }] });
  let (status, _) = post_chat(app(completion.clone(), None), body).await;
  assert!(status.is_client_error());
  assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn greeting_is_answered_locally() {
  let completion = MockCompletion::replying("unused");
  let (status, body) = post_chat(app(completion.clone(), None), json!({ "messages": [user("Hey there!")] })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["response"], Prompts::default().greeting_reply);
  assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn default_mode_renders_schedule_table() {
  let reply = "Photosynthesis turns light into sugar.\n\nSTUDY SCHEDULE:\nDay 1|Intro topic|2 hours\nDay 2|Next topic|3 hours";
  let completion = MockCompletion::replying(reply);
  let (status, body) = post_chat(app(completion.clone(), None), json!({ "messages": [user("photosynthesis")] })).await;
  assert_eq!(status, StatusCode::OK);
  let text = body["response"].as_str().unwrap();
  assert!(text.starts_with("Photosynthesis turns light into sugar.\n\n<div"));
  assert!(!text.contains("Day 1|Intro topic|2 hours"));
  assert_eq!(text.matches("<td ").count(), 6);
  assert_eq!(completion.calls(), 1);

  let params = completion.last_params();
  assert_eq!(params.max_tokens, 3000);
  let messages = completion.last_messages();
  assert_eq!(messages[0].role, Role::System);
  assert!(messages[0].content.contains("STUDY SCHEDULE:"));
}

#[tokio::test]
async fn default_mode_without_schedule_returns_reply_unchanged() {
  let reply = "Only prose, nothing tabular here.";
  let (_, body) = post_chat(app(MockCompletion::replying(reply), None), json!({ "messages": [user("routers")] })).await;
  assert_eq!(body["response"], reply);
}

#[tokio::test]
async fn page_requests_skip_schedule_processing() {
  let reply = "Essay body\nDay 1|Should stay|2 hours";
  let completion = MockCompletion::replying(reply);
  let (_, body) = post_chat(app(completion.clone(), None), json!({ "messages": [user("2 pages on TCP congestion control")] })).await;
  assert_eq!(body["response"], reply);
  assert_eq!(completion.last_params().max_tokens, 1000);
  assert!(completion.last_messages()[0].content.contains("500-word"));
}

#[tokio::test]
async fn points_mode_sends_only_extracted_questions() {
  let completion = MockCompletion::replying("1. Define entropy?\n• Disorder measure.");
  let convo = json!({ "messages": [
    user("earlier question"),
    { "role": "assistant", "content": "earlier answer" },
    user("give 3 points each\n1. Define entropy\n2. What is osmosis\nIntroduction\n3. photosynthesis"),
  ]});
  let (status, _) = post_chat(app(completion.clone(), None), convo).await;
  assert_eq!(status, StatusCode::OK);
  let messages = completion.last_messages();
  assert_eq!(messages.len(), 2);
  assert_eq!(
    messages[1].content,
    "3 points each:\n1. Define entropy?\n2. What is osmosis?\n3. What is photosynthesis?"
  );
  assert_eq!(completion.last_params().temperature, 0.1);
}

#[tokio::test]
async fn non_english_request_survives_broken_translator() {
  let translator = Arc::new(BrokenTranslator { calls: AtomicUsize::new(0) });
  let completion = MockCompletion::replying("விளக்கம்");
  let (status, body) = post_chat(
    app(completion.clone(), Some(translator.clone())),
    json!({ "messages": [user("ஒளிச்சேர்க்கை பற்றி விரிவாக")] }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["response"], "விளக்கம்");
  assert_eq!(translator.calls.load(Ordering::SeqCst), 11);
  let system = &completion.last_messages()[0].content;
  assert!(system.contains("INTRODUCTION"));
  assert!(system.contains("Tamil"));
}

#[tokio::test]
async fn completion_failure_is_generic_server_error() {
  let completion = MockCompletion::failing(429);
  let (status, body) = post_chat(app(completion.clone(), None), json!({ "messages": [user("explain DNS")] })).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["detail"], GENERIC_ERROR_MESSAGE);
  assert!(!body.to_string().contains("sk-secret"));
  assert_eq!(completion.calls(), 1);
}
