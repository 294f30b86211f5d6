//! Per-mode prompt composition: system instruction, context window and generation budget.

use crate::config::Prompts;
use crate::domain::{ConversationTurn, HeadingKey, HeadingSet, Language, Mode, ModeDecision, Role};
use crate::openai::GenerationParams;
use crate::util::fill_template;

/// Hard ceiling on output tokens for page/mark essays.
pub const MAX_ESSAY_TOKENS: u32 = 8000;
pub const WORDS_PER_PAGE: u32 = 250;
pub const WORDS_PER_MARK: u32 = 50;

const ESSAY_CONTEXT_TURNS: usize = 4;
const TEACHING_CONTEXT_TURNS: usize = 4;
const DETAILED_CONTEXT_TURNS: usize = 4;
const DEFAULT_CONTEXT_TURNS: usize = 6;

/// Everything the completion client needs for one call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
  pub messages: Vec<ConversationTurn>,
  pub params: GenerationParams,
}

/// Per-request inputs beyond the mode decision.
pub struct PromptContext<'a> {
  pub conversation: &'a [ConversationTurn],
  pub language: Language,
  pub headings: &'a HeadingSet,
  /// Extracted questions; only read in points mode.
  pub questions: &'a [String],
}

pub fn words_for_pages(pages: u32) -> u32 { pages.saturating_mul(WORDS_PER_PAGE) }
pub fn words_for_marks(marks: u32) -> u32 { marks.saturating_mul(WORDS_PER_MARK) }

fn essay_token_cap(word_count: u32) -> u32 {
  word_count.saturating_mul(2).min(MAX_ESSAY_TOKENS)
}

/// The last `max` turns; leading non-user turns are dropped when a user turn follows,
/// so the window opens on something the user said.
pub fn recent_turns(turns: &[ConversationTurn], max: usize) -> &[ConversationTurn] {
  let start = turns.len().saturating_sub(max);
  let window = &turns[start..];
  match window.iter().position(|t| t.role == Role::User) {
    Some(first_user) => &window[first_user..],
    None => window,
  }
}

fn with_system(system: String, context: &[ConversationTurn]) -> Vec<ConversationTurn> {
  std::iter::once(ConversationTurn::system(system)).chain(context.iter().cloned()).collect()
}

fn heading_pairs<'a>(headings: &'a HeadingSet, language: Language) -> Vec<(&'static str, &'a str)> {
  let mut pairs: Vec<(&'static str, &'a str)> =
    HeadingKey::ALL.iter().map(|k| (k.as_str(), headings.get(*k))).collect();
  pairs.push(("language", language.name()));
  pairs
}

/// Compose the completion request for `decision`.
/// Returns None for greetings, which are answered without the model.
pub fn build_request(prompts: &Prompts, decision: ModeDecision, ctx: &PromptContext<'_>) -> Option<CompletionRequest> {
  let n = decision.parameter;
  let request = match decision.mode {
    Mode::Greeting => return None,
    Mode::Pages => {
      let words = words_for_pages(n);
      let system = fill_template(&prompts.pages_system, &[("word_count", &words.to_string())]);
      CompletionRequest {
        messages: with_system(system, recent_turns(ctx.conversation, ESSAY_CONTEXT_TURNS)),
        params: GenerationParams { temperature: 0.3, max_tokens: essay_token_cap(words), top_p: None },
      }
    }
    Mode::Marks => {
      let words = words_for_marks(n);
      let system = fill_template(
        &prompts.marks_system,
        &[("marks", &n.to_string()), ("word_count", &words.to_string())],
      );
      CompletionRequest {
        messages: with_system(system, recent_turns(ctx.conversation, ESSAY_CONTEXT_TURNS)),
        params: GenerationParams { temperature: 0.3, max_tokens: essay_token_cap(words), top_p: None },
      }
    }
    Mode::Teaching => CompletionRequest {
      messages: with_system(prompts.teaching_system.clone(), recent_turns(ctx.conversation, TEACHING_CONTEXT_TURNS)),
      params: GenerationParams { temperature: 0.3, max_tokens: 2000, top_p: None },
    },
    Mode::Points => {
      let points = n.to_string();
      let questions = ctx
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");
      let system = fill_template(&prompts.points_system, &[("points", &points)]);
      let user = fill_template(&prompts.points_user_template, &[("points", &points), ("questions", &questions)]);
      CompletionRequest {
        messages: vec![ConversationTurn::system(system), ConversationTurn::user(user)],
        params: GenerationParams { temperature: 0.1, max_tokens: 2000, top_p: None },
      }
    }
    Mode::DetailedNoSchedule => {
      let system = fill_template(&prompts.detailed_system, &heading_pairs(ctx.headings, ctx.language));
      CompletionRequest {
        messages: with_system(system, recent_turns(ctx.conversation, DETAILED_CONTEXT_TURNS)),
        params: GenerationParams { temperature: 0.3, max_tokens: 4000, top_p: Some(0.9) },
      }
    }
    Mode::Default => {
      let system = fill_template(&prompts.default_system, &heading_pairs(ctx.headings, ctx.language));
      CompletionRequest {
        messages: with_system(system, recent_turns(ctx.conversation, DEFAULT_CONTEXT_TURNS)),
        params: GenerationParams { temperature: 0.3, max_tokens: 3000, top_p: Some(0.9) },
      }
    }
  };
  Some(request)
}
