//! Mode classification of the latest user message.
//!
//! Rules are evaluated in order and the first match wins:
//! greeting, page count, mark count, depth request, teaching request,
//! point/mark count, then the default explanation-plus-schedule mode.

use std::sync::LazyLock;

use regex::Regex;

use crate::cache::BoundedCache;
use crate::domain::{Mode, ModeDecision, DEFAULT_MODE_PARAMETER};

const GREETING_CACHE_CAPACITY: usize = 128;

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)^\s*(hello|hi|hey|greetings|good morning|good afternoon|good evening|what's up|howdy|hiya)\b",
  )
  .expect("greeting regex")
});
static PAGES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*pages?\b").expect("pages regex"));
static MARKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*marks?\b").expect("marks regex"));
static POINTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*points?\b").expect("points regex"));
static GIVE_POINTS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)give\s+(\d+)\s+points?\b").expect("give-points regex"));

const DEPTH_PHRASES: &[&str] = &[
  "explain in detail",
  "in detail",
  "detailed",
  "comprehensive",
  "in depth",
  "in-depth",
  "1000 words",
  "800 words",
];

const TEACHING_PHRASES: &[&str] = &["teach me", "for beginners", "simple", "explain like"];

pub fn is_greeting(message: &str) -> bool {
  GREETING.is_match(message)
}

/// Classify a message without memoization. Total: every input maps to one decision.
pub fn classify_mode(message: &str) -> ModeDecision {
  classify_with(message, is_greeting)
}

fn classify_with(message: &str, greeting: impl FnOnce(&str) -> bool) -> ModeDecision {
  let msg = message.to_lowercase();

  if greeting(msg.trim()) {
    return ModeDecision::plain(Mode::Greeting);
  }
  if let Some(n) = capture_count(&PAGES, &msg) {
    return ModeDecision::new(Mode::Pages, n);
  }
  if let Some(n) = capture_count(&MARKS, &msg) {
    return ModeDecision::new(Mode::Marks, n);
  }
  if DEPTH_PHRASES.iter().any(|p| msg.contains(p)) {
    return ModeDecision::plain(Mode::DetailedNoSchedule);
  }
  if TEACHING_PHRASES.iter().any(|p| msg.contains(p)) {
    return ModeDecision::plain(Mode::Teaching);
  }
  if msg.contains("point") || msg.contains("mark") {
    let count = capture_count(&GIVE_POINTS, &msg)
      .or_else(|| capture_count(&POINTS, &msg))
      .or_else(|| capture_count(&MARKS, &msg));
    if let Some(n) = count {
      return ModeDecision::new(Mode::Points, n);
    }
  }
  ModeDecision::plain(Mode::Default)
}

/// First capture group as a count, clamped to at least 1.
/// A number too large to parse falls back to the default parameter.
fn capture_count(re: &Regex, msg: &str) -> Option<u32> {
  re.captures(msg).map(|caps| {
    caps
      .get(1)
      .and_then(|m| m.as_str().parse::<u32>().ok())
      .map(|n| n.max(1))
      .unwrap_or(DEFAULT_MODE_PARAMETER)
  })
}

/// Mode classifier with a bounded memo of greeting checks keyed by exact text.
pub struct ModeClassifier {
  greetings: BoundedCache<String, bool>,
}

impl Default for ModeClassifier {
  fn default() -> Self { Self::new() }
}

impl ModeClassifier {
  pub fn new() -> Self {
    Self { greetings: BoundedCache::new(GREETING_CACHE_CAPACITY) }
  }

  pub fn is_greeting(&self, message: &str) -> bool {
    let key = message.trim().to_string();
    self.greetings.get_or_insert_with(&key, || is_greeting(&key))
  }

  pub fn classify(&self, message: &str) -> ModeDecision {
    classify_with(message, |m| self.is_greeting(m))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn greetings_win_first() {
    assert_eq!(classify_mode("Hello there, 5 pages on DNS?").mode, Mode::Greeting);
    assert_eq!(classify_mode("  good morning").mode, Mode::Greeting);
    assert_eq!(classify_mode("what's up").mode, Mode::Greeting);
    assert_ne!(classify_mode("history of the hittites").mode, Mode::Greeting);
    assert_ne!(classify_mode("say hi to my teacher").mode, Mode::Greeting);
  }

  #[test]
  fn page_count_beats_mark_count() {
    let d = classify_mode("Write 3 pages on TCP for 10 marks");
    assert_eq!(d, ModeDecision::new(Mode::Pages, 3));
  }

  #[test]
  fn mark_count_routes_to_marks() {
    assert_eq!(classify_mode("SSL handshake 16 marks"), ModeDecision::new(Mode::Marks, 16));
    assert_eq!(classify_mode("one question, 1 mark"), ModeDecision::new(Mode::Marks, 1));
  }

  #[test]
  fn depth_phrases_skip_schedule() {
    assert_eq!(classify_mode("Explain in detail how BGP works").mode, Mode::DetailedNoSchedule);
    assert_eq!(classify_mode("a comprehensive overview of RAID").mode, Mode::DetailedNoSchedule);
    assert_eq!(classify_mode("cover paging in depth").mode, Mode::DetailedNoSchedule);
  }

  #[test]
  fn teaching_phrases() {
    assert_eq!(classify_mode("teach me recursion").mode, Mode::Teaching);
    assert_eq!(classify_mode("Pointers for beginners").mode, Mode::Teaching);
  }

  #[test]
  fn explicit_give_points_wins() {
    let d = classify_mode("give 5 points about photosynthesis and explain osmosis");
    assert_eq!(d, ModeDecision::new(Mode::Points, 5));
    let d = classify_mode("3 points on mitosis, give 4 points on meiosis");
    assert_eq!(d, ModeDecision::new(Mode::Points, 4));
  }

  #[test]
  fn generic_point_count() {
    assert_eq!(classify_mode("7 points each:\n1. Define entropy"), ModeDecision::new(Mode::Points, 7));
  }

  #[test]
  fn point_word_without_count_falls_to_default() {
    assert_eq!(classify_mode("what is the point of TCP"), ModeDecision::plain(Mode::Default));
  }

  #[test]
  fn default_mode_and_parameter() {
    let d = classify_mode("Operating system scheduling");
    assert_eq!(d.mode, Mode::Default);
    assert_eq!(d.parameter, DEFAULT_MODE_PARAMETER);
  }

  #[test]
  fn counts_are_bounded() {
    assert_eq!(classify_mode("0 pages on caching"), ModeDecision::new(Mode::Pages, 1));
    assert_eq!(
      classify_mode("99999999999999999999 pages on caching"),
      ModeDecision::new(Mode::Pages, DEFAULT_MODE_PARAMETER)
    );
  }

  #[test]
  fn classifier_is_total_on_odd_input() {
    for input in ["", "   ", "!!!", "\n\n", "தமிழ்", "5", "points", "marks 5"] {
      let _ = classify_mode(input);
    }
  }

  #[test]
  fn memoized_classifier_agrees_with_plain() {
    let classifier = ModeClassifier::new();
    for input in ["hi", "hi", "give 2 points on DNS", "teach me Rust", "4 pages on Linux"] {
      assert_eq!(classifier.classify(input), classify_mode(input));
    }
  }
}
