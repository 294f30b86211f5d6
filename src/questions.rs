//! Exam-question extraction for points mode.
//!
//! Works line by line over loosely formatted text. Numbered lines (`"3. ..."`)
//! are always turned into questions; unnumbered lines only when they carry a
//! question keyword. Results are deduplicated on a lowercase, punctuation-free
//! form and keep first-seen order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::cache::BoundedCache;

const QUESTION_CACHE_CAPACITY: usize = 64;
const MAX_LINE_CHARS: usize = 200;

const SECTION_HEADERS: &[&str] = &["introduction", "key features", "applications", "conclusion", "references"];
const QUESTION_KEYWORDS: &[&str] = &["define", "what", "list", "explain", "state", "name"];

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("numbered regex"));
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("non-word regex"));

fn has_keyword(lower: &str) -> bool {
  QUESTION_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn canonical(question: &str) -> String {
  NON_WORD.replace_all(&question.to_lowercase(), "").into_owned()
}

fn question_from_line(line: &str) -> Option<String> {
  let lower = line.to_lowercase();
  if SECTION_HEADERS.contains(&lower.as_str()) && !has_keyword(&lower) {
    return None;
  }

  match NUMBERED.find(line) {
    None => {
      let len = line.chars().count();
      if has_keyword(&lower) && len > 10 && len < 150 {
        let mut q = line.to_string();
        if !q.ends_with('?') {
          q.push('?');
        }
        Some(q)
      } else {
        None
      }
    }
    Some(prefix) => {
      let rest = &line[prefix.end()..];
      let len = rest.chars().count();
      if len <= 5 || len >= 150 {
        return None;
      }
      if rest.ends_with('?') {
        Some(rest.to_string())
      } else if has_keyword(&rest.to_lowercase()) {
        Some(format!("{rest}?"))
      } else {
        Some(format!("What is {rest}?"))
      }
    }
  }
}

/// Extract unique exam-style questions from `text`, in order of first appearance.
pub fn extract_questions(text: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && line.chars().count() <= MAX_LINE_CHARS)
    .filter_map(question_from_line)
    .filter(|q| seen.insert(canonical(q)))
    .collect()
}

/// Question extractor memoized by exact input text.
pub struct QuestionExtractor {
  cache: BoundedCache<String, Vec<String>>,
}

impl Default for QuestionExtractor {
  fn default() -> Self { Self::new() }
}

impl QuestionExtractor {
  pub fn new() -> Self {
    Self { cache: BoundedCache::new(QUESTION_CACHE_CAPACITY) }
  }

  pub fn extract(&self, text: &str) -> Vec<String> {
    self.cache.get_or_insert_with(&text.to_string(), || extract_questions(text))
  }
}
