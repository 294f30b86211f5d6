//! Domain models: conversation turns, response modes, languages, heading sets and schedule rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

/// One message of a conversation, as received from the client and as sent to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
  pub role: Role,
  pub content: String,
}

impl ConversationTurn {
  pub fn new(role: Role, content: impl Into<String>) -> Self {
    Self { role, content: content.into() }
  }
  pub fn system(content: impl Into<String>) -> Self { Self::new(Role::System, content) }
  pub fn user(content: impl Into<String>) -> Self { Self::new(Role::User, content) }
  pub fn assistant(content: impl Into<String>) -> Self { Self::new(Role::Assistant, content) }
}

/// Which instruction template (and generation budget) a request is served with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
  Greeting,
  Pages,
  Marks,
  Points,
  Teaching,
  DetailedNoSchedule,
  Default,
}

impl Mode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Mode::Greeting => "greeting",
      Mode::Pages => "pages",
      Mode::Marks => "marks",
      Mode::Points => "points",
      Mode::Teaching => "teaching",
      Mode::DetailedNoSchedule => "detailed_no_schedule",
      Mode::Default => "default",
    }
  }
}

impl std::fmt::Display for Mode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Parameter used when a mode does not derive its own.
pub const DEFAULT_MODE_PARAMETER: u32 = 2;

/// Outcome of classifying the latest user message.
/// `parameter` is a page count, mark count or points-per-question depending on `mode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeDecision {
  pub mode: Mode,
  pub parameter: u32,
}

impl ModeDecision {
  pub fn new(mode: Mode, parameter: u32) -> Self { Self { mode, parameter } }
  pub fn plain(mode: Mode) -> Self { Self::new(mode, DEFAULT_MODE_PARAMETER) }
}

/// Languages recognised by the script-based detector. `English` is the default language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
  Tamil,
  Hindi,
  Arabic,
  Chinese,
  Japanese,
  Korean,
  Russian,
  Telugu,
  Malayalam,
  Bengali,
  English,
}

impl Language {
  /// Language tag used on the wire and by translation services.
  pub fn tag(&self) -> &'static str {
    match self {
      Language::Tamil => "ta",
      Language::Hindi => "hi",
      Language::Arabic => "ar",
      Language::Chinese => "zh-CN",
      Language::Japanese => "ja",
      Language::Korean => "ko",
      Language::Russian => "ru",
      Language::Telugu => "te",
      Language::Malayalam => "ml",
      Language::Bengali => "bn",
      Language::English => "en",
    }
  }

  /// English display name, used inside model instructions.
  pub fn name(&self) -> &'static str {
    match self {
      Language::Tamil => "Tamil",
      Language::Hindi => "Hindi",
      Language::Arabic => "Arabic",
      Language::Chinese => "Simplified Chinese",
      Language::Japanese => "Japanese",
      Language::Korean => "Korean",
      Language::Russian => "Russian",
      Language::Telugu => "Telugu",
      Language::Malayalam => "Malayalam",
      Language::Bengali => "Bengali",
      Language::English => "English",
    }
  }

  pub fn is_default(&self) -> bool { *self == Language::English }
}

impl std::fmt::Display for Language {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.tag())
  }
}

/// Section headings of a long-form explanation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingKey {
  Intro,
  Concepts,
  Fundamental,
  Detailed,
  Example,
  Examples,
  Applications,
  Advantages,
  Limitations,
  Conclusion,
  Insights,
}

impl HeadingKey {
  pub const ALL: [HeadingKey; 11] = [
    HeadingKey::Intro,
    HeadingKey::Concepts,
    HeadingKey::Fundamental,
    HeadingKey::Detailed,
    HeadingKey::Example,
    HeadingKey::Examples,
    HeadingKey::Applications,
    HeadingKey::Advantages,
    HeadingKey::Limitations,
    HeadingKey::Conclusion,
    HeadingKey::Insights,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      HeadingKey::Intro => "intro",
      HeadingKey::Concepts => "concepts",
      HeadingKey::Fundamental => "fundamental",
      HeadingKey::Detailed => "detailed",
      HeadingKey::Example => "example",
      HeadingKey::Examples => "examples",
      HeadingKey::Applications => "applications",
      HeadingKey::Advantages => "advantages",
      HeadingKey::Limitations => "limitations",
      HeadingKey::Conclusion => "conclusion",
      HeadingKey::Insights => "insights",
    }
  }

  /// Source phrase handed to the translator.
  pub fn english_phrase(&self) -> &'static str {
    match self {
      HeadingKey::Intro => "Introduction",
      HeadingKey::Concepts => "Key Concepts",
      HeadingKey::Fundamental => "Fundamental Principles",
      HeadingKey::Detailed => "Detailed Explanation",
      HeadingKey::Example => "Example",
      HeadingKey::Examples => "Real-World Examples",
      HeadingKey::Applications => "Applications",
      HeadingKey::Advantages => "Advantages",
      HeadingKey::Limitations => "Limitations",
      HeadingKey::Conclusion => "Conclusion",
      HeadingKey::Insights => "Key Insights",
    }
  }
}

/// Localized display string for every `HeadingKey`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingSet {
  entries: BTreeMap<HeadingKey, String>,
}

impl HeadingSet {
  /// The fixed English table: every phrase upper-cased.
  pub fn english() -> Self {
    Self::from_fn(|key| key.english_phrase().to_uppercase())
  }

  /// Build a complete set by asking `f` for every key.
  pub fn from_fn(mut f: impl FnMut(HeadingKey) -> String) -> Self {
    let entries = HeadingKey::ALL.iter().map(|k| (*k, f(*k))).collect();
    Self { entries }
  }

  pub fn get(&self, key: HeadingKey) -> &str {
    self.entries.get(&key).map(String::as_str).unwrap_or_default()
  }

  pub fn len(&self) -> usize { self.entries.len() }
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (HeadingKey, &str)> {
    self.entries.iter().map(|(k, v)| (*k, v.as_str()))
  }
}

/// One parsed `(day, topic, time)` line of a study schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRow {
  pub day: String,
  pub topic: String,
  pub time: String,
}

impl ScheduleRow {
  pub fn new(day: impl Into<String>, topic: impl Into<String>, time: impl Into<String>) -> Self {
    Self { day: day.into(), topic: topic.into(), time: time.into() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn english_heading_set_is_complete_and_uppercase() {
    let set = HeadingSet::english();
    assert_eq!(set.len(), 11);
    assert_eq!(set.get(HeadingKey::Intro), "INTRODUCTION");
    assert_eq!(set.get(HeadingKey::Insights), "KEY INSIGHTS");
    assert!(set.iter().all(|(_, v)| v == v.to_uppercase()));
  }

  #[test]
  fn roles_serialize_lowercase() {
    let turn = ConversationTurn::assistant("ok");
    let json = serde_json::to_string(&turn).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    let back: ConversationTurn = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
    assert_eq!(back, ConversationTurn::user("hi"));
  }
}
