//! Script-based language detection.
//!
//! The first script (in table order) that has any character in the text wins,
//! so mixed-script input resolves deterministically. No match means English.

use crate::domain::Language;

/// Unicode block per language, checked in this order.
const SCRIPT_RANGES: &[(Language, char, char)] = &[
  (Language::Tamil, '\u{0B80}', '\u{0BFF}'),
  (Language::Hindi, '\u{0900}', '\u{097F}'),
  (Language::Arabic, '\u{0600}', '\u{06FF}'),
  (Language::Chinese, '\u{4E00}', '\u{9FFF}'),
  (Language::Japanese, '\u{3040}', '\u{30FF}'),
  (Language::Korean, '\u{AC00}', '\u{D7AF}'),
  (Language::Russian, '\u{0400}', '\u{04FF}'),
  (Language::Telugu, '\u{0C00}', '\u{0C7F}'),
  (Language::Malayalam, '\u{0D00}', '\u{0D7F}'),
  (Language::Bengali, '\u{0980}', '\u{09FF}'),
];

pub fn detect_language(text: &str) -> Language {
  SCRIPT_RANGES
    .iter()
    .find(|(_, lo, hi)| text.chars().any(|ch| (*lo..=*hi).contains(&ch)))
    .map(|(lang, _, _)| *lang)
    .unwrap_or(Language::English)
}
