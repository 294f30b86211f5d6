//! Localized section headings for long-form explanations.
//!
//! `HeadingLocalizer::headings` is total: it always returns all eleven keys.
//! English is returned verbatim; other languages are translated phrase by
//! phrase, and any phrase that fails falls back to its English form.

use std::{collections::HashMap, sync::Arc};

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::domain::{HeadingKey, HeadingSet, Language};
use crate::error::TranslateError;
use crate::translate::Translator;

pub struct HeadingLocalizer {
  translator: Option<Arc<dyn Translator>>,
  cache: RwLock<HashMap<Language, HeadingSet>>,
}

impl HeadingLocalizer {
  pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
    Self { translator, cache: RwLock::new(HashMap::new()) }
  }

  #[instrument(level = "info", skip(self), fields(%lang))]
  pub async fn headings(&self, lang: Language) -> HeadingSet {
    if lang.is_default() {
      return HeadingSet::english();
    }
    let Some(translator) = &self.translator else {
      debug!(target: "chat", "No translator configured; using English headings");
      return HeadingSet::english();
    };

    if let Some(hit) = self.cache.read().await.get(&lang).cloned() {
      return hit;
    }

    // Probe with the first phrase: an unreachable service skips the other ten calls.
    let [first, rest @ ..] = HeadingKey::ALL;
    let probe = translator.translate(first.english_phrase(), Language::English, lang).await;
    if let Err(TranslateError::Unavailable(reason)) = &probe {
      warn!(target: "chat", %lang, %reason, "Translator unavailable; using English headings");
      return HeadingSet::english();
    }

    let others = join_all(
      rest.iter().map(|key| translator.translate(key.english_phrase(), Language::English, lang)),
    )
    .await;

    let mut translated: HashMap<HeadingKey, String> = HashMap::new();
    let mut failures = 0usize;
    for (key, result) in std::iter::once((first, probe)).chain(rest.iter().copied().zip(others)) {
      match result {
        Ok(text) => {
          translated.insert(key, text.to_uppercase());
        }
        Err(e) => {
          failures += 1;
          debug!(target: "chat", %lang, key = key.as_str(), error = %e, "Heading translation failed; using English");
        }
      }
    }

    let set = HeadingSet::from_fn(|key| {
      translated.remove(&key).unwrap_or_else(|| key.english_phrase().to_uppercase())
    });

    if failures == 0 {
      self.cache.write().await.insert(lang, set.clone());
      info!(target: "chat", %lang, "Cached localized headings");
    } else {
      warn!(target: "chat", %lang, failures, "Some headings fell back to English");
    }
    set
  }
}
