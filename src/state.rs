//! Application state shared by every request.
//!
//! This module owns:
//!   - the completion client (built once at startup, immutable afterwards)
//!   - the heading localizer and its optional translator
//!   - the memoizing classifier and question extractor
//!   - the prompts struct (from TOML or defaults)

use std::sync::Arc;
use tracing::{info, instrument};

use crate::classify::ModeClassifier;
use crate::config::{Prompts, Settings, TranslatorKind};
use crate::error::ConfigError;
use crate::headings::HeadingLocalizer;
use crate::openai::{CompletionClient, OpenAI};
use crate::questions::QuestionExtractor;
use crate::translate::{LibreTranslate, LlmTranslator, Translator};

pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
    pub headings: HeadingLocalizer,
    pub classifier: ModeClassifier,
    pub questions: QuestionExtractor,
    pub prompts: Prompts,
}

impl AppState {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        translator: Option<Arc<dyn Translator>>,
        prompts: Prompts,
    ) -> Self {
        Self {
            completion,
            headings: HeadingLocalizer::new(translator),
            classifier: ModeClassifier::new(),
            questions: QuestionExtractor::new(),
            prompts,
        }
    }

    /// Build state from settings: completion client, translator, prompts.
    #[instrument(level = "info", skip_all)]
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let openai = OpenAI::new(
            settings.api_key.clone(),
            settings.base_url.clone(),
            settings.model.clone(),
            settings.timeout,
        )
        .map_err(|e| ConfigError::Invalid { key: "LLM_BASE_URL", message: e.to_string() })?;
        info!(target: "nexusai_backend", base_url = %openai.base_url, model = %openai.model, "Completion client ready.");
        let completion: Arc<dyn CompletionClient> = Arc::new(openai);

        let translator: Option<Arc<dyn Translator>> = match &settings.translator {
            TranslatorKind::None => {
                info!(target: "nexusai_backend", "Heading translation disabled; non-English requests use English headings.");
                None
            }
            TranslatorKind::Llm => {
                info!(target: "nexusai_backend", "Heading translation via the completion model.");
                Some(Arc::new(LlmTranslator::new(completion.clone())))
            }
            TranslatorKind::Libre { url, api_key } => {
                let libre = LibreTranslate::new(url.clone(), api_key.clone(), settings.timeout)
                    .map_err(|e| ConfigError::Invalid { key: "LIBRETRANSLATE_URL", message: e.to_string() })?;
                info!(target: "nexusai_backend", %url, "Heading translation via LibreTranslate.");
                Some(Arc::new(libre))
            }
        };

        Ok(Self::new(completion, translator, settings.prompts.clone()))
    }
}
