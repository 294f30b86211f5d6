//! Service configuration: environment settings plus instruction templates.
//!
//! Templates can be overridden from a TOML file (PROMPTS_CONFIG_PATH). Every
//! field of `Prompts` is optional in the file; missing ones keep the default.

use std::{net::SocketAddr, path::Path, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// Which translation collaborator localizes headings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslatorKind {
  /// No collaborator: non-English requests get English headings.
  None,
  /// Reuse the completion model.
  Llm,
  /// A LibreTranslate server.
  Libre { url: String, api_key: Option<String> },
}

/// Allowed CORS origins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsOrigins {
  Any,
  List(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Settings {
  pub addr: SocketAddr,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
  pub cors: CorsOrigins,
  pub translator: TranslatorKind,
  pub prompts: Prompts,
}

impl Settings {
  /// Read settings from the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Read settings through `get`, which maps a variable name to its value.
  pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

    let api_key = get("GROQ_API_KEY").ok_or(ConfigError::MissingEnv("GROQ_API_KEY"))?;

    let port = match get("PORT") {
      Some(p) => p.trim().parse::<u16>().map_err(|e| ConfigError::Invalid { key: "PORT", message: e.to_string() })?,
      None => DEFAULT_PORT,
    };
    let timeout_secs = match get("LLM_TIMEOUT_SECS") {
      Some(t) => t
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::Invalid { key: "LLM_TIMEOUT_SECS", message: e.to_string() })?,
      None => DEFAULT_TIMEOUT_SECS,
    };

    let cors = parse_cors(&get("CORS_ALLOW_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()));

    let translator = match get("TRANSLATOR").as_deref().map(str::trim) {
      None | Some("llm") => TranslatorKind::Llm,
      Some("none") => TranslatorKind::None,
      Some("libre") => TranslatorKind::Libre {
        url: get("LIBRETRANSLATE_URL").ok_or(ConfigError::MissingEnv("LIBRETRANSLATE_URL"))?,
        api_key: get("LIBRETRANSLATE_API_KEY"),
      },
      Some(other) => {
        return Err(ConfigError::Invalid { key: "TRANSLATOR", message: format!("unknown translator '{other}'") })
      }
    };

    let prompts = get("PROMPTS_CONFIG_PATH")
      .and_then(|path| load_prompts(Path::new(&path)))
      .unwrap_or_default();

    Ok(Self {
      addr: SocketAddr::from(([0, 0, 0, 0], port)),
      api_key,
      base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
      model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
      timeout: Duration::from_secs(timeout_secs),
      cors,
      translator,
      prompts,
    })
  }
}

fn parse_cors(raw: &str) -> CorsOrigins {
  let origins: Vec<String> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
  if origins.is_empty() || origins.iter().any(|o| o == "*") {
    CorsOrigins::Any
  } else {
    CorsOrigins::List(origins)
  }
}

/// Instruction templates for each response mode.
///
/// Placeholders: `{word_count}`, `{marks}`, `{points}`, `{questions}`, `{language}`
/// and one per heading key (`{intro}`, `{concepts}`, ... `{insights}`).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub greeting_reply: String,
  pub pages_system: String,
  pub marks_system: String,
  pub teaching_system: String,
  pub points_system: String,
  pub points_user_template: String,
  pub detailed_system: String,
  pub default_system: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      greeting_reply: "Hello! I'm NexusAI, your intelligent assistant. How can I help you today?".into(),
      pages_system: "You are NexusAI, a university-level academic tutor. Provide comprehensive {word_count}-word explanation.\n\
STRUCTURE:\n\
1. INTRODUCTION: Clear definition and why it matters\n\
2. CORE CONCEPTS: Precise technical definitions and key components\n\
3. CONCRETE EXAMPLE: Specific real-world scenario\n\
4. TECHNICAL DETAILS: Relevant algorithms, protocols, frameworks\n\
5. REAL-WORLD APPLICATIONS: Specific companies/systems\n\
6. CHALLENGES/TRADE-OFFS: Fundamental limitations\n\
7. CONCLUSION: Summary of key insights\n\n\
CRITICAL RULES:\n\
- Write approximately {word_count} words\n\
- Stay focused on the topic without adding study schedules\n\
- Format as plain text with section headings in ALL CAPS\n\
- NO STUDY SCHEDULE OR TIMETABLE".into(),
      marks_system: "You are NexusAI, a university-level academic tutor. This is a SINGLE QUESTION worth {marks} marks.\n\
Provide a comprehensive, continuous essay-style answer of approximately {word_count} words.\n\n\
MANDATORY STRUCTURE (continuous essay format, NOT Q&A):\n\
1. Introduction: Define the topic, its importance, and historical context\n\
2. Need/Motivation: Explain why this topic/concept is needed and problems it solves\n\
3. Objectives: List main goals and objectives of the topic\n\
4. Components/Architecture: Explain key components and how they work together\n\
5. Terminology: Define important terms and concepts\n\
6. Working/Process: Explain how it works with step-by-step details\n\
7. Security/Technical Mechanisms: Explain technical aspects and security features\n\
8. Features: List and explain key features\n\
9. Advantages: Discuss benefits and advantages\n\
10. Limitations/Disadvantages: Discuss drawbacks and limitations\n\
11. Applications: Provide real-world use cases and applications\n\
12. Versions/Evolution: If applicable, discuss different versions or evolution\n\
13. Conclusion: Summarize key points and future outlook\n\n\
CRITICAL RULES:\n\
- Write as a CONTINUOUS ESSAY, NOT as Q&A or bullet points\n\
- Aim for approximately {word_count} words\n\
- Use clear section headings in regular format (not ALL CAPS)\n\
- Include detailed explanations with examples where relevant\n\
- Ensure smooth transitions between sections\n\
- NO ANSWER KEY, NO MARKS ALLOCATION section\n\
- Do NOT include study schedules or timetables\n\
- Write in academic, professional tone".into(),
      teaching_system: "You are NexusAI, a patient teacher. Explain simply like to a 10-year-old. \
Use short sentences, analogies, and examples. Avoid jargon completely.".into(),
      points_system: "EXAM MODE: EXACTLY {points} points per question. \
RULES: Ultra-concise answers. Each point = 5-8 words MAX. \
NO explanations. FORMAT: '1. Question text\n• Point 1.\n• Point 2.'".into(),
      points_user_template: "{points} points each:\n{questions}".into(),
      detailed_system: "You are NexusAI, a university-level academic tutor. Provide a detailed 1200-1500 word explanation written entirely in {language}.\n\
STRUCTURE (use these exact section headings):\n\
1. {intro}\n\
2. {fundamental}\n\
3. {concepts}\n\
4. {detailed}\n\
5. {examples}\n\
6. {applications}\n\
7. {advantages}\n\
8. {limitations}\n\
9. {insights}\n\
10. {conclusion}\n\n\
CRITICAL RULES:\n\
- Write approximately 1200-1500 words\n\
- Respond ONLY in {language}; do NOT mix languages within the response\n\
- Format as plain text with the section headings above\n\
- NO STUDY SCHEDULE OR TIMETABLE".into(),
      default_system: "You are NexusAI, a university-level academic tutor. Provide comprehensive 500-800 word explanations in {language} followed by a study schedule.\n\
STRUCTURE (use these exact section headings):\n\
1. {intro}: Brief definition (2-3 sentences)\n\
2. {concepts}: Key components and how they work\n\
3. {example}: One concrete real-world scenario\n\
4. {applications}: 2-3 practical use cases\n\
5. {insights}: Main takeaways\n\n\
STUDY SCHEDULE:\n\
Generate EXACTLY 14 days with topic-specific content.\n\
CRITICAL FORMAT REQUIREMENT - Use EXACTLY this format with pipe separators:\n\
Day 1|Foundational concepts|2 hours\n\
Day 2|Core principles|2 hours\n\
Day 3|Intermediate concepts|2 hours\n\
Day 4|Advanced features|2 hours\n\
Day 5|Practical applications|2 hours\n\
Day 6|Problem solving|2 hours\n\
Day 7|Review basics|2 hours\n\
Day 8|Specialized topics|2 hours\n\
Day 9|Integration|2 hours\n\
Day 10|Projects|2 hours\n\
Day 11|Optimization|2 hours\n\
Day 12|Advanced concepts|2 hours\n\
Day 13|Review practice|2 hours\n\
Day 14|Final assessment|2 hours\n\n\
CRITICAL RULES:\n\
- Explanation: 500-800 words MAX, written only in {language}\n\
- Keep the line 'STUDY SCHEDULE:' and the 'Day N|' prefix exactly as shown; topics may be in {language}\n\
- Schedule: EXACTLY 14 lines with Day|Topic|Time format\n\
- MUST use pipe separators (|) for every schedule line\n\
- NO bullet points, NO dashes, NO colons in schedule - ONLY pipes".into(),
    }
  }
}

/// Load prompt overrides from a TOML file. On any IO/parse error, logs and returns None.
pub fn load_prompts(path: &Path) -> Option<Prompts> {
  match read_prompts(path) {
    Ok(p) => {
      info!(target: "nexusai_backend", path = %path.display(), "Loaded prompt overrides (TOML)");
      Some(p)
    }
    Err(e) => {
      error!(target: "nexusai_backend", path = %path.display(), error = %e, "Failed to load prompt overrides; using defaults");
      None
    }
  }
}

fn read_prompts(path: &Path) -> Result<Prompts, ConfigError> {
  let raw = std::fs::read_to_string(path)?;
  Ok(toml::from_str::<Prompts>(&raw)?)
}
