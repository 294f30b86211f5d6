//! Study-schedule extraction and table rendering.
//!
//! The model is asked to append a pipe-delimited schedule to its explanation.
//! This module finds where that schedule starts, parses whatever rows it can
//! (pipe rows or free-form "Day N ... 2 hours" lines, in several languages),
//! and swaps the raw schedule text for an HTML table. Text without a
//! recognisable schedule, or with no parsable rows, is returned unchanged.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::ScheduleRow;
use crate::util::{char_prefix, escape_html};

/// Marker lines, longest first so "STUDY SCHEDULE:" wins over "Schedule:".
const MARKERS: &[&str] = &[
  "STUDY SCHEDULE:",
  "Study Schedule:",
  "Study schedule:",
  "STUDY PLAN:",
  "Study Plan:",
  "SCHEDULE:",
  "Schedule:",
  "படிப்பு அட்டவணை:",
  "அட்டவணை:",
  "अध्ययन कार्यक्रम:",
  "अध्ययन योजना:",
  "جدول الدراسة:",
  "学习计划：",
  "学习计划:",
  "学习时间表：",
  "学習スケジュール：",
  "学習スケジュール:",
  "학습 일정:",
  "학습 계획:",
  "ПЛАН ОБУЧЕНИЯ:",
  "План обучения:",
  "Расписание:",
  "అధ్యయన ప్రణాళిక:",
  "പഠന പദ്ധതി:",
  "অধ্যয়ন পরিকল্পনা:",
  "অধ্যয়নের সময়সূচী:",
];

/// Lowercased fragments of header/separator lines inside a schedule block.
const BOILERPLATE: &[&str] = &["---", "===", "schedule:", "study schedule:", "study plan:"];

const DEFAULT_TIME: &str = "2 hours";
const TITLE_CHARS: usize = 50;

static DAY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(?i)(?:\bday\s*\d+",
    r"|\bநாள்\s*\d+",
    r"|\bदिन\s*\d+",
    r"|\bاليوم\s*\d+",
    r"|第\s*\d+\s*天",
    r"|\d+\s*日目",
    r"|\d+\s*일차",
    r"|\bдень\s*\d+",
    r"|\bరోజు\s*\d+",
    r"|\bദിവസം\s*\d+",
    r"|\bদিন\s*\d+)",
  ))
  .expect("day regex")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(?i)\d+(?:\.\d+)?\s*(?:hours?|hrs?|h\b",
    r"|மணி\S*",
    r"|घंटे|घंटा",
    r"|ساعات|ساعة",
    r"|个?小时",
    r"|時間",
    r"|시간",
    r"|часа|часов|час",
    r"|గంటలు|గంట",
    r"|മണിക്കൂർ",
    r"|ঘণ্টা)",
  ))
  .expect("duration regex")
});

/// Pull a marker split back to the start of its line when the text before it
/// on that line is a heading qualifier ("14-Day ", "**") rather than a sentence.
fn marker_line_start(text: &str, idx: usize) -> usize {
  let start = text[..idx].rfind('\n').map_or(0, |i| i + 1);
  if text[start..idx].trim_end().ends_with(['.', '!', '?']) { idx } else { start }
}

/// Byte offset where the schedule block starts, if any.
fn find_split(text: &str) -> Option<usize> {
  if let Some(idx) = MARKERS.iter().find_map(|m| text.find(m)) {
    return Some(marker_line_start(text, idx));
  }
  let mut offset = 0;
  for line in text.split_inclusive('\n') {
    if DAY.is_match(line) {
      return Some(offset);
    }
    offset += line.len();
  }
  None
}

fn is_boilerplate(line: &str) -> bool {
  let lower = line.to_lowercase();
  if BOILERPLATE.iter().any(|b| lower.contains(b)) || MARKERS.iter().any(|m| line.contains(m)) {
    return true;
  }
  let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
  compact.trim_matches('|') == "day|topic|time"
}

const SEPARATORS: &[char] = &[' ', '-', ':', '|', '–', '—'];

fn parse_line(line: &str) -> Option<ScheduleRow> {
  if line.contains('|') {
    let mut parts: Vec<&str> = line.split('|').map(str::trim).collect();
    // Markdown rows carry one outer pipe on each side; a trailing empty cell
    // on a plain row is a real (empty) time column.
    if line.starts_with('|') {
      parts.remove(0);
      if line.ends_with('|') && parts.len() > 1 {
        parts.pop();
      }
    }
    return match parts.as_slice() {
      [day, topic, time, ..] if !day.is_empty() && !topic.is_empty() => Some(ScheduleRow::new(*day, *topic, *time)),
      _ => None,
    };
  }

  let day = DAY.find(line)?;
  let remaining = line[day.end()..].trim();
  let (topic, time) = match DURATION.find(remaining) {
    Some(d) => (remaining[..d.start()].trim_matches(SEPARATORS), d.as_str()),
    None => (remaining.trim_matches(SEPARATORS), DEFAULT_TIME),
  };
  (topic.chars().count() > 3).then(|| ScheduleRow::new(day.as_str(), topic, time))
}

/// Parse schedule rows out of a schedule block, one per line.
pub fn parse_rows(schedule_text: &str) -> Vec<ScheduleRow> {
  schedule_text
    .lines()
    .map(str::trim)
    .filter(|line| line.chars().count() >= 5 && !is_boilerplate(line))
    .filter_map(parse_line)
    .collect()
}

/// Split `text` into (explanation, rows) when a schedule is present and parsable.
pub fn extract_schedule(text: &str) -> Option<(&str, Vec<ScheduleRow>)> {
  let split = find_split(text)?;
  let rows = parse_rows(&text[split..]);
  if rows.is_empty() {
    return None;
  }
  Some((text[..split].trim(), rows))
}

/// Render rows as a striped HTML table titled after the user's request.
pub fn render_table(rows: &[ScheduleRow], topic: &str) -> String {
  if rows.is_empty() {
    return String::new();
  }
  let body: String = rows
    .iter()
    .enumerate()
    .map(|(i, row)| {
      let bg = if i % 2 == 0 { "rgba(255, 255, 255, 0.05)" } else { "rgba(255, 255, 255, 0.1)" };
      let cell = |s: &str| {
        format!(
          "<td style=\"border: 1px solid rgba(255, 255, 255, 0.2); padding: 10px; color: white;\">{}</td>\n",
          escape_html(s)
        )
      };
      format!(
        "<tr style=\"background-color: {bg};\">\n{}{}{}</tr>\n",
        cell(&row.day),
        cell(&row.topic),
        cell(&row.time)
      )
    })
    .collect();

  let th = |label: &str| {
    format!(
      "<th style=\"border: 1px solid rgba(255, 255, 255, 0.3); padding: 12px; text-align: left; font-weight: 600; color: white;\">{label}</th>\n"
    )
  };

  format!(
    "<div style=\"margin: 20px 0;\">\n\
<h3 style=\"font-family: Arial, sans-serif; color: white; margin-bottom: 15px;\">\n\
Study Plan: {title} ({count} days, 2 hours/day)\n\
</h3>\n\
<table style=\"width: 100%; border-collapse: collapse; font-family: Arial, sans-serif; background-color: transparent;\">\n\
<thead>\n\
<tr style=\"background-color: rgba(68, 114, 196, 0.3); color: white;\">\n\
{day}{topic}{time}</tr>\n\
</thead>\n\
<tbody>\n\
{body}</tbody>\n\
</table>\n\
</div>",
    title = escape_html(topic),
    count = rows.len(),
    day = th("Day"),
    topic = th("Topic"),
    time = th("Time"),
    body = body,
  )
}

/// Replace the schedule section of `response` with a rendered table.
/// Returns `response` unchanged when no schedule rows can be found.
#[instrument(level = "debug", skip(response, user_message), fields(response_len = response.len()))]
pub fn replace_schedule(response: &str, user_message: &str) -> String {
  match extract_schedule(response) {
    Some((explanation, rows)) => {
      debug!(target: "chat", rows = rows.len(), "Schedule rendered as table");
      let table = render_table(&rows, char_prefix(user_message, TITLE_CHARS));
      format!("{explanation}\n\n{table}")
    }
    None => {
      debug!(target: "chat", "No schedule rows found; response left unchanged");
      response.to_string()
    }
  }
}
