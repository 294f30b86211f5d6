//! Document ingestion: split plain-text files into overlapping word windows
//! and store them as a flat JSON array (the knowledge base file).
//!
//! The chat service never reads the knowledge base back; this is a batch job.

use std::path::Path;

use tracing::{error, info, instrument, warn};

use crate::error::IngestError;

pub const CHUNK_SIZE: usize = 300;
pub const CHUNK_OVERLAP: usize = 50;

/// Split `text` into windows of `chunk_size` words starting every
/// `chunk_size - overlap` words. Trailing windows may be shorter.
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
  let words: Vec<&str> = text.split_whitespace().collect();
  let step = chunk_size.saturating_sub(overlap).max(1);
  (0..words.len())
    .step_by(step)
    .map(|start| words[start..(start + chunk_size).min(words.len())].join(" "))
    .filter(|chunk| !chunk.trim().is_empty())
    .collect()
}

/// Chunk every `*.txt` file in `documents_dir` and write the chunks to `kb_file`.
///
/// A missing directory is created and nothing is written (returns `Ok(None)`).
/// Unreadable files are logged and skipped. Returns the number of chunks written.
#[instrument(level = "info", skip_all, fields(dir = %documents_dir.display(), out = %kb_file.display()))]
pub fn ingest_dir(documents_dir: &Path, kb_file: &Path) -> Result<Option<usize>, IngestError> {
  if !documents_dir.exists() {
    std::fs::create_dir_all(documents_dir)?;
    warn!(target: "ingest", dir = %documents_dir.display(), "Created documents directory - add your .txt files there!");
    return Ok(None);
  }

  let mut files: Vec<_> = std::fs::read_dir(documents_dir)?
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
    .collect();
  files.sort();

  let mut chunks = Vec::new();
  for path in files {
    match std::fs::read_to_string(&path) {
      Ok(text) => {
        let file_chunks = split_into_chunks(&text, CHUNK_SIZE, CHUNK_OVERLAP);
        info!(target: "ingest", file = %path.display(), chunks = file_chunks.len(), "Loaded document");
        chunks.extend(file_chunks);
      }
      Err(e) => error!(target: "ingest", file = %path.display(), error = %e, "Error reading document"),
    }
  }

  let json = serde_json::to_string_pretty(&chunks)?;
  std::fs::write(kb_file, json)?;
  info!(target: "ingest", chunks = chunks.len(), "Knowledge base saved");
  Ok(Some(chunks.len()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
  }

  #[test]
  fn windows_overlap_by_fifty_words() {
    let chunks = split_into_chunks(&words(600), CHUNK_SIZE, CHUNK_OVERLAP);
    // starts at 0, 250, 500
    assert_eq!(chunks.len(), 3);
    assert!(chunks[0].starts_with("w0 ") && chunks[0].ends_with(" w299"));
    assert!(chunks[1].starts_with("w250 ") && chunks[1].ends_with(" w549"));
    assert!(chunks[2].starts_with("w500 ") && chunks[2].ends_with(" w599"));
  }

  #[test]
  fn short_and_empty_texts() {
    assert_eq!(split_into_chunks("one two three", CHUNK_SIZE, CHUNK_OVERLAP), vec!["one two three"]);
    assert!(split_into_chunks("   \n ", CHUNK_SIZE, CHUNK_OVERLAP).is_empty());
  }

  #[test]
  fn ingest_writes_flat_json_array() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), words(10)).unwrap();
    std::fs::write(dir.path().join("b.md"), "ignored").unwrap();
    let out = dir.path().join("kb.json");
    let n = ingest_dir(dir.path(), &out).unwrap();
    assert_eq!(n, Some(1));
    let stored: Vec<String> = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(stored, vec![words(10)]);
  }

  #[test]
  fn missing_directory_is_created() {
    let root = tempfile::tempdir().unwrap();
    let docs = root.path().join("documents");
    let out = root.path().join("kb.json");
    assert_eq!(ingest_dir(&docs, &out).unwrap(), None);
    assert!(docs.is_dir());
    assert!(!out.exists());
  }
}
