//! Build the knowledge base file from a directory of `.txt` documents.
//!
//! Env variables:
//!   DOCUMENTS_DIR : default "../documents"
//!   KB_FILE       : default "knowledge_base.json"

use std::path::PathBuf;

use nexusai_backend::{ingest::ingest_dir, telemetry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let docs = PathBuf::from(std::env::var("DOCUMENTS_DIR").unwrap_or_else(|_| "../documents".into()));
  let out = PathBuf::from(std::env::var("KB_FILE").unwrap_or_else(|_| "knowledge_base.json".into()));

  ingest_dir(&docs, &out)?;
  Ok(())
}
