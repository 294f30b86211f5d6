//! NexusAI tutor backend: forwards chat conversations to a hosted language model,
//! choosing an instruction template from the latest message and turning any
//! study schedule in the reply into an HTML table.

pub mod cache;
pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod headings;
pub mod ingest;
pub mod language;
pub mod logic;
pub mod openai;
pub mod prompt;
pub mod protocol;
pub mod questions;
pub mod routes;
pub mod schedule;
pub mod state;
pub mod telemetry;
pub mod translate;
pub mod util;
