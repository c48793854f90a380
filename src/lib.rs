//! AI-powered GitHub repository analysis service for interview and resume
//! preparation
//!
//! The pipeline for one analysis request: fetch a bounded repository sample
//! from the GitHub REST API, select the files worth showing to the model,
//! build the prompts, call the completion endpoint with retry/backoff,
//! validate the extracted JSON against the required schema, and assemble the
//! typed result. Export endpoints render a result as DOCX or PDF.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod github;
pub mod llm;
pub mod prompts;
pub mod schema;
pub mod selector;

mod util;

pub use config::Config;
pub use error::{AnalyzerError, Result};
