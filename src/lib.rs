//! # Reflection Quiz
//!
//! A fifteen-question reflection quiz. Every choice carries weights toward a
//! fixed set of life themes; a finished session is scored, the themes are
//! ranked, a short guidance text is composed (personalized by a language
//! model when one is configured) and a PDF or Markdown report is produced.
//! Each completed session is appended to a CSV log.
//!
//! ## Usage
//!
//! ```bash
//! reflect take [--format markdown] [--no-ai]
//! reflect score --answers answers.json --email you@example.com --consent
//! reflect validate [--list]
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging, process configuration and service assembly
//! - `cli` - Argument parsing, commands and the interactive driver
//! - `config` - `reflect.toml` and environment configuration
//! - `narrative` - Guidance text with a deterministic fallback
//! - `quiz` - Questions, answers, sessions and the completion pipeline
//! - `report` - PDF and Markdown rendering
//! - `scoring` - Theme aggregation and ranking
//! - `submission` - Append-only CSV submission log
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod narrative;
pub mod quiz;
pub mod report;
pub mod scoring;
pub mod submission;

pub use error::{Error, Result};
