//! Quiz configuration
//!
//! Settings come from an optional TOML file, then environment variables,
//! then command-line flags (applied by the CLI layer).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod loader;

pub use loader::{load_config, DEFAULT_CONFIG_FILE};

use crate::report::ReportFormat;

pub const DEFAULT_REPORT_NAME: &str = "LifeMinusWork_Reflection_Report";
pub const DEFAULT_SUBMISSIONS_FILE: &str = "responses.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Question document; the built-in set is used when unset
    pub questions_path: Option<PathBuf>,
    pub submissions_path: PathBuf,
    pub output_dir: PathBuf,
    /// Report file name without extension
    pub report_file_name: String,
    pub report_format: ReportFormat,
    pub top_k: usize,
    pub personalization: PersonalizationConfig,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: None,
            submissions_path: PathBuf::from(DEFAULT_SUBMISSIONS_FILE),
            output_dir: PathBuf::from("."),
            report_file_name: DEFAULT_REPORT_NAME.to_string(),
            report_format: ReportFormat::Pdf,
            top_k: 3,
            personalization: PersonalizationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 300,
            timeout_secs: 20,
            max_retries: 1,
            retry_delay_ms: 500,
        }
    }
}

impl PersonalizationConfig {
    /// Upper bound for a whole generation, retries included
    pub fn timeout(&self) -> Duration {
        let attempts = u64::from(self.max_retries).saturating_add(1);
        let backoff_ms = self
            .retry_delay_ms
            .saturating_mul((1u64 << self.max_retries.min(16)) - 1);
        Duration::from_secs(self.timeout_secs.saturating_mul(attempts))
            .saturating_add(Duration::from_millis(backoff_ms))
    }
}

impl QuizConfig {
    pub fn merge_env_vars(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.personalization.api_key = Some(api_key);
        }

        if let Some(model) = lookup("REFLECT_MODEL") {
            self.personalization.model = model;
        }

        if let Some(api_base) = lookup("REFLECT_API_BASE") {
            self.personalization.api_base = api_base;
        }

        if let Some(path) = lookup("REFLECT_SUBMISSIONS") {
            self.submissions_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("REFLECT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Resolve relative paths against a base directory
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(path) = self.questions_path.take() {
            self.questions_path = Some(resolve(base, path));
        }
        self.submissions_path = resolve(base, std::mem::take(&mut self.submissions_path));
        self.output_dir = resolve(base, std::mem::take(&mut self.output_dir));
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.report_file_name,
            self.report_format.extension()
        ))
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
