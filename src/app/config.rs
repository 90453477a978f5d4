//! Process configuration
//!
//! Settings that exist before any quiz configuration is read.

use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Directory relative paths and `reflect.toml` are looked up in
    pub working_dir: PathBuf,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Result<Self> {
        let working_dir = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?;

        Ok(Self {
            verbose,
            working_dir,
        })
    }

    /// Log filter derived from verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn,reflection_quiz=info",
            1 => "info,reflection_quiz=debug",
            2 => "debug,reflection_quiz=trace",
            _ => "trace,hyper=debug,reqwest=debug",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("."),
        }
    }
}
