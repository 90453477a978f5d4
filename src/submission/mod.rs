//! Append-only submission log
//!
//! One CSV row per completed session: timestamp, email, scores and top
//! themes, the last two as JSON. Rows are never rewritten or read back.
//! Appends hold an exclusive file lock, so several processes may share one
//! log and the header is still written exactly once.

use crate::error::Result;
use crate::scoring::ScoreMap;
use chrono::{DateTime, Local};
use fs4::FileExt;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub const CSV_HEADER: [&str; 4] = ["timestamp", "email", "scores", "top3"];

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub timestamp: DateTime<Local>,
    pub identity: String,
    pub scores: ScoreMap,
    pub top_themes: Vec<String>,
}

impl SubmissionRecord {
    /// Timestamp as written to the log, to the second
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

pub trait SubmissionSink: Send + Sync {
    fn append(&self, record: &SubmissionRecord) -> Result<()>;
}

/// CSV file sink; rows are written with a single append each
pub struct CsvSubmissionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_row(record: &SubmissionRecord, with_header: bool) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if with_header {
            writer.write_record(CSV_HEADER)?;
        }
        writer.write_record([
            record.timestamp_string(),
            record.identity.clone(),
            serde_json::to_string(&record.scores)?,
            serde_json::to_string(&record.top_themes)?,
        ])?;
        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

impl SubmissionSink for CsvSubmissionLog {
    fn append(&self, record: &SubmissionRecord) -> Result<()> {
        // Poisoning only means another append panicked; the file is still usable
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Released when `file` is dropped
        FileExt::lock_exclusive(&file)?;
        let needs_header = file.metadata()?.len() == 0;

        let row = Self::encode_row(record, needs_header)?;
        file.write_all(&row)?;
        file.flush()?;

        debug!("Appended submission to {}", self.path.display());
        Ok(())
    }
}
