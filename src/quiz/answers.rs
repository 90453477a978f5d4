//! Answer sets: question id to selected choice index

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Selections made during one session, at most one per question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    selections: IndexMap<String, usize>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, returning the one it replaced
    pub fn select(&mut self, question_id: impl Into<String>, choice_index: usize) -> Option<usize> {
        self.selections.insert(question_id.into(), choice_index)
    }

    pub fn get(&self, question_id: &str) -> Option<usize> {
        self.selections.get(question_id).copied()
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.selections.contains_key(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.selections.iter().map(|(id, index)| (id.as_str(), *index))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Parse a JSON object of `question id -> choice index`.
    ///
    /// Entries whose value is not a non-negative integer are dropped, the
    /// same way an out-of-range index is ignored during scoring.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: IndexMap<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut answers = Self::new();
        for (question_id, value) in raw {
            match value.as_u64().and_then(|v| usize::try_from(v).ok()) {
                Some(index) => {
                    answers.select(question_id, index);
                }
                None => debug!("Ignoring unusable answer for '{}': {}", question_id, value),
            }
        }
        Ok(answers)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read answers {}: {e}", path.display())))?;
        Self::from_json(&content)
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (K, usize)>>(iter: T) -> Self {
        let mut answers = Self::new();
        for (id, index) in iter {
            answers.select(id, index);
        }
        answers
    }
}
