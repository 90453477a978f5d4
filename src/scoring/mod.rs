//! Theme scoring
//!
//! Turns an answer set into per-theme totals and ranks the themes. Every
//! declared theme is present in a [`ScoreMap`] from the start, and iteration
//! always follows declaration order so ties rank deterministically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::quiz::{AnswerSet, QuestionStore};

/// Accumulated score per theme, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap {
    scores: IndexMap<String, i64>,
}

impl ScoreMap {
    /// Start every theme at zero
    pub fn zeroed<I, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scores: themes.into_iter().map(|t| (t.into(), 0)).collect(),
        }
    }

    /// Add a weight to a theme, saturating at the `i64` bounds. Unknown
    /// themes are appended after the existing ones.
    pub fn add(&mut self, theme: &str, weight: i64) {
        match self.scores.get_mut(theme) {
            Some(total) => *total = total.saturating_add(weight),
            None => {
                debug!("Score map grew with undeclared theme '{}'", theme);
                self.scores.insert(theme.to_string(), weight);
            }
        }
    }

    pub fn get(&self, theme: &str) -> Option<i64> {
        self.scores.get(theme).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(theme, score)| (theme.as_str(), *score))
    }

    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The `k` highest scoring themes.
    ///
    /// Equal scores keep their declaration order. Never returns more than
    /// `k` names or more names than the map holds.
    pub fn top(&self, k: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, &i64)> = self.scores.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(theme, _)| theme.clone())
            .collect()
    }

    /// `Theme: score` pairs joined with commas
    pub fn summary_line(&self) -> String {
        self.iter()
            .map(|(theme, score)| format!("{theme}: {score}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sum the weights of every selected choice into a fresh score map.
///
/// Unanswered questions, answers for unknown question ids and out-of-range
/// choice indexes contribute nothing.
pub fn aggregate(answers: &AnswerSet, store: &QuestionStore) -> ScoreMap {
    let mut scores = ScoreMap::zeroed(store.themes().iter().cloned());

    for question in store.questions() {
        let Some(index) = answers.get(&question.id) else {
            continue;
        };
        let Some(choice) = question.choice(index) else {
            debug!(
                "Skipping question '{}': choice {} out of range ({} choices)",
                question.id,
                index,
                question.choices.len()
            );
            continue;
        };
        trace!("Question '{}' -> '{}'", question.id, choice.label);
        for (theme, weight) in &choice.weights {
            scores.add(theme, *weight);
        }
    }

    let stale = answers
        .iter()
        .filter(|(id, _)| store.question(id).is_none())
        .count();
    if stale > 0 {
        debug!("Ignored {} answers for unknown questions", stale);
    }

    scores
}

/// Format a score line for terminal display
pub fn format_score(theme: &str, score: i64, top: &[String]) -> String {
    if top.iter().any(|t| t == theme) {
        format!("  ★ {theme}: {score}")
    } else {
        format!("  - {theme}: {score}")
    }
}
