//! Question store
//!
//! Holds the fixed question set together with the ordered list of declared
//! themes. The store is validated when it is built, so every weight in every
//! choice is guaranteed to reference a declared theme.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_QUESTIONS: &str = include_str!("default_questions.json");

/// Largest absolute weight a choice may carry
pub const MAX_WEIGHT: i64 = 1_000_000;

/// A selectable answer and the theme weights it contributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    /// Sparse theme weights; themes that are absent contribute nothing
    #[serde(default)]
    pub weights: IndexMap<String, i64>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            weights: IndexMap::new(),
        }
    }

    pub fn with_weight(mut self, theme: impl Into<String>, weight: i64) -> Self {
        self.weights.insert(theme.into(), weight);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices,
        }
    }

    /// Resolve a zero-based choice index
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionDocument {
    themes: Vec<String>,
    questions: Vec<Question>,
}

/// Immutable question set shared by every session of a process
#[derive(Debug, Clone)]
pub struct QuestionStore {
    themes: Vec<String>,
    questions: Vec<Question>,
}

impl QuestionStore {
    /// Build a validated store
    pub fn new(themes: Vec<String>, questions: Vec<Question>) -> Result<Self> {
        validate(&themes, &questions)?;
        Ok(Self { themes, questions })
    }

    /// Build a store without validation.
    ///
    /// Scoring against such a store still works: weights for undeclared
    /// themes are appended to the score map after the declared ones.
    pub fn unvalidated(themes: Vec<String>, questions: Vec<Question>) -> Self {
        Self { themes, questions }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let document: QuestionDocument = serde_json::from_str(content)
            .map_err(|e| Error::QuestionData(format!("malformed question document: {e}")))?;
        Self::new(document.themes, document.questions)
    }

    /// Load and validate a question document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::QuestionData(format!("cannot read {}: {e}", path.display()))
        })?;
        let store = Self::from_json(&content)?;
        info!(
            "Loaded {} questions over {} themes from {}",
            store.len(),
            store.themes.len(),
            path.display()
        );
        Ok(store)
    }

    /// The fifteen-question set compiled into the binary
    pub fn builtin() -> Result<Self> {
        let store = Self::from_json(BUILTIN_QUESTIONS)?;
        debug!("Using built-in question set ({} questions)", store.len());
        Ok(store)
    }

    /// Declared themes in declaration order
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate(themes: &[String], questions: &[Question]) -> Result<()> {
    if themes.is_empty() {
        return Err(Error::QuestionData("no themes declared".to_string()));
    }

    let mut declared = HashSet::new();
    for theme in themes {
        if theme.trim().is_empty() {
            return Err(Error::QuestionData("theme names must not be empty".to_string()));
        }
        if !declared.insert(theme.as_str()) {
            return Err(Error::QuestionData(format!("theme '{theme}' declared twice")));
        }
    }

    if questions.is_empty() {
        return Err(Error::QuestionData("no questions defined".to_string()));
    }

    let mut ids = HashSet::new();
    for question in questions {
        if question.id.trim().is_empty() {
            return Err(Error::QuestionData("question ids must not be empty".to_string()));
        }
        if !ids.insert(question.id.as_str()) {
            return Err(Error::QuestionData(format!(
                "question id '{}' is not unique",
                question.id
            )));
        }
        if question.text.trim().is_empty() {
            return Err(Error::QuestionData(format!(
                "question '{}' has no prompt text",
                question.id
            )));
        }
        if question.choices.is_empty() {
            return Err(Error::QuestionData(format!(
                "question '{}' has no choices",
                question.id
            )));
        }
        for (index, choice) in question.choices.iter().enumerate() {
            if choice.label.trim().is_empty() {
                return Err(Error::QuestionData(format!(
                    "choice {} of question '{}' has no label",
                    index + 1,
                    question.id
                )));
            }
            if let Some(theme) = choice.weights.keys().find(|t| !declared.contains(t.as_str())) {
                return Err(Error::QuestionData(format!(
                    "choice {} of question '{}' references undeclared theme '{theme}'",
                    index + 1,
                    question.id
                )));
            }
            if let Some((theme, weight)) = choice
                .weights
                .iter()
                .find(|(_, w)| w.unsigned_abs() > MAX_WEIGHT.unsigned_abs())
            {
                return Err(Error::QuestionData(format!(
                    "choice {} of question '{}' gives '{theme}' weight {weight}, limit is ±{MAX_WEIGHT}",
                    index + 1,
                    question.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_store_is_valid() {
        let store = QuestionStore::builtin().unwrap();
        assert_eq!(store.len(), 15);
        assert_eq!(
            store.themes(),
            &themes(&[
                "Identity",
                "Growth",
                "Connection",
                "Peace",
                "Adventure",
                "Contribution"
            ])
        );
        assert!(store.question("q15").is_some());
    }

    #[test]
    fn test_from_json_preserves_weight_order() {
        let store = QuestionStore::from_json(
            r#"{
                "themes": ["Identity", "Growth"],
                "questions": [{
                    "id": "q1",
                    "text": "Pick one",
                    "choices": [
                        { "label": "A", "weights": { "Growth": 1, "Identity": 2 } },
                        { "label": "B" }
                    ]
                }]
            }"#,
        )
        .unwrap();

        let question = store.question("q1").unwrap();
        let keys: Vec<_> = question.choices[0].weights.keys().cloned().collect();
        assert_eq!(keys, vec!["Growth", "Identity"]);
        assert!(question.choices[1].weights.is_empty());
        assert!(question.choice(2).is_none());
    }

    #[test]
    fn test_undeclared_theme_rejected() {
        let questions = vec![Question::new(
            "q1",
            "Pick one",
            vec![Choice::new("A").with_weight("Wanderlust", 2)],
        )];
        let err = QuestionStore::new(themes(&["Identity"]), questions).unwrap_err();
        assert!(matches!(err, Error::QuestionData(_)));
        assert!(err.to_string().contains("Wanderlust"));
    }

    #[test]
    fn test_duplicate_theme_rejected() {
        let questions = vec![Question::new("q1", "Pick", vec![Choice::new("A")])];
        let err = QuestionStore::new(themes(&["Peace", "Peace"]), questions).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_duplicate_question_id_rejected() {
        let questions = vec![
            Question::new("q1", "First", vec![Choice::new("A")]),
            Question::new("q1", "Second", vec![Choice::new("B")]),
        ];
        let err = QuestionStore::new(themes(&["Peace"]), questions).unwrap_err();
        assert!(err.to_string().contains("not unique"));
    }

    #[test]
    fn test_oversized_weight_rejected() {
        let err = QuestionStore::from_json(&format!(
            r#"{{
                "themes": ["Identity"],
                "questions": [
                    {{"id": "q1", "text": "One", "choices": [{{"label": "A", "weights": {{"Identity": {}}}}}]}},
                    {{"id": "q2", "text": "Two", "choices": [{{"label": "B", "weights": {{"Identity": 1}}}}]}}
                ]
            }}"#,
            i64::MAX
        ))
        .unwrap_err();
        assert!(matches!(err, Error::QuestionData(_)));
        assert!(err.to_string().contains("limit"));

        let questions = vec![Question::new(
            "q1",
            "Edge",
            vec![
                Choice::new("Up").with_weight("Peace", MAX_WEIGHT),
                Choice::new("Down").with_weight("Peace", -MAX_WEIGHT),
            ],
        )];
        assert!(QuestionStore::new(themes(&["Peace"]), questions).is_ok());
    }

    #[test]
    fn test_question_without_choices_rejected() {
        let questions = vec![Question::new("q1", "Empty", Vec::new())];
        let err = QuestionStore::new(themes(&["Peace"]), questions).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn test_malformed_json_is_question_data_error() {
        let err = QuestionStore::from_json("{ \"themes\": [").unwrap_err();
        assert!(matches!(err, Error::QuestionData(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuestionStore::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::QuestionData(_)));
    }

    #[test]
    fn test_unvalidated_keeps_undeclared_themes() {
        let questions = vec![Question::new(
            "q1",
            "Pick",
            vec![Choice::new("A").with_weight("Other", 1)],
        )];
        let store = QuestionStore::unvalidated(themes(&["Peace"]), questions);
        assert_eq!(store.len(), 1);
    }
}
