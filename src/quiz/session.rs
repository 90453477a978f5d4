//! Per-user quiz session
//!
//! A session is opened only for a consenting respondent and collects one
//! answer per question. It can be finished once every question has an
//! answer; the resulting answer set is handed to [`super::QuizService`].

use crate::error::{Error, Result};
use crate::quiz::{AnswerSet, Question, QuestionStore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const CONSENT_REQUIRED: &str = "Please enter your email and give consent to continue.";

/// Who the report is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    email: String,
}

impl Identity {
    /// Accept a respondent only with a non-empty email and explicit consent
    pub fn new(email: &str, consent: bool) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || !consent {
            return Err(Error::Identity(CONSENT_REQUIRED.to_string()));
        }
        Ok(Self {
            email: email.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Answered vs total questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            write!(f, "All {} questions answered.", self.total)
        } else {
            write!(
                f,
                "Answered {} of {} questions. Keep going!",
                self.answered, self.total
            )
        }
    }
}

pub struct QuizSession {
    store: Arc<QuestionStore>,
    identity: Identity,
    answers: AnswerSet,
}

impl QuizSession {
    pub fn new(store: Arc<QuestionStore>, identity: Identity) -> Self {
        debug!("Opened quiz session with {} questions", store.len());
        Self {
            store,
            identity,
            answers: AnswerSet::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Record an answer after checking it against the question set
    pub fn answer(&mut self, question_id: &str, choice_index: usize) -> Result<()> {
        let question = self
            .store
            .question(question_id)
            .ok_or_else(|| Error::InvalidAnswer(format!("unknown question '{question_id}'")))?;
        if question.choice(choice_index).is_none() {
            return Err(Error::InvalidAnswer(format!(
                "question '{}' has {} choices, got index {}",
                question_id,
                question.choices.len(),
                choice_index
            )));
        }
        self.answers.select(question_id, choice_index);
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        let answered = self
            .store
            .questions()
            .iter()
            .filter(|q| self.answers.contains(&q.id))
            .count();
        Progress {
            answered,
            total: self.store.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// First question, in store order, that still needs an answer
    pub fn next_unanswered(&self) -> Option<&Question> {
        self.store
            .questions()
            .iter()
            .find(|q| !self.answers.contains(&q.id))
    }

    /// Close the session once every question has an answer
    pub fn finish(self) -> Result<(Identity, AnswerSet)> {
        let progress = self.progress();
        if !progress.is_complete() {
            return Err(Error::Incomplete(progress.to_string()));
        }
        Ok((self.identity, self.answers))
    }
}
