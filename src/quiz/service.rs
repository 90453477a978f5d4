//! Completion pipeline
//!
//! Scores a finished answer set, ranks the themes, composes the narrative,
//! renders the report and records the submission. Only report rendering can
//! fail a completion; a failed log append is reported through
//! [`SessionOutcome::saved`].

use crate::error::Result;
use crate::narrative::{NarrativeComposer, NarrativeSource};
use crate::quiz::{AnswerSet, Identity, QuestionStore};
use crate::report::{ReportFormat, ReportRenderer, ReportRequest};
use crate::scoring::{aggregate, ScoreMap};
use crate::submission::{SubmissionRecord, SubmissionSink};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_TOP_K: usize = 3;

/// Result of a completed session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub scores: ScoreMap,
    pub top_themes: Vec<String>,
    pub narrative: String,
    pub narrative_source: NarrativeSource,
    pub report: Vec<u8>,
    pub format: ReportFormat,
    /// Whether the submission reached the log
    pub saved: bool,
    pub completed_at: DateTime<Local>,
}

pub struct QuizService {
    store: Arc<QuestionStore>,
    composer: NarrativeComposer,
    renderer: Box<dyn ReportRenderer>,
    log: Box<dyn SubmissionSink>,
    top_k: usize,
}

impl QuizService {
    pub fn new(
        store: Arc<QuestionStore>,
        composer: NarrativeComposer,
        renderer: Box<dyn ReportRenderer>,
        log: Box<dyn SubmissionSink>,
    ) -> Self {
        Self {
            store,
            composer,
            renderer,
            log,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn store(&self) -> &Arc<QuestionStore> {
        &self.store
    }

    pub fn format(&self) -> ReportFormat {
        self.renderer.format()
    }

    /// Scores and ranking without any side effects
    pub fn score(&self, answers: &AnswerSet) -> (ScoreMap, Vec<String>) {
        let scores = aggregate(answers, &self.store);
        let top = scores.top(self.top_k);
        (scores, top)
    }

    pub async fn complete(&self, identity: &Identity, answers: &AnswerSet) -> Result<SessionOutcome> {
        self.complete_at(identity, answers, Local::now()).await
    }

    pub async fn complete_at(
        &self,
        identity: &Identity,
        answers: &AnswerSet,
        now: DateTime<Local>,
    ) -> Result<SessionOutcome> {
        let (scores, top_themes) = self.score(answers);
        info!("Top themes: {}", top_themes.join(", "));

        let narrative = self.composer.compose(identity, &scores, &top_themes).await;

        let report = self.renderer.render(&ReportRequest {
            identity: identity.email(),
            date: now.date_naive(),
            scores: &scores,
            top_themes: &top_themes,
            narrative: &narrative.text,
        })?;

        let record = SubmissionRecord {
            timestamp: now,
            identity: identity.email().to_string(),
            scores: scores.clone(),
            top_themes: top_themes.clone(),
        };
        let saved = match self.log.append(&record) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not record submission: {}", e);
                false
            }
        };

        Ok(SessionOutcome {
            scores,
            top_themes,
            narrative: narrative.text,
            narrative_source: narrative.source,
            report,
            format: self.renderer.format(),
            saved,
            completed_at: now,
        })
    }
}
