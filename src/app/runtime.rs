//! Service assembly
//!
//! Wires a [`QuizService`] from loaded configuration. A broken question
//! document is fatal here; a missing API key only disables personalization.

use crate::config::QuizConfig;
use crate::error::Result;
use crate::narrative::NarrativeComposer;
use crate::quiz::{QuestionStore, QuizService};
use crate::report::renderer_for;
use crate::submission::CsvSubmissionLog;
use std::sync::Arc;
use tracing::{debug, info};

/// Question set named by the configuration, or the built-in one
pub fn load_store(config: &QuizConfig) -> Result<Arc<QuestionStore>> {
    let store = match &config.questions_path {
        Some(path) => QuestionStore::load(path)?,
        None => {
            debug!("Using built-in question set");
            QuestionStore::builtin()?
        }
    };
    info!(
        "{} questions across {} themes",
        store.len(),
        store.themes().len()
    );
    Ok(Arc::new(store))
}

pub fn build_service(config: &QuizConfig) -> Result<QuizService> {
    let store = load_store(config)?;
    let composer = NarrativeComposer::from_config(&config.personalization);
    let renderer = renderer_for(config.report_format)?;
    let log = CsvSubmissionLog::new(&config.submissions_path);
    debug!("Submissions go to {}", config.submissions_path.display());

    Ok(QuizService::new(store, composer, renderer, Box::new(log)).with_top_k(config.top_k))
}
