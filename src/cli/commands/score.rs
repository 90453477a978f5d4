//! Non-interactive scoring of a saved answer file

use super::{print_outcome, save_report};
use crate::app::build_service;
use crate::config::QuizConfig;
use crate::quiz::{AnswerSet, Identity};
use anyhow::Result;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

pub async fn run_score_command(
    answers_path: &Path,
    email: &str,
    consent: bool,
    config: QuizConfig,
) -> Result<()> {
    let identity = Identity::new(email, consent)?;
    let service = build_service(&config)?;
    let answers = AnswerSet::load(answers_path)?;
    debug!(
        "Loaded {} answers from {}",
        answers.len(),
        answers_path.display()
    );

    let unanswered = service
        .store()
        .questions()
        .iter()
        .filter(|q| !answers.contains(&q.id))
        .count();
    if unanswered > 0 {
        warn!("{} questions have no answer and score nothing", unanswered);
    }

    let outcome = service.complete(&identity, &answers).await?;
    let path = save_report(&outcome, &config)?;
    print_outcome(&mut io::stdout(), &outcome, &path)?;
    Ok(())
}
