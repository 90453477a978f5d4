//! Interactive quiz

use super::{print_outcome, save_report};
use crate::app::build_service;
use crate::cli::interactive::Prompter;
use crate::config::QuizConfig;
use crate::quiz::QuizSession;
use anyhow::Result;
use std::io;

pub async fn run_take_command(config: QuizConfig) -> Result<()> {
    let service = build_service(&config)?;

    let (identity, answers) = {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        let identity = prompter.ask_identity()?;
        let mut session = QuizSession::new(service.store().clone(), identity);
        prompter.run_session(&mut session)?;
        session.finish()?
    };

    println!("Preparing your report...");
    let outcome = service.complete(&identity, &answers).await?;
    let path = save_report(&outcome, &config)?;
    print_outcome(&mut io::stdout(), &outcome, &path)?;
    Ok(())
}
