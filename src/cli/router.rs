//! Command routing

use crate::app::AppConfig;
use crate::cli::args::{Commands, QuizOptions};
use crate::cli::commands::*;
use crate::config::{load_config, QuizConfig};
use anyhow::Result;
use std::path::Path;

/// Execute a CLI command; no subcommand means `take` with defaults
pub async fn execute_command(
    command: Option<Commands>,
    config_path: Option<&Path>,
    app: &AppConfig,
) -> Result<()> {
    let load = |options: &QuizOptions| -> Result<QuizConfig> {
        let mut config = load_config(config_path, &app.working_dir)?;
        options.apply(&mut config);
        Ok(config)
    };

    match command {
        Some(Commands::Take { options }) => run_take_command(load(&options)?).await,
        Some(Commands::Score {
            answers,
            email,
            consent,
            options,
        }) => run_score_command(&answers, &email, consent, load(&options)?).await,
        Some(Commands::Validate { list, questions }) => {
            let options = QuizOptions {
                questions,
                ..QuizOptions::default()
            };
            run_validate_command(list, &load(&options)?)
        }
        None => run_take_command(load(&QuizOptions::default())?).await,
    }
}
