//! CLI argument structures

use crate::config::QuizConfig;
use crate::report::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Reflection quiz with theme scoring and a personal report
#[derive(Parser)]
#[command(name = "reflect")]
#[command(about = "reflect - Answer fifteen questions, see your top themes, get a report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to reflect.toml in the current directory)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Take the quiz interactively (default command)
    #[command(name = "take")]
    Take {
        #[command(flatten)]
        options: QuizOptions,
    },

    /// Score a saved answer file and write the report
    #[command(name = "score")]
    Score {
        /// JSON object mapping question ids to 0-based choice indexes
        #[arg(short = 'a', long, value_name = "FILE")]
        answers: PathBuf,

        /// Email the report is issued to
        #[arg(short = 'e', long)]
        email: String,

        /// Confirm the respondent agreed to have the responses stored
        #[arg(long)]
        consent: bool,

        #[command(flatten)]
        options: QuizOptions,
    },

    /// Check the question set and optionally list it
    #[command(name = "validate")]
    Validate {
        /// Print every question with its choices and weights
        #[arg(long)]
        list: bool,

        /// Question document to check instead of the configured one
        #[arg(short = 'q', long, value_name = "FILE")]
        questions: Option<PathBuf>,
    },
}

/// Overrides shared by the commands that produce a report
#[derive(Args, Debug, Clone, Default)]
pub struct QuizOptions {
    /// Question document to use instead of the built-in set
    #[arg(short = 'q', long, value_name = "FILE")]
    pub questions: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Report format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Number of top themes to highlight
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub top: Option<u64>,

    /// Skip personalized guidance and use the standard text
    #[arg(long)]
    pub no_ai: bool,

    /// CSV file submissions are appended to
    #[arg(long, value_name = "FILE")]
    pub submissions: Option<PathBuf>,
}

impl QuizOptions {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut QuizConfig) {
        if let Some(path) = &self.questions {
            config.questions_path = Some(path.clone());
        }
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.report_format = format;
        }
        if let Some(top) = self.top {
            config.top_k = usize::try_from(top).unwrap_or(usize::MAX);
        }
        if self.no_ai {
            config.personalization.enabled = false;
        }
        if let Some(path) = &self.submissions {
            config.submissions_path = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_arguments() {
        let cli = Cli::try_parse_from([
            "reflect",
            "-vv",
            "score",
            "--answers",
            "answers.json",
            "--email",
            "you@example.com",
            "--consent",
            "--format",
            "markdown",
            "--top",
            "2",
            "--no-ai",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Some(Commands::Score {
            answers,
            email,
            consent,
            options,
        }) = cli.command
        else {
            panic!("expected score command");
        };
        assert_eq!(answers, PathBuf::from("answers.json"));
        assert_eq!(email, "you@example.com");
        assert!(consent);

        let mut config = QuizConfig::default();
        options.apply(&mut config);
        assert_eq!(config.report_format, ReportFormat::Markdown);
        assert_eq!(config.top_k, 2);
        assert!(!config.personalization.enabled);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_top_rejected() {
        assert!(Cli::try_parse_from(["reflect", "take", "--top", "0"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["reflect", "--config", "quiz.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("quiz.toml")));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
