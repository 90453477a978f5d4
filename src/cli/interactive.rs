//! Terminal quiz driver
//!
//! Reads answers line by line and writes prompts to any writer, so the
//! same code runs against a real terminal and in-memory buffers.

use crate::error::{Error, Result};
use crate::quiz::{Identity, QuizSession, CONSENT_REQUIRED};
use std::io::{BufRead, Write};
use tracing::debug;

const MAX_IDENTITY_ATTEMPTS: usize = 3;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompt and read one trimmed line; `None` at end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Collect email and consent, asking again after a refusal
    pub fn ask_identity(&mut self) -> Result<Identity> {
        writeln!(self.output, "Welcome to the Reflection Quiz.")?;
        writeln!(
            self.output,
            "Your email and answers are stored so your report can be issued."
        )?;

        for attempt in 1..=MAX_IDENTITY_ATTEMPTS {
            let Some(email) = self.ask("Email: ")? else {
                break;
            };
            let Some(reply) = self.ask("Do you consent to your responses being stored? [y/N]: ")?
            else {
                break;
            };
            let consent = matches!(reply.to_lowercase().as_str(), "y" | "yes");

            match Identity::new(&email, consent) {
                Ok(identity) => return Ok(identity),
                Err(Error::Identity(message)) => {
                    debug!("Identity attempt {} rejected", attempt);
                    writeln!(self.output, "{message}")?;
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Identity(CONSENT_REQUIRED.to_string()))
    }

    /// Ask every unanswered question in order until the session is complete
    pub fn run_session(&mut self, session: &mut QuizSession) -> Result<()> {
        let total = session.progress().total;

        while let Some(question) = session.next_unanswered().cloned() {
            let number = session.progress().answered + 1;
            writeln!(self.output)?;
            writeln!(self.output, "{number}/{total}. {}", question.text)?;
            for (index, choice) in question.choices.iter().enumerate() {
                writeln!(self.output, "  {}) {}", index + 1, choice.label)?;
            }

            let count = question.choices.len();
            let selected = loop {
                let Some(reply) = self.ask(&format!("Choose 1-{count}: "))? else {
                    return Err(Error::Incomplete(session.progress().to_string()));
                };
                match reply.parse::<usize>() {
                    Ok(n) if (1..=count).contains(&n) => break n - 1,
                    _ => writeln!(self.output, "Please enter a number between 1 and {count}.")?,
                }
            };

            session.answer(&question.id, selected)?;
            let progress = session.progress();
            if !progress.is_complete() {
                writeln!(self.output, "{progress}")?;
            }
        }

        writeln!(self.output)?;
        writeln!(self.output, "{}", session.progress())?;
        Ok(())
    }
}
