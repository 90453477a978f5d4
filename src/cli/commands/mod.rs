//! Command implementations
//!
//! Each command lives in its own module; output shared by the report
//! producing commands is here.

pub mod score;
pub mod take;
pub mod validate;

pub use score::run_score_command;
pub use take::run_take_command;
pub use validate::run_validate_command;

use crate::config::QuizConfig;
use crate::narrative::NarrativeSource;
use crate::quiz::SessionOutcome;
use crate::scoring::format_score;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Write the report next to the configured output name and return its path
pub fn save_report(outcome: &SessionOutcome, config: &QuizConfig) -> Result<PathBuf> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;
    let path = config.output_dir.join(format!(
        "{}.{}",
        config.report_file_name,
        outcome.format.extension()
    ));
    fs::write(&path, &outcome.report)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    info!("Wrote {} byte report to {}", outcome.report.len(), path.display());
    Ok(path)
}

/// Print the score summary, guidance and where the report went
pub fn print_outcome(
    out: &mut impl Write,
    outcome: &SessionOutcome,
    report_path: &std::path::Path,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Your theme scores:")?;
    for (theme, score) in outcome.scores.iter() {
        writeln!(out, "{}", format_score(theme, score, &outcome.top_themes))?;
    }
    writeln!(out)?;
    writeln!(out, "Top themes: {}", outcome.top_themes.join(", "))?;
    writeln!(out)?;
    if outcome.narrative_source == NarrativeSource::Fallback {
        writeln!(out, "Guidance:")?;
    } else {
        writeln!(out, "Your personalized guidance:")?;
    }
    writeln!(out, "{}", outcome.narrative)?;
    writeln!(out)?;
    writeln!(out, "📄 Report saved to {}", report_path.display())?;
    if !outcome.saved {
        writeln!(
            out,
            "⚠️  Your responses could not be recorded, but your report is ready."
        )?;
    }
    Ok(())
}
