//! Question set validation and listing

use crate::app::load_store;
use crate::config::QuizConfig;
use crate::quiz::QuestionStore;
use anyhow::Result;
use std::io::{self, Write};

pub fn run_validate_command(list: bool, config: &QuizConfig) -> Result<()> {
    let store = load_store(config)?;
    let mut out = io::stdout();
    let source = config
        .questions_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in question set".to_string());

    writeln!(
        out,
        "✅ {}: {} questions across {} themes ({})",
        source,
        store.len(),
        store.themes().len(),
        store.themes().join(", ")
    )?;
    if list {
        write_listing(&mut out, &store)?;
    }
    Ok(())
}

fn write_listing(out: &mut impl Write, store: &QuestionStore) -> io::Result<()> {
    for question in store.questions() {
        writeln!(out)?;
        writeln!(out, "{}: {}", question.id, question.text)?;
        for (index, choice) in question.choices.iter().enumerate() {
            let weights = choice
                .weights
                .iter()
                .map(|(theme, weight)| format!("{theme} {weight:+}"))
                .collect::<Vec<_>>()
                .join(", ");
            if weights.is_empty() {
                writeln!(out, "  {}) {}", index + 1, choice.label)?;
            } else {
                writeln!(out, "  {}) {}  [{}]", index + 1, choice.label, weights)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Choice, Question};

    #[test]
    fn test_listing_shows_signed_weights() {
        let store = QuestionStore::new(
            vec!["Peace".to_string(), "Growth".to_string()],
            vec![Question::new(
                "q1",
                "Pick one",
                vec![
                    Choice::new("Rest")
                        .with_weight("Peace", 2)
                        .with_weight("Growth", -1),
                    Choice::new("Nothing"),
                ],
            )],
        )
        .unwrap();

        let mut out = Vec::new();
        write_listing(&mut out, &store).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("q1: Pick one\n"));
        assert!(text.contains("  1) Rest  [Peace +2, Growth -1]\n"));
        assert!(text.contains("  2) Nothing\n"));
    }
}
