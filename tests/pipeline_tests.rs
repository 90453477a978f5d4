//! End-to-end tests of the completion pipeline through the library API

use chrono::{Local, TimeZone};
use reflection_quiz::config::QuizConfig;
use reflection_quiz::narrative::{
    fallback_text, MockTextGenerator, NarrativeComposer, NarrativeSource,
};
use reflection_quiz::quiz::{AnswerSet, Identity, QuestionStore, QuizService, QuizSession};
use reflection_quiz::report::{MarkdownRenderer, PdfRenderer, ReportFormat};
use reflection_quiz::scoring::aggregate;
use reflection_quiz::submission::CsvSubmissionLog;
use reflection_quiz::{app, Error};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Every string shown with a text operator, across all pages
fn pdf_text(pdf: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(pdf).unwrap();
    let mut texts = Vec::new();
    for id in doc.get_pages().into_values() {
        let content = lopdf::content::Content::decode(&doc.get_page_content(id).unwrap()).unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(lopdf::Object::String(bytes, _)) = op.operands.first() {
                texts.push(bytes.iter().map(|&b| char::from(b)).collect());
            }
        }
    }
    texts
}

fn builtin() -> Arc<QuestionStore> {
    Arc::new(QuestionStore::builtin().unwrap())
}

fn all_choices(index: usize) -> AnswerSet {
    (1..=15).map(|n| (format!("q{n}"), index)).collect()
}

#[test]
fn test_builtin_questions_cover_every_theme() {
    let store = builtin();
    assert_eq!(store.len(), 15);
    for theme in store.themes() {
        assert!(
            store
                .questions()
                .iter()
                .flat_map(|q| &q.choices)
                .any(|c| c.weights.contains_key(theme)),
            "theme {theme} is never weighted"
        );
    }
}

#[test]
fn test_first_choice_everywhere_favours_identity() {
    let scores = aggregate(&all_choices(0), &builtin());
    assert_eq!(scores.get("Identity"), Some(22));
    assert_eq!(scores.top(3), vec!["Identity", "Growth", "Peace"]);
}

#[test]
fn test_session_to_report_with_markdown() {
    let dir = TempDir::new().unwrap();
    let store = builtin();
    let mut session = QuizSession::new(
        store.clone(),
        Identity::new("you@example.com", true).unwrap(),
    );
    for question in store.questions() {
        session.answer(&question.id, 1).unwrap();
    }
    let (identity, answers) = session.finish().unwrap();

    let log_path = dir.path().join("responses.csv");
    let service = QuizService::new(
        store,
        NarrativeComposer::disabled(),
        Box::new(MarkdownRenderer::new().unwrap()),
        Box::new(CsvSubmissionLog::new(&log_path)),
    );
    let now = Local.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let outcome = runtime
        .block_on(service.complete_at(&identity, &answers, now))
        .unwrap();

    assert_eq!(outcome.top_themes, vec!["Connection", "Growth", "Adventure"]);
    assert_eq!(outcome.narrative, fallback_text(&outcome.top_themes));
    assert!(outcome.saved);

    let report = String::from_utf8(outcome.report).unwrap();
    assert!(report.contains("**Date:** 04 May 2026"));
    assert!(report.contains("- Connection: 16"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("2026-05-04T08:00:00,you@example.com,"));
}

#[tokio::test]
async fn test_personalized_pdf_report() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockTextGenerator::new());
    mock.add_success_response("Lean on the people around you this week.")
        .await;

    let service = QuizService::new(
        builtin(),
        NarrativeComposer::with_generator(mock.clone(), Duration::from_secs(5)),
        Box::new(PdfRenderer::new()),
        Box::new(CsvSubmissionLog::new(dir.path().join("responses.csv"))),
    );
    let identity = Identity::new("you@example.com", true).unwrap();

    let outcome = service.complete(&identity, &all_choices(1)).await.unwrap();

    assert_eq!(outcome.narrative_source, NarrativeSource::Personalized);
    assert_eq!(outcome.format, ReportFormat::Pdf);
    let texts = pdf_text(&outcome.report);
    assert!(texts.iter().any(|t| t == "Lean on the people around you this week."));
    assert!(texts.iter().any(|t| t == "Connection, Growth, Adventure"));

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .prompt
        .contains("Top 3 themes: Connection, Growth, Adventure."));
    assert!(!requests[0].prompt.contains("you@example.com"));
}

#[tokio::test]
async fn test_failed_generator_still_produces_report() {
    let mock = Arc::new(MockTextGenerator::new());
    mock.add_error_response("Rate limit exceeded").await;
    let dir = TempDir::new().unwrap();

    let service = QuizService::new(
        builtin(),
        NarrativeComposer::with_generator(mock, Duration::from_secs(5)),
        Box::new(MarkdownRenderer::new().unwrap()),
        Box::new(CsvSubmissionLog::new(dir.path().join("responses.csv"))),
    );
    let identity = Identity::new("you@example.com", true).unwrap();

    let outcome = service.complete(&identity, &all_choices(1)).await.unwrap();

    assert_eq!(outcome.narrative_source, NarrativeSource::Fallback);
    assert!(String::from_utf8(outcome.report)
        .unwrap()
        .contains("Small consistent actions beat big one-off efforts."));
}

#[test]
fn test_build_service_from_question_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("questions.json");
    std::fs::write(
        &path,
        r#"{
            "themes": ["Rest", "Play"],
            "questions": [
                {"id": "a", "text": "Evening?", "choices": [
                    {"label": "Sleep", "weights": {"Rest": 2}},
                    {"label": "Games", "weights": {"Play": 2}}
                ]}
            ]
        }"#,
    )
    .unwrap();
    let config = QuizConfig {
        questions_path: Some(path),
        submissions_path: dir.path().join("responses.csv"),
        ..QuizConfig::default()
    };

    let service = app::build_service(&config).unwrap();
    let answers: AnswerSet = [("a", 1)].into_iter().collect();
    let (scores, top) = service.score(&answers);

    assert_eq!(scores.summary_line(), "Rest: 0, Play: 2");
    assert_eq!(top, vec!["Play", "Rest"]);
}

#[test]
fn test_consent_is_required() {
    let err = Identity::new("you@example.com", false).unwrap_err();
    assert!(matches!(err, Error::Identity(_)));
}
