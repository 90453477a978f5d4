//! Questions, answers and the quiz session lifecycle

pub mod answers;
pub mod questions;
pub mod service;
pub mod session;

pub use answers::AnswerSet;
pub use questions::{Choice, Question, QuestionStore};
pub use service::{QuizService, SessionOutcome, DEFAULT_TOP_K};
pub use session::{Identity, Progress, QuizSession, CONSENT_REQUIRED};
