use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid question data: {0}")]
    QuestionData(String),

    #[error("{0}")]
    Identity(String),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("Session incomplete: {0}")]
    Incomplete(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("External API error: {0}")]
    External(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Process exit code used when this error ends the program
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Identity(_) | Error::InvalidAnswer(_) | Error::Incomplete(_) => 2,
            Error::QuestionData(_) => 3,
            _ => 1,
        }
    }

    /// Whether a retry has a reasonable chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Request(e) => e.is_timeout() || e.is_connect(),
            Error::External(msg) => {
                msg.contains("Rate limit") || msg.contains("timeout") || msg.contains("connection")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
