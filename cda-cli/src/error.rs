use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extractor error: {0}")]
    Extractor(#[from] cda_parser::extractor::ExtractorError),

    #[error("No URL given, pass one with --url")]
    MissingUrl,

    #[error("Invalid quality filter: {0}")]
    InvalidFilter(String),
}

impl CliError {
    pub fn no_matching_quality(filter: &str) -> Self {
        Self::InvalidFilter(format!("no stream matches quality {filter}"))
    }

    /// Whether running the same command again could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CliError::Extractor(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Advice printed after the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        if self.is_transient() {
            Some("the failure looks temporary, try again or raise --retries")
        } else {
            None
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
