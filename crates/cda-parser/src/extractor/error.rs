use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),
    #[error("invalid video id checksum: {0}")]
    InvalidIdentifierChecksum(String),
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },
    #[error("player data extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("player data is not valid json: {0}")]
    ParseFailed(#[from] serde_json::Error),
    #[error("player data has no video entry")]
    MissingVideoEntry,
    #[error("unsupported stream kind")]
    UnsupportedStreamKind,
    #[error("no qualities advertised")]
    EmptyQualitySet,
    #[error("missing or unknown default quality")]
    MissingDefaultQuality,
    #[error("default quality {0} is not among the advertised qualities")]
    DefaultQualityNotFound(String),
    #[error("video entry has no file token")]
    MissingStreamFile,
    #[error("failed to resolve quality {quality}: {source}")]
    QualityResolutionFailed {
        quality: String,
        #[source]
        source: Box<ExtractorError>,
    },
    #[error("http client error: {0}")]
    HttpClient(String),
}

impl ExtractorError {
    pub fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn quality_failed(quality: impl Into<String>, source: ExtractorError) -> Self {
        Self::QualityResolutionFailed {
            quality: quality.into(),
            source: Box::new(source),
        }
    }

    /// Whether repeating the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractorError::FetchFailed { .. } => true,
            ExtractorError::QualityResolutionFailed { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// The innermost cause, skipping per-quality wrappers.
    pub fn root_cause(&self) -> &ExtractorError {
        match self {
            ExtractorError::QualityResolutionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
