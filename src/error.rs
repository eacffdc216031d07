//! Error types for the extraction and analysis pipeline.
//!
//! Each stage gets its own enum so callers can decide, per variant, whether a
//! failure drops a single row or ends the whole run.

use std::path::PathBuf;

/// A page could not be downloaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, timeout, or body decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status { status: u16 },
}

impl FetchError {
    /// Whether another attempt might succeed: transport failures, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status } => *status >= 500 || *status == 429,
        }
    }
}

/// Failure to turn one input row into an [`ArticleDocument`](crate::models::ArticleDocument).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("error accessing {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("no <title> element on {url}")]
    MissingTitle { url: String },

    #[error("could not find article content on {url}")]
    ContentNotFound { url: String },

    #[error("failed to write article text to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// True for the transport-level failures (bad URL, connection, HTTP status).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::Network { .. })
    }

    /// Short machine-friendly label used in logs and the JSON report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Network { .. } => "network",
            Self::MissingTitle { .. } => "missing_title",
            Self::ContentNotFound { .. } => "content_not_found",
            Self::Persist { .. } => "persist",
        }
    }
}

/// Metrics cannot be computed for a document.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("document has {words} word tokens in {sentences} sentences; ratios are undefined")]
    DegenerateDocument { words: usize, sentences: usize },
}

/// Reading or writing a CSV table failed.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input table has no {0:?} column")]
    MissingColumn(&'static str),
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid sentiment lexicon {}: {source}", path.display())]
    Lexicon {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{0}")]
    InvalidValue(String),
}
