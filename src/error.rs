use thiserror::Error;

/// Everything that can go wrong during a triage run.
///
/// Only [`TriageError::Download`] and [`TriageError::Extract`] are recovered
/// locally (they end up in the record file). Everything else stops the run.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("GitHub rate limit exceeded while searching '{query}' (page {page}){}", detail(.message))]
    RateLimitExceeded {
        query: String,
        page: u32,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected contents payload for {path}: {reason}")]
    MalformedPreviewPayload { path: String, reason: String },

    #[error("{0}")]
    Download(String),

    #[error("could not extract archive: {0}")]
    Extract(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, TriageError>;
