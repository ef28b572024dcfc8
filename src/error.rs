use thiserror::Error;

/// Failures of the upstream collaborators (forecast fetch, geocoding).
/// These surface before a bulletin is composed; the engine itself never fails.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    NotFound(String),
}
