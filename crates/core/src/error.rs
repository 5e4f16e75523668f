//! Unified error types for the gallery scraper.
//!
//! Ordinary network and HTTP failures are not errors: the fetcher reports them
//! as empty outcomes. What ends up here is either structural (the markup no
//! longer looks like the gallery) or fatal (disk, CSV, rate limiting).

use std::path::PathBuf;

use crate::config::ConfigError;

/// Unified error type for the gallery scraper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem operation failed.
    #[error("IO_ERROR: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger CSV could not be read or written.
    #[error("CSV_ERROR: {0}")]
    Csv(#[from] csv::Error),

    /// Ledger contents violate an invariant.
    #[error("LEDGER_ERROR: {0}")]
    Ledger(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// An element the page schema requires is absent from the document.
    #[error("MISSING_ELEMENT: {field}")]
    MissingElement { field: &'static str },

    /// A required element is present but its contents are unusable.
    #[error("MALFORMED_ELEMENT: {field}: {reason}")]
    MalformedElement { field: &'static str, reason: String },

    /// The server asked us to back off; the run must stop.
    #[error("status_code={status} Too Many Requests")]
    RateLimited { status: u16 },

    /// HTTP client could not be constructed.
    #[error("HTTP_ERROR: {0}")]
    HttpClient(String),

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Wrap an [`std::io::Error`] with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Whether this error describes a page whose markup lacks a required
    /// element or carries one that cannot be used.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::MissingElement { .. } | Error::MalformedElement { .. })
    }
}
