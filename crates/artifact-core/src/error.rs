//! Errors for artifact resolution.
//!
//! Two layers: [`BackendError`] is what a resolution backend reports,
//! [`ArtifactError`] is what callers of the handler see. A backend failure
//! always reaches the caller as [`ArtifactError::Resolution`] with the
//! original [`BackendError`] kept as its source.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a [`ResolutionBackend`](crate::ResolutionBackend).
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("artifact '{identifier}' not found")]
    NotFound { identifier: String },

    #[error("malformed artifact identifier '{identifier}': {message}")]
    MalformedIdentifier { identifier: String, message: String },

    #[error("version conflict while resolving '{identifier}': {message}")]
    Conflict { identifier: String, message: String },

    #[error("repository failure while resolving '{identifier}': {source}")]
    Repository {
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Other(#[from] BoxError),
}

impl BackendError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    pub fn repository(
        identifier: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Repository {
            identifier: identifier.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors surfaced by the artifact handler and its configuration.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to resolve '{identifier}': {source}")]
    Resolution {
        identifier: String,
        #[source]
        source: BackendError,
    },

    #[error("invalid artifact coordinates '{coordinates}': {message}")]
    InvalidCoordinates {
        coordinates: String,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtifactError {
    /// The backend failure behind a [`ArtifactError::Resolution`].
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArtifactError>;
