//! Errors specific to Maven coordinates and local repository access.

use artifact_core::{ArtifactError, BackendError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Invalid Maven coordinates '{coordinates}': {message}")]
    InvalidCoordinates { coordinates: String, message: String },

    #[error("Failed to parse POM {}: {message}", .path.display())]
    PomParse { path: PathBuf, message: String },

    #[error("Invalid local repository configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MavenError>;

impl From<MavenError> for ArtifactError {
    fn from(err: MavenError) -> Self {
        match err {
            MavenError::InvalidCoordinates {
                coordinates,
                message,
            } => Self::InvalidCoordinates {
                coordinates,
                message,
            },
            MavenError::Config(msg) => Self::Config(msg),
            MavenError::Io(e) => Self::Io(e),
            other @ MavenError::PomParse { .. } => Self::Config(other.to_string()),
        }
    }
}

impl From<MavenError> for BackendError {
    fn from(err: MavenError) -> Self {
        match err {
            MavenError::InvalidCoordinates {
                coordinates,
                message,
            } => Self::MalformedIdentifier {
                identifier: coordinates,
                message,
            },
            other => Self::Other(Box::new(other)),
        }
    }
}
