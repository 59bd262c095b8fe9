use crate::error::BackendError;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolution backend interface.
///
/// A backend turns an external artifact identifier into the local files that
/// make up the artifact (and, if the backend resolves transitively, its
/// dependencies). It owns everything the handler does not: repository
/// layout, metadata, version selection, downloads, caching.
///
/// Backends are shared behind `Arc` and may be called concurrently. A
/// backend that cannot tolerate that must serialize internally.
///
/// # Examples
///
/// ```
/// use artifact_core::{BackendError, ResolutionBackend};
/// use async_trait::async_trait;
/// use std::any::Any;
/// use std::path::PathBuf;
///
/// struct FixedBackend;
///
/// #[async_trait]
/// impl ResolutionBackend for FixedBackend {
///     async fn resolve(&self, identifier: &str) -> Result<Vec<PathBuf>, BackendError> {
///         match identifier {
///             "g:a:1.0" => Ok(vec![PathBuf::from("/repo/a-1.0.jar")]),
///             other => Err(BackendError::not_found(other)),
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
#[async_trait]
pub trait ResolutionBackend: Send + Sync {
    /// Resolves `identifier` to local files, in the backend's own order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The artifact does not exist
    /// - The repository cannot be read or reached
    /// - The identifier is malformed
    /// - Versions conflict
    async fn resolve(&self, identifier: &str) -> Result<Vec<PathBuf>, BackendError>;

    /// Short backend name used in log output.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// In-memory backend with a fixed identifier → files table.
///
/// Unknown identifiers fail with [`BackendError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    artifacts: HashMap<String, Vec<PathBuf>>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the files `identifier` resolves to, replacing earlier ones.
    #[must_use]
    pub fn with_artifact<I, P>(mut self, identifier: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.artifacts
            .insert(identifier.into(), files.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[async_trait]
impl ResolutionBackend for StaticBackend {
    async fn resolve(&self, identifier: &str) -> Result<Vec<PathBuf>, BackendError> {
        self.artifacts
            .get(identifier)
            .cloned()
            .ok_or_else(|| BackendError::not_found(identifier))
    }

    fn name(&self) -> &'static str {
        "static"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
