//! Artifact handler: the caller-facing resolution surface.
//!
//! [`BackendArtifactHandler`] forwards coordinates to an injected
//! [`ResolutionBackend`], turns the files it returns into
//! [`ResolvedLocation`]s and wraps backend failures in
//! [`ArtifactError::Resolution`]. It keeps no state of its own.

use crate::backend::ResolutionBackend;
use crate::coordinates::ArtifactCoordinates;
use crate::error::{ArtifactError, Result};
use crate::location::{ResolutionResult, ResolvedLocation};
use async_trait::async_trait;
use std::sync::Arc;

/// What happened to a [`ArtifactHandler::store_artifacts`] request.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Locations were persisted. Returned by handlers whose
    /// [`ArtifactHandler::supports_store`] is `true`; the read-only
    /// [`BackendArtifactHandler`] never produces it.
    Stored { count: usize },
    /// The handler does not persist artifacts; nothing was written.
    Unsupported { ignored: usize },
}

impl StoreOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

/// Uniform access to artifact locations, independent of the backend.
#[async_trait]
pub trait ArtifactHandler: Send + Sync {
    /// Resolves coordinates to the locations of their files.
    ///
    /// Files that cannot be normalized are left out and listed in
    /// [`ResolutionResult::skipped`]; they never fail the call.
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::InvalidCoordinates`] if the coordinates serialize
    ///   to an empty identifier
    /// - [`ArtifactError::Resolution`] if the backend fails, with the
    ///   backend's error as source
    async fn resolve_artifacts(
        &self,
        coordinates: &dyn ArtifactCoordinates,
    ) -> Result<ResolutionResult>;

    /// Persists locations against coordinates, if the handler can.
    ///
    /// Never fails. Callers must check the returned [`StoreOutcome`] rather
    /// than assume anything was written.
    async fn store_artifacts(
        &self,
        coordinates: &dyn ArtifactCoordinates,
        locations: &[ResolvedLocation],
    ) -> StoreOutcome;

    /// Whether [`store_artifacts`](Self::store_artifacts) persists anything.
    fn supports_store(&self) -> bool;
}

/// Handler that delegates resolution to a [`ResolutionBackend`].
///
/// Read-only: `store_artifacts` is accepted and ignored, reporting
/// [`StoreOutcome::Unsupported`].
///
/// # Examples
///
/// ```
/// use artifact_core::{ArtifactHandler, BackendArtifactHandler, StaticBackend};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> artifact_core::Result<()> {
/// let backend = StaticBackend::new().with_artifact("g:a:1.0", ["/repo/a-1.0.jar"]);
/// let handler = BackendArtifactHandler::new(Arc::new(backend));
///
/// let result = handler.resolve_artifacts(&"g:a:1.0").await?;
/// assert_eq!(result.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BackendArtifactHandler {
    backend: Arc<dyn ResolutionBackend>,
}

impl BackendArtifactHandler {
    pub fn new(backend: Arc<dyn ResolutionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn ResolutionBackend {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for BackendArtifactHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendArtifactHandler")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[async_trait]
impl ArtifactHandler for BackendArtifactHandler {
    async fn resolve_artifacts(
        &self,
        coordinates: &dyn ArtifactCoordinates,
    ) -> Result<ResolutionResult> {
        let identifier = coordinates.identifier();
        if identifier.trim().is_empty() {
            return Err(ArtifactError::InvalidCoordinates {
                coordinates: identifier,
                message: "identifier is empty".into(),
            });
        }

        tracing::debug!(
            "Resolving '{}' with {} backend",
            identifier,
            self.backend.name()
        );

        let files = self
            .backend
            .resolve(&identifier)
            .await
            .map_err(|source| ArtifactError::Resolution {
                identifier: identifier.clone(),
                source,
            })?;

        let total = files.len();
        let result = ResolutionResult::from_paths(files);

        for skip in result.skipped() {
            tracing::warn!("Dropping resolved file for '{}': {}", identifier, skip);
        }
        tracing::debug!(
            "Resolved '{}': {} of {} files normalized",
            identifier,
            result.len(),
            total
        );

        Ok(result)
    }

    async fn store_artifacts(
        &self,
        coordinates: &dyn ArtifactCoordinates,
        locations: &[ResolvedLocation],
    ) -> StoreOutcome {
        tracing::debug!(
            "Ignoring store of {} locations for '{}': handler is read-only",
            locations.len(),
            coordinates.identifier()
        );
        StoreOutcome::Unsupported {
            ignored: locations.len(),
        }
    }

    fn supports_store(&self) -> bool {
        false
    }
}
