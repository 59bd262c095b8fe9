//! Core abstractions for artifact resolution.
//!
//! This crate defines the contract between callers that need artifact files
//! and the backends that know how to find them: coordinates, the
//! [`ResolutionBackend`] trait, the [`ArtifactHandler`] adapter, and the
//! normalized [`ResolutionResult`] it returns.

pub mod backend;
pub mod coordinates;
pub mod error;
pub mod handler;
pub mod location;

pub use backend::{ResolutionBackend, StaticBackend};
pub use coordinates::ArtifactCoordinates;
pub use error::{ArtifactError, BackendError, BoxError, Result};
pub use handler::{ArtifactHandler, BackendArtifactHandler, StoreOutcome};
pub use location::{NormalizationSkip, ResolutionResult, ResolvedLocation, SkipReason};
