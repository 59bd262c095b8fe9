//! Maven coordinates and local Maven repository resolution.
//!
//! This crate provides the Maven side of artifact-core: the
//! `groupId:artifactId[:extension[:classifier]]:version` coordinate type,
//! Maven version ordering, and [`LocalRepository`], a resolution backend
//! that reads a Maven 2 layout directory and expands POM dependencies.

pub mod config;
pub mod error;
pub mod layout;
pub mod local;
pub mod pom;
pub mod types;
pub mod version;

pub use config::LocalRepositoryConfig;
pub use error::{MavenError, Result};
pub use local::LocalRepository;
pub use pom::{Pom, PomDependency, parse_pom};
pub use types::{MavenCoordinates, MavenScope, MetaVersion};
pub use version::{compare_versions, is_prerelease, is_snapshot};
