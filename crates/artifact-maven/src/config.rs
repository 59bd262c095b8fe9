//! Local repository configuration.

use crate::error::{MavenError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the default repository root.
pub const REPO_ENV_VAR: &str = "M2_REPO";

const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for [`LocalRepository`](crate::LocalRepository).
///
/// Deserializes from camelCase JSON, e.g. client initialization options:
///
/// ```
/// use artifact_maven::LocalRepositoryConfig;
///
/// let config = LocalRepositoryConfig::from_json(serde_json::json!({
///     "root": "/var/cache/m2",
///     "transitive": false,
/// }))
/// .unwrap();
/// assert!(!config.transitive);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalRepositoryConfig {
    /// Repository root. Falls back to `$M2_REPO`, then `~/.m2/repository`.
    pub root: Option<PathBuf>,
    /// Follow compile/runtime dependencies declared in POMs.
    pub transitive: bool,
    /// Let `LATEST` pick `-SNAPSHOT` versions.
    pub include_snapshots: bool,
    /// Depth limit for transitive expansion; the requested artifact is depth 0.
    pub max_depth: usize,
}

impl Default for LocalRepositoryConfig {
    fn default() -> Self {
        Self {
            root: None,
            transitive: true,
            include_snapshots: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LocalRepositoryConfig {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| MavenError::Config(e.to_string()))
    }

    /// The repository root this configuration points at.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        if let Some(root) = std::env::var_os(REPO_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(root));
        }
        dirs::home_dir()
            .map(|home| home.join(".m2").join("repository"))
            .ok_or_else(|| {
                MavenError::Config(format!(
                    "no repository root configured, {REPO_ENV_VAR} unset and no home directory"
                ))
            })
    }
}
