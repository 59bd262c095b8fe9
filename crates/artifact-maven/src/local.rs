//! Resolution backend over a local Maven repository directory.

use crate::config::LocalRepositoryConfig;
use crate::error::{MavenError, Result};
use crate::layout;
use crate::pom::{PomDependency, is_excluded, read_pom};
use crate::types::MavenCoordinates;
use crate::version::select_version;
use artifact_core::{BackendError, ResolutionBackend};
use async_trait::async_trait;
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// Backend reading a `~/.m2/repository`-style directory.
///
/// Never downloads: an artifact missing from disk is reported as
/// [`BackendError::NotFound`]. With `transitive` enabled, compile and
/// runtime dependencies from each artifact's POM are added breadth-first
/// after the requested artifact.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
    config: LocalRepositoryConfig,
}

/// A node waiting for POM expansion.
struct Pending {
    coords: MavenCoordinates,
    depth: usize,
    /// Exclusions inherited from every dependency on the path to this node.
    exclusions: Vec<(String, String)>,
}

impl LocalRepository {
    /// Repository at `root` with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: LocalRepositoryConfig {
                root: Some(root.clone()),
                ..LocalRepositoryConfig::default()
            },
            root,
        }
    }

    pub fn from_config(config: LocalRepositoryConfig) -> Result<Self> {
        let root = config.resolve_root()?;
        tracing::debug!("Local Maven repository at {}", root.display());
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LocalRepositoryConfig {
        &self.config
    }

    /// Replaces `LATEST`/`RELEASE` with a concrete version found on disk.
    async fn resolve_version(
        &self,
        coords: MavenCoordinates,
    ) -> std::result::Result<MavenCoordinates, BackendError> {
        let Some(meta) = coords.meta_version() else {
            return Ok(coords);
        };

        let dir = layout::versions_dir(&self.root, &coords.group_id, &coords.artifact_id);
        let identifier = coords.to_string();
        let versions = list_versions(&dir)
            .await
            .map_err(|e| io_error(&identifier, e))?;

        let selected = select_version(
            versions.iter().map(String::as_str),
            meta,
            self.config.include_snapshots,
        )
        .ok_or_else(|| BackendError::not_found(&identifier))?;

        tracing::debug!("{} resolved to version {}", identifier, selected);
        Ok(coords.with_version(selected))
    }

    /// Path of an artifact file that must exist.
    async fn locate(
        &self,
        coords: &MavenCoordinates,
    ) -> std::result::Result<PathBuf, BackendError> {
        let path = layout::artifact_path(&self.root, coords);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(BackendError::not_found(coords.to_string())),
            Err(e) => Err(io_error(&coords.to_string(), e)),
        }
    }

    /// Direct dependencies worth following, or empty when the POM is
    /// absent or unreadable.
    async fn followable_dependencies(&self, coords: &MavenCoordinates) -> Vec<PomDependency> {
        let pom_path = layout::pom_path(&self.root, coords);
        let pom = match read_pom(&pom_path).await {
            Ok(pom) => pom,
            Err(MavenError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No POM for {}, not expanding", coords);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Skipping dependencies of {}: {}", coords, e);
                return Vec::new();
            }
        };

        pom.resolved_dependencies()
            .into_iter()
            .filter(|dep| dep.scope().is_transitive() && !dep.optional)
            .collect()
    }

    async fn expand(
        &self,
        root: MavenCoordinates,
        files: &mut Vec<PathBuf>,
    ) -> std::result::Result<(), BackendError> {
        // Versionless key -> version that claimed it first (nearest wins).
        let mut selected: HashMap<String, String> = HashMap::new();
        selected.insert(root.key(), root.version.clone());

        let mut queue = VecDeque::from([Pending {
            coords: root,
            depth: 0,
            exclusions: Vec::new(),
        }]);

        while let Some(node) = queue.pop_front() {
            if node.depth >= self.config.max_depth {
                tracing::debug!(
                    "Depth limit {} reached at {}",
                    self.config.max_depth,
                    node.coords
                );
                continue;
            }

            for dep in self.followable_dependencies(&node.coords).await {
                if is_excluded(&node.exclusions, &dep.group_id, &dep.artifact_id) {
                    tracing::trace!(
                        "{}:{} excluded below {}",
                        dep.group_id,
                        dep.artifact_id,
                        node.coords
                    );
                    continue;
                }

                let Some(coords) = dep.coordinates() else {
                    tracing::warn!(
                        "Skipping {}:{} required by {}: no usable coordinates ({:?})",
                        dep.group_id,
                        dep.artifact_id,
                        node.coords,
                        dep.version
                    );
                    continue;
                };

                let key = coords.key();
                if let Some(existing) = selected.get(&key) {
                    if *existing != coords.version {
                        tracing::debug!(
                            "Version conflict for {}: keeping {}, ignoring {}",
                            key,
                            existing,
                            coords.version
                        );
                    }
                    continue;
                }

                let coords = self.resolve_version(coords).await?;

                files.push(self.locate(&coords).await?);
                selected.insert(key, coords.version.clone());

                let mut exclusions = node.exclusions.clone();
                exclusions.extend(dep.exclusions.iter().cloned());
                queue.push_back(Pending {
                    coords,
                    depth: node.depth + 1,
                    exclusions,
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ResolutionBackend for LocalRepository {
    async fn resolve(
        &self,
        identifier: &str,
    ) -> std::result::Result<Vec<PathBuf>, BackendError> {
        let coords: MavenCoordinates = identifier.parse()?;
        let coords = self.resolve_version(coords).await?;

        let mut files = vec![self.locate(&coords).await?];
        if self.config.transitive {
            self.expand(coords, &mut files).await?;
        }

        tracing::debug!("{} -> {} files", identifier, files.len());
        Ok(files)
    }

    fn name(&self) -> &'static str {
        "local-maven"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn io_error(identifier: &str, err: std::io::Error) -> BackendError {
    if err.kind() == std::io::ErrorKind::NotFound {
        BackendError::not_found(identifier)
    } else {
        BackendError::repository(identifier, err)
    }
}

/// Version directory names under `dir`.
async fn list_versions(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut versions = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            versions.push(name.to_owned());
        }
    }
    Ok(versions)
}
