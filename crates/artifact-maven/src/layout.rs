//! Maven 2 repository directory layout.
//!
//! `<root>/<group path>/<artifactId>/<version>/<artifactId>-<version>[-<classifier>].<extension>`
//! where the group path is the groupId with `.` replaced by directory
//! separators.

use crate::types::MavenCoordinates;
use std::path::{Path, PathBuf};

/// Directory holding every version of `group_id:artifact_id`.
pub fn versions_dir(root: &Path, group_id: &str, artifact_id: &str) -> PathBuf {
    let mut dir = root.to_path_buf();
    dir.extend(group_id.split('.'));
    dir.push(artifact_id);
    dir
}

pub fn artifact_dir(root: &Path, coords: &MavenCoordinates) -> PathBuf {
    versions_dir(root, &coords.group_id, &coords.artifact_id).join(&coords.version)
}

pub fn file_name(coords: &MavenCoordinates) -> String {
    match &coords.classifier {
        Some(c) => format!(
            "{}-{}-{}.{}",
            coords.artifact_id, coords.version, c, coords.extension
        ),
        None => format!(
            "{}-{}.{}",
            coords.artifact_id, coords.version, coords.extension
        ),
    }
}

pub fn artifact_path(root: &Path, coords: &MavenCoordinates) -> PathBuf {
    artifact_dir(root, coords).join(file_name(coords))
}

pub fn pom_path(root: &Path, coords: &MavenCoordinates) -> PathBuf {
    artifact_path(root, &coords.pom())
}
