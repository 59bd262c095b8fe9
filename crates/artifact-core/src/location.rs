//! Conversion of backend file paths into resolved locations.
//!
//! Normalization is best effort: a path that cannot be expressed as an
//! absolute `file://` URL is dropped from the result and reported as a
//! [`NormalizationSkip`] instead of failing the whole resolution.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Absolute location of one resolved artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedLocation {
    url: Url,
    path: PathBuf,
}

impl ResolvedLocation {
    /// Converts a backend file path into a `file://` location.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, NormalizationSkip> {
        let path = path.into();
        match file_url(&path) {
            Ok(url) => Ok(Self { url, path }),
            Err(reason) => Err(NormalizationSkip { path, reason }),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Backend path this location was produced from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl AsRef<str> for ResolvedLocation {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn file_url(path: &Path) -> Result<Url, SkipReason> {
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(SkipReason::NulByte);
    }
    if !path.is_absolute() {
        return Err(SkipReason::NotAbsolute);
    }
    Url::from_file_path(path).map_err(|()| SkipReason::Unconvertible)
}

/// Why a backend file was left out of a [`ResolutionResult`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("path is not absolute")]
    NotAbsolute,

    #[error("path contains a NUL byte")]
    NulByte,

    #[error("path cannot be represented as a file URL")]
    Unconvertible,
}

/// A backend file dropped during normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("skipped '{}': {reason}", .path.display())]
pub struct NormalizationSkip {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of a successful resolution.
///
/// `locations` keeps backend order. Every backend file ends up either in
/// `locations` or in `skipped`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    locations: Vec<ResolvedLocation>,
    skipped: Vec<NormalizationSkip>,
}

impl ResolutionResult {
    /// Normalizes backend files, collecting the ones that fail.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut result = Self::default();
        for path in paths {
            match ResolvedLocation::from_path(path) {
                Ok(location) => result.locations.push(location),
                Err(skip) => result.skipped.push(skip),
            }
        }
        result
    }

    pub fn locations(&self) -> &[ResolvedLocation] {
        &self.locations
    }

    /// Entries dropped during normalization, in backend order.
    pub fn skipped(&self) -> &[NormalizationSkip] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedLocation> {
        self.locations.iter()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.locations.iter().map(ResolvedLocation::as_str).collect()
    }

    pub fn into_locations(self) -> Vec<ResolvedLocation> {
        self.locations
    }
}

impl IntoIterator for ResolutionResult {
    type Item = ResolvedLocation;
    type IntoIter = std::vec::IntoIter<ResolvedLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolutionResult {
    type Item = &'a ResolvedLocation;
    type IntoIter = std::slice::Iter<'a, ResolvedLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absolute(name: &str) -> PathBuf {
        #[cfg(windows)]
        let root = PathBuf::from("C:\\repo");
        #[cfg(not(windows))]
        let root = PathBuf::from("/repo");
        root.join(name)
    }

    #[test]
    fn test_absolute_path_becomes_file_url() {
        let location = ResolvedLocation::from_path(absolute("a-1.0.jar")).unwrap();
        assert_eq!(location.url().scheme(), "file");
        assert!(location.as_str().ends_with("/repo/a-1.0.jar"));
        assert_eq!(location.path(), absolute("a-1.0.jar"));
        assert_eq!(location.to_string(), location.as_str());
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_file_url() {
        let location = ResolvedLocation::from_path("/repo/a-1.0.jar").unwrap();
        assert_eq!(location.as_str(), "file:///repo/a-1.0.jar");
    }

    #[cfg(unix)]
    #[test]
    fn test_special_characters_are_percent_encoded() {
        let location = ResolvedLocation::from_path("/repo/my lib#1.jar").unwrap();
        assert_eq!(location.as_str(), "file:///repo/my%20lib%231.jar");
    }

    #[test]
    fn test_relative_path_is_skipped() {
        let skip = ResolvedLocation::from_path("relative/a.jar").unwrap_err();
        assert_eq!(skip.reason, SkipReason::NotAbsolute);
        assert_eq!(skip.path, PathBuf::from("relative/a.jar"));
    }

    #[test]
    fn test_nul_byte_is_skipped() {
        let skip = ResolvedLocation::from_path(absolute("bad\0name.jar")).unwrap_err();
        assert_eq!(skip.reason, SkipReason::NulByte);
        assert!(skip.to_string().contains("NUL"));
    }

    #[test]
    fn test_from_paths_partitions_in_order() {
        let result = ResolutionResult::from_paths(vec![
            absolute("a.jar"),
            PathBuf::from("b.jar"),
            absolute("c.jar"),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.locations()[0].path(), absolute("a.jar"));
        assert_eq!(result.locations()[1].path(), absolute("c.jar"));
        assert_eq!(result.skipped().len(), 1);
        assert_eq!(result.skipped()[0].path, PathBuf::from("b.jar"));
    }

    #[test]
    fn test_empty_input() {
        let result = ResolutionResult::from_paths(Vec::new());
        assert!(result.is_empty());
        assert!(result.skipped().is_empty());
        assert!(result.urls().is_empty());
    }

    #[test]
    fn test_into_iterator() {
        let result = ResolutionResult::from_paths(vec![absolute("a.jar"), absolute("b.jar")]);
        let borrowed: Vec<_> = (&result).into_iter().map(|l| l.path().to_path_buf()).collect();
        let owned: Vec<_> = result.into_iter().map(ResolvedLocation::into_url).collect();
        assert_eq!(borrowed.len(), 2);
        assert_eq!(owned.len(), 2);
    }
}
