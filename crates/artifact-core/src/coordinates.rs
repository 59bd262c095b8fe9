//! Artifact coordinate abstraction.

/// An opaque, immutable artifact identifier owned by the caller.
///
/// The only thing the handler needs from coordinates is their external
/// string form, which backends use as the resolution key. Implementations
/// must return the same identifier for the same value every time.
///
/// # Examples
///
/// ```
/// use artifact_core::ArtifactCoordinates;
///
/// assert_eq!("org.slf4j:slf4j-api:2.0.9".identifier(), "org.slf4j:slf4j-api:2.0.9");
/// ```
pub trait ArtifactCoordinates: Send + Sync {
    /// Stable external form, e.g. `"groupId:artifactId:version"`.
    fn identifier(&self) -> String;
}

impl ArtifactCoordinates for str {
    fn identifier(&self) -> String {
        self.to_owned()
    }
}

impl ArtifactCoordinates for String {
    fn identifier(&self) -> String {
        self.clone()
    }
}

impl<T: ArtifactCoordinates + ?Sized> ArtifactCoordinates for &T {
    fn identifier(&self) -> String {
        (**self).identifier()
    }
}
