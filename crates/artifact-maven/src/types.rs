//! Domain types for Maven artifacts.

use crate::error::MavenError;
use artifact_core::ArtifactCoordinates;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_EXTENSION: &str = "jar";

/// Maven artifact coordinates.
///
/// External form is `groupId:artifactId[:extension[:classifier]]:version`;
/// the extension is only written when it is not `jar` or a classifier is
/// present, so the same value always produces the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub extension: String,
}

impl MavenCoordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Same artifact, pointing at its POM.
    #[must_use]
    pub fn pom(&self) -> Self {
        Self {
            classifier: None,
            extension: "pom".to_owned(),
            ..self.clone()
        }
    }

    /// Versionless key: `groupId:artifactId:extension[:classifier]`.
    ///
    /// Two coordinates with the same key are the same artifact at
    /// (possibly) different versions.
    pub fn key(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, c
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.extension),
        }
    }

    pub fn meta_version(&self) -> Option<MetaVersion> {
        self.version.parse().ok()
    }
}

impl fmt::Display for MavenCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        match &self.classifier {
            Some(c) => write!(f, ":{}:{}", self.extension, c)?,
            None if self.extension != DEFAULT_EXTENSION => write!(f, ":{}", self.extension)?,
            None => {}
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for MavenCoordinates {
    type Err = MavenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| MavenError::InvalidCoordinates {
            coordinates: s.to_owned(),
            message: message.to_owned(),
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("empty segment"));
        }
        if let Some(bad) = parts.iter().find(|p| !is_path_safe(p)) {
            return Err(invalid(&format!("segment '{bad}' is not a plain path component")));
        }

        let coords = match parts.as_slice() {
            [g, a, v] => Self::new(*g, *a, *v),
            [g, a, ext, v] => Self::new(*g, *a, *v).with_extension(*ext),
            [g, a, ext, c, v] => Self::new(*g, *a, *v).with_extension(*ext).with_classifier(*c),
            _ => {
                return Err(invalid(
                    "expected 'groupId:artifactId[:extension[:classifier]]:version'",
                ));
            }
        };
        Ok(coords)
    }
}

/// Whether a coordinate segment can be joined under the repository root
/// without leaving it.
pub(crate) fn is_path_safe(segment: &str) -> bool {
    segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

impl ArtifactCoordinates for MavenCoordinates {
    fn identifier(&self) -> String {
        self.to_string()
    }
}

/// Symbolic versions resolved against what the repository holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaVersion {
    /// Highest version, snapshots included when configured.
    Latest,
    /// Highest non-pre-release version.
    Release,
}

impl FromStr for MetaVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LATEST" => Ok(Self::Latest),
            "RELEASE" => Ok(Self::Release),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MavenScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
}

impl MavenScope {
    /// Scopes whose dependencies are part of the runtime classpath of a
    /// consumer.
    pub fn is_transitive(&self) -> bool {
        matches!(self, Self::Compile | Self::Runtime)
    }
}

impl FromStr for MavenScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            _ => Self::Compile,
        })
    }
}

/// Maps a POM dependency `<type>` to the file extension and implied
/// classifier it is stored under.
pub fn type_to_extension(dep_type: &str) -> (&str, Option<&'static str>) {
    match dep_type {
        "test-jar" => ("jar", Some("tests")),
        "ejb-client" => ("jar", Some("client")),
        "java-source" => ("jar", Some("sources")),
        "javadoc" => ("jar", Some("javadoc")),
        "maven-plugin" | "ejb" | "bundle" => ("jar", None),
        other => (other, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_segments() {
        let c: MavenCoordinates = "org.apache.commons:commons-lang3:3.14.0".parse().unwrap();
        assert_eq!(c.group_id, "org.apache.commons");
        assert_eq!(c.artifact_id, "commons-lang3");
        assert_eq!(c.version, "3.14.0");
        assert_eq!(c.extension, "jar");
        assert!(c.classifier.is_none());
    }

    #[test]
    fn test_parse_extension_and_classifier() {
        let c: MavenCoordinates = "io.netty:netty-transport-native-epoll:jar:linux-x86_64:4.1.100"
            .parse()
            .unwrap();
        assert_eq!(c.extension, "jar");
        assert_eq!(c.classifier.as_deref(), Some("linux-x86_64"));
        assert_eq!(c.version, "4.1.100");

        let c: MavenCoordinates = "com.example:bom:pom:1.0".parse().unwrap();
        assert_eq!(c.extension, "pom");
        assert!(c.classifier.is_none());
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "g", "g:a", "g::1.0", "a:b:c:d:e:f", "g:a: "] {
            let err = bad.parse::<MavenCoordinates>().unwrap_err();
            assert!(matches!(err, MavenError::InvalidCoordinates { .. }), "{bad}");
        }
    }

    #[test]
    fn test_parse_rejects_path_segments() {
        for bad in [
            "g:..:..",
            "g:.:1.0",
            "../../etc:a:1.0",
            "g:a/b:1.0",
            "g:a:..\\..:1.0",
            "g:a:jar:../x:1.0",
            "g:a:1.0\0",
        ] {
            let err = bad.parse::<MavenCoordinates>().unwrap_err();
            assert!(matches!(err, MavenError::InvalidCoordinates { .. }), "{bad}");
        }
        // Dots inside a segment are ordinary group/version text.
        assert!("org.example:a..b:1.0.0".parse::<MavenCoordinates>().is_ok());
    }

    #[test]
    fn test_identifier_is_canonical() {
        assert_eq!(MavenCoordinates::new("g", "a", "1.0").identifier(), "g:a:1.0");
        assert_eq!(
            MavenCoordinates::new("g", "a", "1.0")
                .with_extension("war")
                .identifier(),
            "g:a:war:1.0"
        );
        assert_eq!(
            MavenCoordinates::new("g", "a", "1.0")
                .with_classifier("sources")
                .identifier(),
            "g:a:jar:sources:1.0"
        );
        // Redundant default extension collapses.
        let c: MavenCoordinates = "g:a:jar:1.0".parse().unwrap();
        assert_eq!(c.identifier(), "g:a:1.0");
    }

    #[test]
    fn test_identifier_round_trips_through_parse() {
        let c = MavenCoordinates::new("g", "a", "1.0").with_classifier("tests");
        let parsed: MavenCoordinates = c.identifier().parse().unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn test_key_ignores_version() {
        let a = MavenCoordinates::new("g", "a", "1.0");
        let b = a.with_version("2.0");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), a.pom().key());
    }

    #[test]
    fn test_meta_version() {
        assert_eq!(
            MavenCoordinates::new("g", "a", "LATEST").meta_version(),
            Some(MetaVersion::Latest)
        );
        assert_eq!(
            MavenCoordinates::new("g", "a", "RELEASE").meta_version(),
            Some(MetaVersion::Release)
        );
        assert_eq!(MavenCoordinates::new("g", "a", "1.0").meta_version(), None);
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("test".parse::<MavenScope>().unwrap(), MavenScope::Test);
        assert_eq!("RUNTIME".parse::<MavenScope>().unwrap(), MavenScope::Runtime);
        assert_eq!("provided".parse::<MavenScope>().unwrap(), MavenScope::Provided);
        assert_eq!("unknown".parse::<MavenScope>().unwrap(), MavenScope::Compile);
        assert!(MavenScope::default().is_transitive());
        assert!(MavenScope::Runtime.is_transitive());
        assert!(!MavenScope::Test.is_transitive());
        assert!(!MavenScope::Provided.is_transitive());
    }

    #[test]
    fn test_type_to_extension() {
        assert_eq!(type_to_extension("jar"), ("jar", None));
        assert_eq!(type_to_extension("test-jar"), ("jar", Some("tests")));
        assert_eq!(type_to_extension("bundle"), ("jar", None));
        assert_eq!(type_to_extension("pom"), ("pom", None));
    }
}
