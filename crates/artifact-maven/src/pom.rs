//! Minimal POM reader for transitive expansion.
//!
//! Uses the quick-xml SAX reader and only keeps what dependency expansion
//! needs: project identity, parent reference, properties, managed versions
//! and direct `<dependencies>`. Plugin and profile sections are ignored.

use crate::error::{MavenError, Result};
use crate::types::{MavenCoordinates, MavenScope, is_path_safe, type_to_extension};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::path::Path;

/// Placeholder substitution passes; bounds self-referencing properties.
const MAX_INTERPOLATION_PASSES: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent_group_id: Option<String>,
    pub parent_version: Option<String>,
    pub properties: HashMap<String, String>,
    /// `groupId:artifactId` → version from `<dependencyManagement>`.
    ///
    /// Keys are stored as written; placeholders in them are substituted
    /// when dependencies are resolved.
    pub managed_versions: HashMap<String, String>,
    /// `groupId:artifactId` → scope from `<dependencyManagement>`.
    pub managed_scopes: HashMap<String, MavenScope>,
    pub dependencies: Vec<PomDependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
    /// Scope as declared; `None` defers to dependency management, then
    /// `compile`.
    pub scope: Option<MavenScope>,
    pub optional: bool,
    /// `(groupId, artifactId)` pairs; either side may be `*`.
    pub exclusions: Vec<(String, String)>,
}

impl PomDependency {
    pub fn scope(&self) -> MavenScope {
        self.scope.clone().unwrap_or_default()
    }

    /// Coordinates for this dependency, or `None` while its version is
    /// missing or still holds an unresolved `${...}` placeholder, or when a
    /// segment would not stay inside the repository layout.
    pub fn coordinates(&self) -> Option<MavenCoordinates> {
        let version = self.version.as_deref()?;
        if version.contains("${") || version.is_empty() {
            return None;
        }
        let (extension, implied_classifier) =
            type_to_extension(self.dep_type.as_deref().unwrap_or("jar"));
        let mut coords = MavenCoordinates::new(&self.group_id, &self.artifact_id, version)
            .with_extension(extension);
        coords.classifier = self
            .classifier
            .clone()
            .or_else(|| implied_classifier.map(str::to_owned));

        let segments = [
            Some(coords.group_id.as_str()),
            Some(coords.artifact_id.as_str()),
            Some(coords.version.as_str()),
            Some(coords.extension.as_str()),
            coords.classifier.as_deref(),
        ];
        if segments
            .into_iter()
            .flatten()
            .any(|s| s.is_empty() || !is_path_safe(s))
        {
            return None;
        }
        Some(coords)
    }

    pub fn excludes(&self, group_id: &str, artifact_id: &str) -> bool {
        is_excluded(&self.exclusions, group_id, artifact_id)
    }
}

/// Whether `group_id:artifact_id` matches any `(groupId, artifactId)`
/// exclusion pattern; `*` matches anything.
pub fn is_excluded(exclusions: &[(String, String)], group_id: &str, artifact_id: &str) -> bool {
    exclusions
        .iter()
        .any(|(g, a)| (g == "*" || g == group_id) && (a == "*" || a == artifact_id))
}

impl Pom {
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id.as_deref().or(self.parent_group_id.as_deref())
    }

    pub fn effective_version(&self) -> Option<&str> {
        self.version.as_deref().or(self.parent_version.as_deref())
    }

    /// Replaces `${...}` placeholders from properties and project fields.
    ///
    /// Unknown placeholders are left in place.
    pub fn interpolate(&self, value: &str) -> String {
        let mut current = value.to_owned();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            let next = self.interpolate_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn interpolate_once(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &after[..end];
            match self.lookup(key) {
                Some(v) => out.push_str(v),
                None => {
                    out.push_str("${");
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "project.version" | "pom.version" | "version" => self.effective_version(),
            "project.groupId" | "pom.groupId" | "groupId" => self.effective_group_id(),
            "project.artifactId" | "pom.artifactId" | "artifactId" => self.artifact_id.as_deref(),
            "project.parent.version" | "parent.version" => self.parent_version.as_deref(),
            "project.parent.groupId" | "parent.groupId" => self.parent_group_id.as_deref(),
            other => self.properties.get(other).map(String::as_str),
        }
    }

    /// Direct dependencies with placeholders substituted and managed
    /// versions and scopes filled in.
    pub fn resolved_dependencies(&self) -> Vec<PomDependency> {
        let versions: HashMap<String, &str> = self
            .managed_versions
            .iter()
            .map(|(key, version)| (self.interpolate(key), version.as_str()))
            .collect();
        let scopes: HashMap<String, &MavenScope> = self
            .managed_scopes
            .iter()
            .map(|(key, scope)| (self.interpolate(key), scope))
            .collect();

        self.dependencies
            .iter()
            .map(|dep| {
                let mut dep = dep.clone();
                dep.group_id = self.interpolate(&dep.group_id);
                dep.artifact_id = self.interpolate(&dep.artifact_id);
                let key = format!("{}:{}", dep.group_id, dep.artifact_id);
                dep.version = dep
                    .version
                    .as_deref()
                    .or_else(|| versions.get(&key).copied())
                    .map(|v| self.interpolate(v));
                if dep.scope.is_none() {
                    dep.scope = scopes.get(&key).map(|s| (*s).clone());
                }
                dep.classifier = dep.classifier.as_deref().map(|c| self.interpolate(c));
                dep
            })
            .collect()
    }
}

#[derive(Default)]
struct DepAccum {
    dep: PomDependency,
    exclusion_group: Option<String>,
    exclusion_artifact: Option<String>,
}

/// Reads and parses a POM from disk.
pub async fn read_pom(path: &Path) -> Result<Pom> {
    tracing::trace!("Reading POM: {}", path.display());
    let content = tokio::fs::read_to_string(path).await?;
    parse_pom(&content).map_err(|message| MavenError::PomParse {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse_pom(content: &str) -> std::result::Result<Pom, String> {
    let mut pom = Pom::default();

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut current: Option<DepAccum> = None;
    let mut managed: Option<PomDependency> = None;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                path.push(tag);
                let p: Vec<&str> = path.iter().map(String::as_str).collect();
                match p.as_slice() {
                    ["project", "dependencies", "dependency"] => {
                        current = Some(DepAccum::default());
                    }
                    ["project", "dependencyManagement", "dependencies", "dependency"] => {
                        managed = Some(PomDependency::default());
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                let text = match e.decode() {
                    Ok(cow) => {
                        let s = cow.trim().to_string();
                        quick_xml::escape::unescape(&s)
                            .map(|c| c.into_owned())
                            .unwrap_or(s)
                    }
                    Err(_) => String::from_utf8_lossy(e.as_ref()).trim().to_string(),
                };
                let p: Vec<&str> = path.iter().map(String::as_str).collect();
                apply_text(&mut pom, current.as_mut(), managed.as_mut(), &p, text);
            }
            Event::End(_) => {
                let p: Vec<&str> = path.iter().map(String::as_str).collect();
                match p.as_slice() {
                    ["project", "dependencies", "dependency"] => {
                        if let Some(accum) = current.take()
                            && !accum.dep.group_id.is_empty()
                            && !accum.dep.artifact_id.is_empty()
                        {
                            pom.dependencies.push(accum.dep);
                        }
                    }
                    ["project", "dependencies", "dependency", "exclusions", "exclusion"] => {
                        if let Some(accum) = current.as_mut()
                            && let (Some(g), Some(a)) =
                                (accum.exclusion_group.take(), accum.exclusion_artifact.take())
                        {
                            accum.dep.exclusions.push((g, a));
                        }
                    }
                    ["project", "dependencyManagement", "dependencies", "dependency"] => {
                        if let Some(dep) = managed.take() {
                            let key = format!("{}:{}", dep.group_id, dep.artifact_id);
                            if let Some(scope) = dep.scope {
                                pom.managed_scopes.insert(key.clone(), scope);
                            }
                            if let Some(version) = dep.version {
                                pom.managed_versions.insert(key, version);
                            }
                        }
                    }
                    _ => {}
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(format!("unclosed element <{}>", path.join("/")));
    }

    Ok(pom)
}

fn apply_text(
    pom: &mut Pom,
    current: Option<&mut DepAccum>,
    managed: Option<&mut PomDependency>,
    path: &[&str],
    text: String,
) {
    match path {
        ["project", "groupId"] => pom.group_id = Some(text),
        ["project", "artifactId"] => pom.artifact_id = Some(text),
        ["project", "version"] => pom.version = Some(text),
        ["project", "parent", "groupId"] => pom.parent_group_id = Some(text),
        ["project", "parent", "version"] => pom.parent_version = Some(text),
        ["project", "properties", key] => {
            pom.properties.insert((*key).to_owned(), text);
        }
        ["project", "dependencies", "dependency", field] => {
            if let Some(accum) = current {
                let dep = &mut accum.dep;
                match *field {
                    "groupId" => dep.group_id = text,
                    "artifactId" => dep.artifact_id = text,
                    "version" => dep.version = Some(text),
                    "type" => dep.dep_type = Some(text),
                    "classifier" => dep.classifier = Some(text),
                    "scope" => dep.scope = text.parse().ok(),
                    "optional" => dep.optional = text.eq_ignore_ascii_case("true"),
                    _ => {}
                }
            }
        }
        ["project", "dependencies", "dependency", "exclusions", "exclusion", field] => {
            if let Some(accum) = current {
                match *field {
                    "groupId" => accum.exclusion_group = Some(text),
                    "artifactId" => accum.exclusion_artifact = Some(text),
                    _ => {}
                }
            }
        }
        ["project", "dependencyManagement", "dependencies", "dependency", field] => {
            if let Some(dep) = managed {
                match *field {
                    "groupId" => dep.group_id = text,
                    "artifactId" => dep.artifact_id = text,
                    "version" => dep.version = Some(text),
                    "scope" => dep.scope = text.parse().ok(),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.5</version>
  </parent>
  <artifactId>app</artifactId>
  <properties>
    <slf4j.version>2.0.9</slf4j.version>
    <logging.version>${slf4j.version}</logging.version>
  </properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>com.google.guava</groupId>
        <artifactId>guava</artifactId>
        <version>32.1.3-jre</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>${logging.version}</version>
      <exclusions>
        <exclusion>
          <groupId>*</groupId>
          <artifactId>*</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
    </dependency>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>core</artifactId>
      <version>${project.version}</version>
      <type>test-jar</type>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>maybe</artifactId>
      <version>1.0</version>
      <optional>true</optional>
    </dependency>
  </dependencies>
  <build>
    <plugins>
      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-compiler-plugin</artifactId>
        <version>3.11.0</version>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    #[test]
    fn test_parse_project_identity() {
        let pom = parse_pom(POM).unwrap();
        assert_eq!(pom.group_id, None);
        assert_eq!(pom.effective_group_id(), Some("com.example"));
        assert_eq!(pom.effective_version(), Some("1.5"));
        assert_eq!(pom.artifact_id.as_deref(), Some("app"));
    }

    #[test]
    fn test_parse_skips_plugins() {
        let pom = parse_pom(POM).unwrap();
        assert_eq!(pom.dependencies.len(), 4);
        assert!(
            pom.dependencies
                .iter()
                .all(|d| d.artifact_id != "maven-compiler-plugin")
        );
    }

    #[test]
    fn test_resolved_dependencies() {
        let pom = parse_pom(POM).unwrap();
        let deps = pom.resolved_dependencies();

        assert_eq!(deps[0].version.as_deref(), Some("2.0.9"));
        assert!(deps[0].excludes("anything", "at-all"));

        // Version from dependencyManagement.
        assert_eq!(deps[1].version.as_deref(), Some("32.1.3-jre"));

        assert_eq!(deps[2].group_id, "com.example");
        assert_eq!(deps[2].version.as_deref(), Some("1.5"));
        assert_eq!(deps[2].scope(), MavenScope::Test);
        let coords = deps[2].coordinates().unwrap();
        assert_eq!(coords.classifier.as_deref(), Some("tests"));
        assert_eq!(coords.extension, "jar");

        assert!(deps[3].optional);
    }

    const MULTI_MODULE_POM: &str = r#"<project>
  <groupId>com.example</groupId>
  <artifactId>service</artifactId>
  <version>1.0</version>
  <properties>
    <fixtures.artifact>fixtures</fixtures.artifact>
  </properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>${project.groupId}</groupId>
        <artifactId>core</artifactId>
        <version>${project.version}</version>
      </dependency>
      <dependency>
        <groupId>${project.groupId}</groupId>
        <artifactId>${fixtures.artifact}</artifactId>
        <version>${project.version}</version>
        <scope>test</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>core</artifactId>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>fixtures</artifactId>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>fixtures</artifactId>
      <classifier>extra</classifier>
      <scope>runtime</scope>
    </dependency>
  </dependencies>
</project>
"#;

    #[test]
    fn test_managed_keys_with_placeholders() {
        let pom = parse_pom(MULTI_MODULE_POM).unwrap();
        let deps = pom.resolved_dependencies();

        assert_eq!(deps[0].group_id, "com.example");
        assert_eq!(deps[0].version.as_deref(), Some("1.0"));
        assert_eq!(deps[0].scope(), MavenScope::Compile);
        assert_eq!(deps[1].version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_managed_scope_applies_when_undeclared() {
        let pom = parse_pom(MULTI_MODULE_POM).unwrap();
        let deps = pom.resolved_dependencies();

        assert_eq!(deps[1].scope(), MavenScope::Test);
        assert!(!deps[1].scope().is_transitive());
        // A declared scope wins over the managed one.
        assert_eq!(deps[2].scope(), MavenScope::Runtime);
    }

    #[test]
    fn test_path_like_dependency_has_no_coordinates() {
        let dep = PomDependency {
            group_id: "com.example".into(),
            artifact_id: "../../outside".into(),
            version: Some("1.0".into()),
            ..PomDependency::default()
        };
        assert!(dep.coordinates().is_none());

        let dep = PomDependency {
            artifact_id: "lib".into(),
            classifier: Some("..".into()),
            ..dep
        };
        assert!(dep.coordinates().is_none());
    }

    #[test]
    fn test_unresolved_placeholder_has_no_coordinates() {
        let dep = PomDependency {
            group_id: "g".into(),
            artifact_id: "a".into(),
            version: Some("${missing}".into()),
            ..PomDependency::default()
        };
        assert!(dep.coordinates().is_none());

        let dep = PomDependency {
            version: None,
            ..dep
        };
        assert!(dep.coordinates().is_none());
    }

    #[test]
    fn test_interpolate_leaves_unknown_placeholders() {
        let pom = parse_pom(POM).unwrap();
        assert_eq!(pom.interpolate("${nope}-${slf4j.version}"), "${nope}-2.0.9");
        assert_eq!(pom.interpolate("${unterminated"), "${unterminated");
    }

    #[test]
    fn test_interpolate_self_reference_terminates() {
        let mut pom = Pom::default();
        pom.properties.insert("a".into(), "${a}x".into());
        let value = pom.interpolate("${a}");
        assert!(value.starts_with("${a}"));
    }

    #[test]
    fn test_exclusion_matching() {
        let dep = PomDependency {
            exclusions: vec![("commons-logging".into(), "*".into())],
            ..PomDependency::default()
        };
        assert!(dep.excludes("commons-logging", "commons-logging"));
        assert!(!dep.excludes("org.slf4j", "jcl-over-slf4j"));
    }

    #[test]
    fn test_malformed_pom() {
        let result = parse_pom("<project><dependencies><dependency></project>");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_pom_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_pom(&dir.path().join("absent.pom")).await.unwrap_err();
        assert!(matches!(err, MavenError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
