//! Maven version ordering and meta-version selection.

use crate::types::MetaVersion;
use std::cmp::Ordering;

/// One segment of a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Digits with leading zeros stripped.
    Number(String),
    Qualifier(String),
}

/// Rank of well-known qualifiers; a plain release sits at `RELEASE_RANK`.
const RELEASE_RANK: u8 = 5;
const UNKNOWN_RANK: u8 = 7;

fn qualifier_rank(q: &str) -> u8 {
    match q {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" | "cr" => 3,
        "snapshot" => 4,
        "" | "ga" | "final" | "release" => RELEASE_RANK,
        "sp" => 6,
        _ => UNKNOWN_RANK,
    }
}

/// Splits on separators and on every digit/letter boundary, so
/// `2.0.0-M1` becomes `2 0 0 milestone 1`.
fn tokenize(version: &str) -> Vec<Token> {
    let mut raw: Vec<String> = Vec::new();
    for part in version.split(['.', '-', '_']).filter(|p| !p.is_empty()) {
        let mut current = String::new();
        let mut digits = None;
        for c in part.chars() {
            let is_digit = c.is_ascii_digit();
            if digits.is_some_and(|d| d != is_digit) {
                raw.push(std::mem::take(&mut current));
            }
            digits = Some(is_digit);
            current.push(c.to_ascii_lowercase());
        }
        raw.push(current);
    }

    let mut tokens = Vec::with_capacity(raw.len());
    for (i, segment) in raw.iter().enumerate() {
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            let trimmed = segment.trim_start_matches('0');
            tokens.push(Token::Number(trimmed.to_owned()));
            continue;
        }
        let followed_by_number = raw
            .get(i + 1)
            .is_some_and(|n| n.starts_with(|c: char| c.is_ascii_digit()));
        let qualifier = match segment.as_str() {
            "a" if followed_by_number => "alpha",
            "b" if followed_by_number => "beta",
            "m" if followed_by_number => "milestone",
            other => other,
        };
        tokens.push(Token::Qualifier(qualifier.to_owned()));
    }
    tokens
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_tokens(a: Option<&Token>, b: Option<&Token>) -> Ordering {
    match (a, b) {
        (Some(Token::Number(x)), Some(Token::Number(y))) => compare_numbers(x, y),
        (Some(Token::Number(x)), None) => compare_numbers(x, ""),
        (None, Some(Token::Number(y))) => compare_numbers("", y),
        // Numbers outrank any qualifier: 1.0.1 > 1.0-alpha.
        (Some(Token::Number(_)), Some(Token::Qualifier(_))) => Ordering::Greater,
        (Some(Token::Qualifier(_)), Some(Token::Number(_))) => Ordering::Less,
        (Some(Token::Qualifier(x)), Some(Token::Qualifier(y))) => compare_qualifiers(x, y),
        (Some(Token::Qualifier(x)), None) => compare_qualifiers(x, ""),
        (None, Some(Token::Qualifier(y))) => compare_qualifiers("", y),
        (None, None) => Ordering::Equal,
    }
}

/// Known qualifiers compare by rank alone (`final` == release, `cr` == `rc`);
/// only unknown ones fall back to string order.
fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    let (ra, rb) = (qualifier_rank(a), qualifier_rank(b));
    if ra == rb && ra == UNKNOWN_RANK {
        a.cmp(b)
    } else {
        ra.cmp(&rb)
    }
}

/// Compares two Maven version strings.
///
/// Numeric segments compare numerically, qualifiers by their Maven rank
/// (`alpha < beta < milestone < rc < snapshot < release < sp`), unknown
/// qualifiers lexicographically after the known ones. Missing trailing
/// segments count as `0` or as a plain release.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);

    let max_len = a_tokens.len().max(b_tokens.len());
    (0..max_len)
        .map(|i| compare_tokens(a_tokens.get(i), b_tokens.get(i)))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

pub fn is_snapshot(version: &str) -> bool {
    version.to_uppercase().ends_with("-SNAPSHOT")
}

/// Detects alpha, beta, milestone, release-candidate and snapshot versions.
pub fn is_prerelease(version: &str) -> bool {
    tokenize(version).iter().any(|t| match t {
        Token::Qualifier(q) => qualifier_rank(q) < RELEASE_RANK,
        Token::Number(_) => false,
    })
}

/// Picks the version a meta version stands for among `candidates`.
pub fn select_version<'a, I>(
    candidates: I,
    meta: MetaVersion,
    include_snapshots: bool,
) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .filter(|v| match meta {
            MetaVersion::Latest => include_snapshots || !is_snapshot(v),
            MetaVersion::Release => !is_prerelease(v),
        })
        .max_by(|a, b| compare_versions(a, b))
}
