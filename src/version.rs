//! Changelog versions
//!
//! Holds the version token resolver used to decide whether a header names a
//! version, and the read-only version model produced by the scanner.

use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

use crate::change::ChangeEntry;

/// Outcome of resolving a version token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Normalized version string (e.g., "1.2.0-beta2")
    pub number: String,
    /// Numeric magnitude of the version; zero means "not a version"
    pub build: u64,
}

impl ResolvedVersion {
    /// A resolution that does not denote a version
    pub fn invalid(token: &str) -> Self {
        Self {
            number: token.to_string(),
            build: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.build > 0
    }
}

/// Decides whether a text token is a version, and normalizes it
pub trait VersionResolver {
    fn resolve(&self, token: &str) -> ResolvedVersion;
}

impl<F> VersionResolver for F
where
    F: Fn(&str) -> ResolvedVersion,
{
    fn resolve(&self, token: &str) -> ResolvedVersion {
        self(token)
    }
}

/// Resolver backed by the `semver` crate
///
/// Accepts one to three dotted numeric components (missing ones are padded
/// with zero) and an optional pre-release suffix:
///
/// ```text
/// v1.2      -> 1.2.0
/// 1.2.3beta -> 1.2.3-beta
/// 14.5.9-snapshot5 -> 14.5.9-snapshot5
/// 1.1.0_rc_01 -> 1.1.0-rc.1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverResolver;

impl SemverResolver {
    pub fn new() -> Self {
        Self
    }

    /// Parse a token into a semantic version, if it is one
    ///
    /// The suffix is normalized before it is handed to `semver`: `_` becomes
    /// `.` and numeric identifiers lose their leading zeros.
    pub fn parse(token: &str) -> Option<Version> {
        let (numbers, suffix) = Self::split_token(token)?;

        let pre = if suffix.is_empty() {
            Prerelease::EMPTY
        } else {
            Prerelease::new(&normalize_prerelease(suffix)).ok()?
        };

        Some(Version {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre,
            build: BuildMetadata::EMPTY,
        })
    }

    /// Numeric magnitude of a version, ignoring pre-release data
    pub fn build_number(version: &Version) -> u64 {
        ordinal(&[version.major, version.minor, version.patch])
    }

    /// Split a token into its padded numeric components and the suffix,
    /// with any leading separator removed from the suffix
    fn split_token(token: &str) -> Option<([u64; 3], &str)> {
        let token = token.trim();
        // Strip leading 'v' if present
        let token = token
            .strip_prefix('v')
            .or_else(|| token.strip_prefix('V'))
            .unwrap_or(token);

        let split = token
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(token.len());
        let (core, suffix) = token.split_at(split);

        let parts: Vec<&str> = core.trim_end_matches('.').split('.').collect();
        if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().ok()?;
        }

        Some((numbers, suffix.trim_start_matches(&['-', '.', '_'][..])))
    }
}

fn ordinal(numbers: &[u64; 3]) -> u64 {
    numbers[0]
        .saturating_mul(1_000_000)
        .saturating_add(numbers[1].saturating_mul(1_000))
        .saturating_add(numbers[2])
}

fn normalize_prerelease(suffix: &str) -> String {
    suffix
        .split(&['.', '_'][..])
        .map(|ident| {
            if ident.len() > 1 && ident.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = ident.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }
            } else {
                ident
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl VersionResolver for SemverResolver {
    /// The ordinal comes from the numeric components alone; a suffix that
    /// `semver` still rejects after normalization is kept verbatim.
    fn resolve(&self, token: &str) -> ResolvedVersion {
        let Some((numbers, suffix)) = Self::split_token(token) else {
            return ResolvedVersion::invalid(token);
        };

        let number = match Self::parse(token) {
            Some(version) => version.to_string(),
            None => format!("{}.{}.{}-{}", numbers[0], numbers[1], numbers[2], suffix),
        };

        ResolvedVersion {
            number,
            build: ordinal(&numbers),
        }
    }
}

/// A non-version heading nested inside a version, with the lines below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubHeader {
    marker: char,
    level: usize,
    label: String,
    lines: Vec<String>,
}

impl SubHeader {
    pub fn new(level: usize, label: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            marker: '#',
            level,
            label: label.into(),
            lines,
        }
    }

    /// Render the heading with `marker` instead of `#`
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Body lines joined by newlines, trimmed
    pub fn body_text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    /// Heading plus body, as markdown
    pub fn render(&self) -> String {
        format!(
            "{} {}\n{}",
            self.marker.to_string().repeat(self.level),
            self.label,
            self.body_text()
        )
        .trim()
        .to_string()
    }
}

impl fmt::Display for SubHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Narrative content attached to a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreeformBlock {
    Text(String),
    SubHeader(SubHeader),
}

impl FreeformBlock {
    pub fn render(&self) -> String {
        match self {
            FreeformBlock::Text(line) => line.clone(),
            FreeformBlock::SubHeader(sub_header) => sub_header.render(),
        }
    }
}

/// A single version of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogVersion {
    number: String,
    label: String,
    level: usize,
    changes: Vec<ChangeEntry>,
    freeform: Vec<FreeformBlock>,
}

impl ChangelogVersion {
    /// Create a version without header information or narrative
    pub fn new(number: impl Into<String>, changes: Vec<ChangeEntry>) -> Self {
        Self::from_parts(number.into(), String::new(), 1, changes, Vec::new())
    }

    pub(crate) fn from_parts(
        number: String,
        label: String,
        level: usize,
        changes: Vec<ChangeEntry>,
        freeform: Vec<FreeformBlock>,
    ) -> Self {
        Self {
            number,
            label,
            level,
            changes,
            freeform,
        }
    }

    /// Normalized version number (e.g., "1.2.3")
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Text following the version token on its header line
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Heading level the version was declared at
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn changes(&self) -> &[ChangeEntry] {
        &self.changes
    }

    pub fn freeform_blocks(&self) -> &[FreeformBlock] {
        &self.freeform
    }

    /// Sub-headers in the order they appear
    pub fn sub_headers(&self) -> impl Iterator<Item = &SubHeader> {
        self.freeform.iter().filter_map(|block| match block {
            FreeformBlock::SubHeader(sub_header) => Some(sub_header),
            FreeformBlock::Text(_) => None,
        })
    }

    /// All narrative content joined by newlines, trimmed
    pub fn freeform_text(&self) -> String {
        self.freeform
            .iter()
            .map(FreeformBlock::render)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

impl fmt::Display for ChangelogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "v{}", self.number)
        } else {
            write!(f, "v{} {}", self.number, self.label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(token: &str) -> ResolvedVersion {
        SemverResolver::new().resolve(token)
    }

    #[test]
    fn test_version_parsing() {
        let v = resolve("1.2.3");
        assert_eq!(v.number, "1.2.3");
        assert_eq!(v.build, 1_002_003);
        assert!(v.is_valid());
    }

    #[test]
    fn test_version_with_v_prefix() {
        assert_eq!(resolve("v1.2.3").number, "1.2.3");
        assert_eq!(resolve("V1.2.3").number, "1.2.3");
    }

    #[test]
    fn test_short_versions_are_padded() {
        assert_eq!(resolve("1.2").number, "1.2.0");
        assert_eq!(resolve("7").number, "7.0.0");
        assert_eq!(resolve("1.2.").number, "1.2.0");
    }

    #[test]
    fn test_prerelease_suffix() {
        assert_eq!(resolve("14.5.9-snapshot5").number, "14.5.9-snapshot5");
        assert_eq!(resolve("1.0.0beta").number, "1.0.0-beta");
        assert_eq!(resolve("4.0.0-alpha").build, 4_000_000);
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(!resolve("0.0.0").is_valid());
        assert!(!resolve(".").is_valid());
        assert!(!resolve("1.2.3.4").is_valid());
        assert!(!resolve("1..2").is_valid());
        assert!(!resolve("abc").is_valid());
    }

    #[test]
    fn test_suffix_normalization() {
        assert_eq!(resolve("v1.1.0_rc_1").number, "1.1.0-rc.1");
        assert_eq!(resolve("1.0.0-rc.01").number, "1.0.0-rc.1");
        assert_eq!(resolve("1.0.0-beta_2").number, "1.0.0-beta.2");
    }

    #[test]
    fn test_suffix_never_invalidates_version() {
        let v = resolve("1.1.0_rc_1");
        assert_eq!(v.build, 1_001_000);

        // Empty identifiers are rejected by semver, so the raw suffix is kept
        let v = resolve("2.0.0-rc__1");
        assert!(v.is_valid());
        assert_eq!(v.number, "2.0.0-rc__1");
        assert_eq!(v.build, 2_000_000);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |token: &str| ResolvedVersion {
            number: token.to_uppercase(),
            build: 1,
        };
        assert_eq!(resolver.resolve("x1").number, "X1");
    }

    #[test]
    fn test_sub_header_render() {
        let sub = SubHeader::new(
            3,
            "Notes",
            vec!["".to_string(), "First".to_string(), "Second".to_string(), "".to_string()],
        );
        assert_eq!(sub.body_text(), "First\nSecond");
        assert_eq!(sub.render(), "### Notes\nFirst\nSecond");
        assert_eq!(sub.to_string(), sub.render());
    }

    #[test]
    fn test_sub_header_without_body() {
        let sub = SubHeader::new(2, "Empty", Vec::new());
        assert_eq!(sub.render(), "## Empty");
    }

    #[test]
    fn test_sub_header_custom_marker() {
        let sub = SubHeader::new(3, "Notes", vec!["body".to_string()]).with_marker('=');
        assert_eq!(sub.marker(), '=');
        assert_eq!(sub.render(), "=== Notes\nbody");
    }

    #[test]
    fn test_freeform_text() {
        let version = ChangelogVersion::from_parts(
            "1.0.0".to_string(),
            String::new(),
            2,
            Vec::new(),
            vec![
                FreeformBlock::Text("".to_string()),
                FreeformBlock::Text("Intro".to_string()),
                FreeformBlock::SubHeader(SubHeader::new(3, "Details", vec!["More".to_string()])),
            ],
        );
        assert_eq!(version.freeform_text(), "Intro\n### Details\nMore");
        assert_eq!(version.sub_headers().count(), 1);
    }
}
