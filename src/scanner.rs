//! Line Scanner
//!
//! Builds a [`Changelog`] in a single pass over the lines of a markdown
//! document. The scanner keeps three pieces of state:
//!
//! - the active version, which receives entries and freeform lines
//! - the active sub-header of that version, which swallows every line below it
//! - the recognized level, fixed by the first version header of the document
//!
//! Headers are classified in this order:
//!
//! 1. A header containing a valid version token starts a new version,
//!    whatever its level.
//! 2. A non-version header at or above the recognized level ends the
//!    capture of the active version.
//! 3. Any other header inside an active version becomes a sub-header.
//!
//! Scanning never fails. Unrecognized lines become freeform text, and lines
//! outside of any version are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::change::ChangeEntry;
use crate::changelog::Changelog;
use crate::classify::classify_entry;
use crate::version::{ChangelogVersion, FreeformBlock, SemverResolver, SubHeader, VersionResolver};

/// `<token> <rest>` or `<token>` alone, found anywhere in the header text
static VERSION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)v?([0-9.]+[0-9A-Z._\-]*)(?: (.*))?").unwrap());

/// Characters stripped from the start of a version label
const LABEL_SEPARATORS: &[char] = &['-', '~', '|'];

/// Marker characters recognized by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Character whose leading repetitions form a heading (`#`)
    pub heading_marker: char,
    /// Prefix of a change entry line (`- `)
    pub bullet_marker: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            heading_marker: '#',
            bullet_marker: "- ".to_string(),
        }
    }
}

/// Single-pass changelog scanner
pub struct Scanner<R = SemverResolver> {
    resolver: R,
    options: ScanOptions,
    versions: Vec<VersionBuilder>,
    /// Index into `versions`
    active_version: Option<usize>,
    /// Index into the active version's blocks
    active_sub_header: Option<usize>,
    recognized_level: Option<usize>,
}

impl Scanner<SemverResolver> {
    pub fn new() -> Self {
        Self::with_resolver(SemverResolver::new())
    }
}

impl Default for Scanner<SemverResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: VersionResolver> Scanner<R> {
    /// Create a scanner that uses a custom version resolver
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            options: ScanOptions::default(),
            versions: Vec::new(),
            active_version: None,
            active_sub_header: None,
            recognized_level: None,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Level fixed by the first version header, if one was seen
    pub fn recognized_level(&self) -> Option<usize> {
        self.recognized_level
    }

    /// Scan a whole document and return the finished changelog
    pub fn scan(mut self, text: &str) -> Changelog {
        for line in text.lines() {
            self.scan_line(line);
        }
        self.finish()
    }

    /// Feed one line into the state machine
    pub fn scan_line(&mut self, line: &str) {
        let line = line.trim();

        if let Some((level, content)) = self.split_heading(line) {
            if self.scan_header(level, content) {
                return;
            }
        }

        // Ignore anything not nested in a version
        let Some(version_idx) = self.active_version else {
            return;
        };
        let version = &mut self.versions[version_idx];

        if let Some(block_idx) = self.active_sub_header {
            version.push_sub_header_line(block_idx, line);
            return;
        }

        if let Some(rest) = line.strip_prefix(self.options.bullet_marker.as_str()) {
            let entry = classify_entry(rest);
            trace!(
                version = %version.number,
                kind = %entry.kind(),
                change_type = %entry.change_type(),
                "classified change entry"
            );
            version.changes.push(entry);
            return;
        }

        version.blocks.push(BlockBuilder::Text(line.to_string()));
    }

    /// Freeze the scanned versions
    pub fn finish(self) -> Changelog {
        Changelog::new(self.versions.into_iter().map(VersionBuilder::build).collect())
    }

    fn split_heading<'a>(&self, line: &'a str) -> Option<(usize, &'a str)> {
        let marker = self.options.heading_marker;
        let content = line.trim_start_matches(marker);
        let marker_bytes = line.len() - content.len();
        if marker_bytes == 0 {
            return None;
        }

        Some((marker_bytes / marker.len_utf8(), content.trim()))
    }

    /// Returns true if the header was consumed
    fn scan_header(&mut self, level: usize, content: &str) -> bool {
        if let Some((token, rest)) = extract_version_token(content) {
            let resolved = self.resolver.resolve(token);

            if resolved.is_valid() {
                if self.recognized_level.is_none() {
                    debug!(level, "fixed recognized version level");
                    self.recognized_level = Some(level);
                }

                let label = rest
                    .trim()
                    .trim_start_matches(LABEL_SEPARATORS)
                    .trim()
                    .to_string();

                debug!(number = %resolved.number, level, label = %label, "recognized version header");

                self.versions.push(VersionBuilder {
                    number: resolved.number,
                    label,
                    level,
                    changes: Vec::new(),
                    blocks: Vec::new(),
                });
                self.active_version = Some(self.versions.len() - 1);
                self.active_sub_header = None;
                return true;
            }
        }

        // Non-version header at the same or a higher level than the
        // versions: stop capturing.
        if matches!(self.recognized_level, Some(fixed) if level <= fixed) {
            if let Some(idx) = self.active_version {
                debug!(
                    number = %self.versions[idx].number,
                    level,
                    header = content,
                    "header ends version capture"
                );
            }
            self.active_version = None;
            self.active_sub_header = None;
        }

        let Some(version_idx) = self.active_version else {
            return false;
        };

        let marker = self.options.heading_marker;
        let version = &mut self.versions[version_idx];
        debug!(number = %version.number, level, label = content, "recognized sub-header");
        version.blocks.push(BlockBuilder::SubHeader {
            marker,
            level,
            label: content.to_string(),
            lines: Vec::new(),
        });
        self.active_sub_header = Some(version.blocks.len() - 1);
        true
    }
}

/// Find a version token in a header, returning the token (without any `v`
/// prefix) and the text that follows it.
pub fn extract_version_token(content: &str) -> Option<(&str, &str)> {
    let caps = VERSION_HEADER.captures(content)?;
    let token = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((token, rest))
}

/// Mutable version used only while scanning
struct VersionBuilder {
    number: String,
    label: String,
    level: usize,
    changes: Vec<ChangeEntry>,
    blocks: Vec<BlockBuilder>,
}

enum BlockBuilder {
    Text(String),
    SubHeader {
        marker: char,
        level: usize,
        label: String,
        lines: Vec<String>,
    },
}

impl VersionBuilder {
    fn push_sub_header_line(&mut self, block_idx: usize, line: &str) {
        if let Some(BlockBuilder::SubHeader { lines, .. }) = self.blocks.get_mut(block_idx) {
            lines.push(line.to_string());
        }
    }

    fn build(self) -> ChangelogVersion {
        let freeform = self
            .blocks
            .into_iter()
            .map(|block| match block {
                BlockBuilder::Text(line) => FreeformBlock::Text(line),
                BlockBuilder::SubHeader {
                    marker,
                    level,
                    label,
                    lines,
                } => FreeformBlock::SubHeader(SubHeader::new(level, label, lines).with_marker(marker)),
            })
            .collect();

        ChangelogVersion::from_parts(self.number, self.label, self.level, self.changes, freeform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ChangeKind, ChangeType};
    use crate::version::ResolvedVersion;

    fn scan(text: &str) -> Changelog {
        Scanner::new().scan(text)
    }

    #[test]
    fn test_extract_version_token() {
        assert_eq!(extract_version_token("1.2.3 - Label"), Some(("1.2.3", "- Label")));
        assert_eq!(extract_version_token("v2.0"), Some(("2.0", "")));
        assert_eq!(extract_version_token("Version 1.0.0-beta2"), Some(("1.0.0-beta2", "")));
        assert_eq!(extract_version_token("Upgrade notes"), None);
    }

    #[test]
    fn test_versions_in_document_order() {
        let changelog = scan("## v1.0.0\n## v2.0.0\n## v1.5.0\n");
        assert_eq!(changelog.version_numbers(), vec!["1.0.0", "2.0.0", "1.5.0"]);
    }

    #[test]
    fn test_version_label_separators() {
        let changelog = scan("## v1.0.0 - First release\n## v1.1.0 ~ Second\n## v1.2.0 | Third\n## v1.3.0\n");
        let labels: Vec<&str> = changelog.versions().iter().map(|v| v.label()).collect();
        assert_eq!(labels, vec!["First release", "Second", "Third", ""]);
    }

    #[test]
    fn test_entries_are_classified() {
        let changelog = scan(
            "## v1.0.0\n\
             - {C} UI: Added dark mode.\n\
             - (G) Core: Breaking API change.\n\
             - ( ) Note: internal refactor.\n\
             - Changed the default timeout.\n",
        );
        let changes = changelog.versions()[0].changes();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].kind(), ChangeKind::Content);
        assert_eq!(changes[0].change_type(), ChangeType::Optional);
        assert_eq!(changes[1].kind(), ChangeKind::Global);
        assert_eq!(changes[1].change_type(), ChangeType::Mandatory);
        assert_eq!(changes[2].kind(), ChangeKind::Misc);
        assert_eq!(changes[2].change_type(), ChangeType::Neutral);
        assert_eq!(changes[3].category(), "");
        assert_eq!(changes[3].text(), "Changed the default timeout.");
    }

    #[test]
    fn test_content_before_first_version_is_dropped() {
        let changelog = scan("# Changelog\nIntro text\n- Not an entry\n## v1.0.0\nBody\n");
        assert_eq!(changelog.versions().len(), 1);
        let version = &changelog.versions()[0];
        assert!(version.changes().is_empty());
        assert_eq!(version.freeform_text(), "Body");
    }

    #[test]
    fn test_sub_header_swallows_following_lines() {
        let changelog = scan(
            "## v1.0.0\n\
             - Kept entry\n\
             ### Upgrade notes\n\
             - Not an entry\n\
             Some text\n",
        );
        let version = &changelog.versions()[0];
        assert_eq!(version.changes().len(), 1);
        assert_eq!(version.freeform_text(), "### Upgrade notes\n- Not an entry\nSome text");

        let sub = version.sub_headers().next().unwrap();
        assert_eq!(sub.level(), 3);
        assert_eq!(sub.label(), "Upgrade notes");
    }

    #[test]
    fn test_level_fixation_terminates_capture() {
        let changelog = scan(
            "## v1.0.0\n\
             - Entry\n\
             ## Unreleased ideas\n\
             - Ignored\n\
             Ignored text\n\
             ## v0.9.0\n\
             - Captured\n",
        );
        assert_eq!(changelog.versions().len(), 2);
        assert_eq!(changelog.versions()[0].changes().len(), 1);
        assert_eq!(changelog.versions()[0].freeform_text(), "");
        assert_eq!(changelog.versions()[1].changes()[0].text(), "Captured");
    }

    #[test]
    fn test_higher_level_header_terminates_capture() {
        let changelog = scan("### v1.0.0\n- Entry\n# Appendix\n- Ignored\n");
        assert_eq!(changelog.versions()[0].changes().len(), 1);
    }

    #[test]
    fn test_level_is_fixed_by_first_version_only() {
        // The first version fixes level 3; a later level-2 version does not
        // move it, so a level-3 header still ends capture.
        let mut scanner = Scanner::new();
        for line in ["### v2.0.0", "## v1.0.0", "- Entry", "### Notes", "- Ignored"] {
            scanner.scan_line(line);
        }
        assert_eq!(scanner.recognized_level(), Some(3));

        let changelog = scanner.finish();
        let version = changelog.version_by_number("1.0.0").unwrap();
        assert_eq!(version.level(), 2);
        assert_eq!(version.changes().len(), 1);
        assert_eq!(version.freeform_text(), "");
    }

    #[test]
    fn test_deeper_later_version_is_still_captured() {
        let changelog = scan("## 1.0.0\n- First\n#### 1.0.1\n- Second\n");
        assert_eq!(changelog.version_numbers(), vec!["1.0.0", "1.0.1"]);
        assert_eq!(changelog.versions()[1].level(), 4);
        assert_eq!(changelog.versions()[1].changes()[0].text(), "Second");
    }

    #[test]
    fn test_underscore_suffix_keeps_version() {
        let changelog = scan("## v1.0.0\n- A: one\n## v1.1.0_rc_1\n- B: two\n");
        assert_eq!(changelog.version_numbers(), vec!["1.0.0", "1.1.0-rc.1"]);
        assert_eq!(changelog.versions()[1].changes()[0].category(), "B");

        let changelog = scan("## 2.0.0\n- A\n## 1.0.0-rc.01\n- B\n");
        assert_eq!(changelog.version_numbers(), vec!["2.0.0", "1.0.0-rc.1"]);
        assert_eq!(changelog.versions()[0].changes().len(), 1);
        assert_eq!(changelog.versions()[1].changes()[0].text(), "B");
    }

    #[test]
    fn test_new_version_clears_sub_header() {
        let changelog = scan("## v1.1.0\n### Notes\nText\n## v1.0.0\n- Entry\n");
        assert_eq!(changelog.versions()[1].changes().len(), 1);
    }

    #[test]
    fn test_crlf_input() {
        let changelog = scan("## v1.0.0\r\n- {C} UI: Dark mode.\r\nText\r\n");
        let version = &changelog.versions()[0];
        assert_eq!(version.changes()[0].text(), "Dark mode.");
        assert_eq!(version.freeform_text(), "Text");
    }

    #[test]
    fn test_custom_resolver() {
        let resolver = |token: &str| {
            if token.starts_with("20") {
                ResolvedVersion { number: token.to_string(), build: 1 }
            } else {
                ResolvedVersion::invalid(token)
            }
        };
        let changelog = Scanner::with_resolver(resolver).scan("## 2024.01 Winter\n- Entry\n## 1.0.0\n");
        assert_eq!(changelog.version_numbers(), vec!["2024.01"]);
        assert_eq!(changelog.versions()[0].changes().len(), 1);
    }

    #[test]
    fn test_custom_markers() {
        let options = ScanOptions {
            heading_marker: '=',
            bullet_marker: "* ".to_string(),
        };
        let changelog = Scanner::new()
            .with_options(options)
            .scan("== 1.0.0\n* {G} Core: Done\n- plain text\n");
        let version = &changelog.versions()[0];
        assert_eq!(version.level(), 2);
        assert_eq!(version.changes().len(), 1);
        assert_eq!(version.freeform_text(), "- plain text");
    }

    #[test]
    fn test_sub_header_keeps_custom_marker() {
        let options = ScanOptions {
            heading_marker: '=',
            ..ScanOptions::default()
        };
        let changelog = Scanner::new()
            .with_options(options)
            .scan("== 1.0.0\n=== Notes\nbody\n");
        assert_eq!(changelog.versions()[0].freeform_text(), "=== Notes\nbody");
    }
}
