//! Changelog readers
//!
//! Thin adapters that feed a source into the scanner or the codec. The
//! markdown reader never fails outright: an unreadable file produces an
//! invalid [`ReadOutcome`] with an empty changelog. The JSON reader hands the
//! codec's strict errors straight back to the caller.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::changelog::Changelog;
use crate::codec::{self, VersionRecord};
use crate::error::{ChangelogError, Result};
use crate::scanner::{ScanOptions, Scanner};
use crate::version::ChangelogVersion;

/// Result of reading a changelog, with its validity fixed at construction
#[derive(Debug)]
pub struct ReadOutcome {
    changelog: Changelog,
    error: Option<ChangelogError>,
}

impl ReadOutcome {
    pub fn valid(changelog: Changelog) -> Self {
        Self {
            changelog,
            error: None,
        }
    }

    /// An invalid outcome always carries an empty changelog
    pub fn invalid(error: ChangelogError) -> Self {
        Self {
            changelog: Changelog::default(),
            error: Some(error),
        }
    }

    pub fn from_result(result: Result<Changelog>) -> Self {
        match result {
            Ok(changelog) => Self::valid(changelog),
            Err(error) => Self::invalid(error),
        }
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ChangelogError> {
        self.error.as_ref()
    }

    /// Error message, empty when valid
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Error code, zero when valid
    pub fn error_code(&self) -> u32 {
        self.error.as_ref().map_or(0, ChangelogError::code)
    }

    pub fn into_result(self) -> Result<Changelog> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.changelog),
        }
    }
}

/// Reads markdown changelogs
#[derive(Debug, Clone, Default)]
pub struct MarkdownReader {
    options: ScanOptions,
}

impl MarkdownReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Parse markdown text
    pub fn read_str(&self, text: &str) -> ReadOutcome {
        ReadOutcome::valid(Scanner::new().with_options(self.options.clone()).scan(text))
    }

    /// Parse a markdown file
    pub fn read_file(&self, path: impl AsRef<Path>) -> ReadOutcome {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "changelog file could not be read");
                return ReadOutcome::invalid(ChangelogError::SourceUnavailable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        debug!(path = %path.display(), bytes = text.len(), "read changelog file");
        self.read_str(&text)
    }
}

/// Reads changelogs from their JSON interchange form
pub struct JsonReader;

impl JsonReader {
    pub fn read_str(json: &str) -> Result<Changelog> {
        Changelog::from_json(json)
    }

    pub fn read_value(value: &serde_json::Value) -> Result<Changelog> {
        codec::decode_changelog(value)
    }

    pub fn read_records(records: Vec<VersionRecord>) -> Result<Changelog> {
        records
            .into_iter()
            .map(ChangelogVersion::try_from)
            .collect()
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Changelog> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ChangelogError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "read changelog JSON file");
        Self::read_str(&json)
    }
}

/// Parse a markdown changelog file with default settings
pub fn parse_markdown_file(path: impl AsRef<Path>) -> ReadOutcome {
    MarkdownReader::new().read_file(path)
}
