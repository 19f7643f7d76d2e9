//! Changelog document
//!
//! An ordered list of versions, in the order they appear in the source.
//! The first version is treated as the latest one; versions are never sorted.

use crate::codec::{self, VersionRecord};
use crate::error::{ChangelogError, Result};
use crate::scanner::Scanner;
use crate::version::ChangelogVersion;

/// A parsed changelog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    versions: Vec<ChangelogVersion>,
}

impl Changelog {
    pub fn new(versions: Vec<ChangelogVersion>) -> Self {
        Self { versions }
    }

    /// Parse markdown text with the default scanner
    pub fn parse(text: &str) -> Self {
        Scanner::new().scan(text)
    }

    pub fn versions(&self) -> &[ChangelogVersion] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// The first version of the document, if any
    pub fn latest_version(&self) -> Option<&ChangelogVersion> {
        self.versions.first()
    }

    /// The first version of the document, or an error if there is none
    pub fn require_latest_version(&self) -> Result<&ChangelogVersion> {
        self.latest_version()
            .ok_or(ChangelogError::NoVersionsAvailable)
    }

    /// Check whether a full version number (e.g., "4.5.2") exists
    pub fn version_exists(&self, number: &str) -> bool {
        self.versions.iter().any(|v| v.number() == number)
    }

    /// Get a version by its full number (e.g., "4.5.2")
    pub fn version_by_number(&self, number: &str) -> Result<&ChangelogVersion> {
        self.versions
            .iter()
            .find(|v| v.number() == number)
            .ok_or_else(|| ChangelogError::VersionNotFound {
                number: number.to_string(),
                available: self.version_numbers(),
            })
    }

    /// All version numbers in document order
    pub fn version_numbers(&self) -> Vec<String> {
        self.versions.iter().map(|v| v.number().to_string()).collect()
    }

    // Persistence

    pub fn to_records(&self) -> Vec<VersionRecord> {
        codec::encode_changelog(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        codec::decode_changelog(value)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

impl FromIterator<ChangelogVersion> for Changelog {
    fn from_iter<I: IntoIterator<Item = ChangelogVersion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
