//! Interchange records
//!
//! Converts a [`Changelog`] to and from an ordered list of plain records,
//! with JSON as the reference text form:
//!
//! ```json
//! [
//!   {
//!     "number": "1.1.5",
//!     "changes": [
//!       { "id": "ContentChange", "type": "optional", "category": "UI", "text": "Added dark mode." }
//!     ]
//!   }
//! ]
//! ```
//!
//! Only version numbers and change entries are recorded. Version labels,
//! heading levels, freeform text and sub-headers are left out, so a decoded
//! changelog has none of them.
//!
//! Decoding is strict: records are expected to be machine-written, and the
//! first structural problem is returned as an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::change::{ChangeEntry, ChangeKind, ChangeType};
use crate::changelog::Changelog;
use crate::error::{ChangelogError, Result};
use crate::version::ChangelogVersion;

pub const SERIALIZED_NUMBER: &str = "number";
pub const SERIALIZED_CHANGES: &str = "changes";

pub const SERIALIZED_ID: &str = "id";
pub const SERIALIZED_TYPE: &str = "type";
pub const SERIALIZED_CATEGORY: &str = "category";
pub const SERIALIZED_TEXT: &str = "text";

/// Flat record of a single change entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Stable identifier of the change kind
    pub id: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub category: String,
    pub text: String,
}

/// Record of a version and its changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub number: String,
    pub changes: Vec<ChangeRecord>,
}

impl From<&ChangeEntry> for ChangeRecord {
    fn from(entry: &ChangeEntry) -> Self {
        Self {
            id: entry.kind().tag().to_string(),
            change_type: entry.change_type(),
            category: entry.category().to_string(),
            text: entry.text().to_string(),
        }
    }
}

impl TryFrom<ChangeRecord> for ChangeEntry {
    type Error = ChangelogError;

    fn try_from(record: ChangeRecord) -> Result<Self> {
        let kind = ChangeKind::from_tag(&record.id)?;
        Ok(ChangeEntry::new(kind, record.change_type, record.category, record.text))
    }
}

impl From<&ChangelogVersion> for VersionRecord {
    fn from(version: &ChangelogVersion) -> Self {
        Self {
            number: version.number().to_string(),
            changes: version.changes().iter().map(ChangeRecord::from).collect(),
        }
    }
}

impl TryFrom<VersionRecord> for ChangelogVersion {
    type Error = ChangelogError;

    fn try_from(record: VersionRecord) -> Result<Self> {
        let changes = record
            .changes
            .into_iter()
            .map(ChangeEntry::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ChangelogVersion::new(record.number, changes))
    }
}

pub fn encode_changelog(changelog: &Changelog) -> Vec<VersionRecord> {
    changelog.versions().iter().map(VersionRecord::from).collect()
}

/// Decode a list of version records
pub fn decode_changelog(value: &Value) -> Result<Changelog> {
    let items = value.as_array().ok_or_else(|| ChangelogError::InvalidJsonData {
        details: format!("Did not decode into a list, got {}.", value_kind(value)),
    })?;

    let versions = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let data = item.as_object().ok_or_else(|| ChangelogError::InvalidJsonData {
                details: format!("Version #{} is {}, not a record.", idx + 1, value_kind(item)),
            })?;
            decode_version(data)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(versions = versions.len(), "decoded changelog records");

    Ok(Changelog::new(versions))
}

/// Decode a single version record
pub fn decode_version(data: &Map<String, Value>) -> Result<ChangelogVersion> {
    require_keys(data, &[SERIALIZED_NUMBER, SERIALIZED_CHANGES])?;

    let (Some(number), Some(changes)) = (
        data[SERIALIZED_NUMBER].as_str(),
        data[SERIALIZED_CHANGES].as_array(),
    ) else {
        return Err(ChangelogError::InvalidSerializedKeyTypes {
            details: format!(
                "[{}] must be a string and [{}] a list, got {} and {}; keys present: [{}].",
                SERIALIZED_NUMBER,
                SERIALIZED_CHANGES,
                value_kind(&data[SERIALIZED_NUMBER]),
                value_kind(&data[SERIALIZED_CHANGES]),
                present_keys(data),
            ),
        });
    };

    let changes = changes
        .iter()
        .map(|change| {
            let record = change.as_object().ok_or_else(|| {
                ChangelogError::InvalidSerializedKeyTypes {
                    details: format!(
                        "Changes of version [{}] must be records, got {}.",
                        number,
                        value_kind(change)
                    ),
                }
            })?;
            decode_change(record)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChangelogVersion::new(number, changes))
}

/// Decode a single change record
pub fn decode_change(data: &Map<String, Value>) -> Result<ChangeEntry> {
    require_keys(
        data,
        &[SERIALIZED_ID, SERIALIZED_TYPE, SERIALIZED_CATEGORY, SERIALIZED_TEXT],
    )?;

    let id = string_field(data, SERIALIZED_ID)?;
    let kind = ChangeKind::from_tag(id)?;

    let change_type: ChangeType = serde_json::from_value(data[SERIALIZED_TYPE].clone())
        .map_err(|_| ChangelogError::InvalidSerializedKeyTypes {
            details: format!(
                "[{}] must be one of neutral, optional, mandatory, got {}.",
                SERIALIZED_TYPE, data[SERIALIZED_TYPE]
            ),
        })?;

    Ok(ChangeEntry::new(
        kind,
        change_type,
        string_field(data, SERIALIZED_CATEGORY)?,
        string_field(data, SERIALIZED_TEXT)?,
    ))
}

/// Missing and null keys both count as absent
fn require_keys(data: &Map<String, Value>, expected: &[&str]) -> Result<()> {
    let complete = expected
        .iter()
        .all(|key| data.get(*key).is_some_and(|value| !value.is_null()));

    if complete {
        return Ok(());
    }

    Err(ChangelogError::MissingSerializedKeys {
        expected: expected.iter().map(|key| key.to_string()).collect(),
        present: data.keys().cloned().collect(),
    })
}

fn present_keys(data: &Map<String, Value>) -> String {
    data.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn string_field<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    data[key]
        .as_str()
        .ok_or_else(|| ChangelogError::InvalidSerializedKeyTypes {
            details: format!("[{}] must be a string, got {}.", key, value_kind(&data[key])),
        })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a record",
    }
}
