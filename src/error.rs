//! Error types for the changelog parser

use thiserror::Error;

/// Result type for changelog operations
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Changelog parser errors
///
/// Every variant carries a stable numeric code (see [`ChangelogError::code`])
/// so callers can tell failure kinds apart without matching on messages.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("The changelog source could not be read: {path} ({reason})")]
    SourceUnavailable { path: String, reason: String },

    #[error("No last version available in the changelog.")]
    NoVersionsAvailable,

    #[error("The version number [{number}] does not exist. Available numbers are [{}].", .available.join(", "))]
    VersionNotFound { number: String, available: Vec<String> },

    #[error("The ID [{tag}] does not match any known change classes.")]
    UnknownVariantTag { tag: String },

    #[error("Missing keys in serialized data. Looking for [{}], keys present: [{}].", .expected.join(", "), .present.join(", "))]
    MissingSerializedKeys {
        expected: Vec<String>,
        present: Vec<String>,
    },

    #[error("Invalid key data types in serialized data: {details}")]
    InvalidSerializedKeyTypes { details: String },

    #[error("Invalid JSON data: {details}")]
    InvalidJsonData { details: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChangelogError {
    pub const CODE_NO_VERSIONS_AVAILABLE: u32 = 123101;
    pub const CODE_VERSION_NOT_FOUND: u32 = 123102;
    pub const CODE_UNKNOWN_VARIANT_TAG: u32 = 123601;
    pub const CODE_INVALID_JSON_DATA: u32 = 123701;
    pub const CODE_JSON: u32 = 123702;
    pub const CODE_IO: u32 = 123703;
    pub const CODE_MISSING_SERIALIZED_KEYS: u32 = 133501;
    pub const CODE_INVALID_SERIALIZED_KEY_TYPES: u32 = 133502;
    pub const CODE_SOURCE_UNAVAILABLE: u32 = 134701;

    /// Stable numeric code for this error
    pub fn code(&self) -> u32 {
        match self {
            ChangelogError::SourceUnavailable { .. } => Self::CODE_SOURCE_UNAVAILABLE,
            ChangelogError::NoVersionsAvailable => Self::CODE_NO_VERSIONS_AVAILABLE,
            ChangelogError::VersionNotFound { .. } => Self::CODE_VERSION_NOT_FOUND,
            ChangelogError::UnknownVariantTag { .. } => Self::CODE_UNKNOWN_VARIANT_TAG,
            ChangelogError::MissingSerializedKeys { .. } => Self::CODE_MISSING_SERIALIZED_KEYS,
            ChangelogError::InvalidSerializedKeyTypes { .. } => {
                Self::CODE_INVALID_SERIALIZED_KEY_TYPES
            }
            ChangelogError::InvalidJsonData { .. } => Self::CODE_INVALID_JSON_DATA,
            ChangelogError::Json(_) => Self::CODE_JSON,
            ChangelogError::Io(_) => Self::CODE_IO,
        }
    }
}
