//! Change entry types
//!
//! A change entry is one bullet line of a version, classified by the bracket
//! and scope letter it was written with:
//!
//! ```text
//! - {C} UI: Added dark mode.          content, optional
//! - (G) Core: Breaking API change.    global, mandatory
//! - ( ) Note: internal refactor.      misc, neutral
//! - Changed the default timeout.      misc, neutral
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChangelogError, Result};

/// Scope letter of a content change
pub const LETTER_CONTENT: char = 'C';
/// Scope letter of a global change
pub const LETTER_GLOBAL: char = 'G';
/// Blank scope letter
pub const LETTER_EMPTY: char = ' ';

/// Opening bracket marking an optional change
pub const CHAR_OPTION: char = '{';
/// Opening bracket marking a mandatory change (unless the scope is blank)
pub const CHAR_MANDATORY: char = '(';

/// Which part of the system a change applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Content-scoped change (`C`)
    Content,
    /// Global/system-scoped change (`G`)
    Global,
    /// Unclassified change (blank or any other letter)
    Misc,
}

impl ChangeKind {
    /// All kinds, in declaration order
    pub const ALL: [ChangeKind; 3] = [ChangeKind::Content, ChangeKind::Global, ChangeKind::Misc];

    /// Resolve the kind from a scope letter
    pub fn from_letter(letter: char) -> Self {
        match letter {
            LETTER_CONTENT => ChangeKind::Content,
            LETTER_GLOBAL => ChangeKind::Global,
            _ => ChangeKind::Misc,
        }
    }

    /// Stable identifier used in the interchange format
    pub fn tag(&self) -> &'static str {
        match self {
            ChangeKind::Content => "ContentChange",
            ChangeKind::Global => "GlobalChange",
            ChangeKind::Misc => "MiscChange",
        }
    }

    /// Look up a kind by its interchange identifier
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| ChangelogError::UnknownVariantTag {
                tag: tag.to_string(),
            })
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// How strongly a change affects users of the versioned artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Neutral,
    Optional,
    Mandatory,
}

impl ChangeType {
    /// Resolve the type from the opening bracket and scope letter.
    ///
    /// `None` means the entry had no brackets at all.
    pub fn from_markers(bracket: Option<char>, letter: char) -> Self {
        match bracket {
            Some(CHAR_OPTION) => ChangeType::Optional,
            Some(CHAR_MANDATORY) if letter == LETTER_EMPTY => ChangeType::Neutral,
            Some(CHAR_MANDATORY) => ChangeType::Mandatory,
            _ => ChangeType::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Neutral => "neutral",
            ChangeType::Optional => "optional",
            ChangeType::Mandatory => "mandatory",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single classified change of a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    kind: ChangeKind,
    change_type: ChangeType,
    category: String,
    text: String,
}

impl ChangeEntry {
    /// Create an entry from already resolved parts
    pub fn new(
        kind: ChangeKind,
        change_type: ChangeType,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            change_type,
            category: category.into(),
            text: text.into(),
        }
    }

    /// Create an entry from the markers found in a changelog line
    pub fn from_markers(
        bracket: Option<char>,
        letter: char,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            ChangeKind::from_letter(letter),
            ChangeType::from_markers(bracket, letter),
            category,
            text,
        )
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_neutral(&self) -> bool {
        self.change_type == ChangeType::Neutral
    }

    pub fn is_optional(&self) -> bool {
        self.change_type == ChangeType::Optional
    }

    pub fn is_mandatory(&self) -> bool {
        self.change_type == ChangeType::Mandatory
    }
}
