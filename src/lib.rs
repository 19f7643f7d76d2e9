//! Changelog Parser
//!
//! Reads structured markdown changelogs into an ordered list of versions,
//! each holding classified change entries and freeform narrative, and
//! converts that model to and from a JSON interchange form.
//!
//! ## Features
//!
//! - **Version Detection**: Any heading containing a version token starts a version
//! - **Classified Entries**: `{C}`, `(G)`, `( )` markers give each change a kind and type
//! - **Lenient Scanning**: Unrecognized lines are kept as freeform text, never rejected
//! - **Strict Interchange**: Decoding JSON fails on the first structural problem
//!
//! ## Changelog format
//!
//! ```text
//! # Changelog
//!
//! ## v1.2.0 - Spring release
//! - {C} UI: Added dark mode.              content change, optional
//! - (G) Core: Breaking API change.        global change, mandatory
//! - ( ) Note: Internal refactor.          misc change, neutral
//! - Changed the default timeout.          misc change, neutral
//!
//! ### Upgrade notes
//! Lines below a sub-heading belong to it.
//!
//! ## v1.1.0
//! ...
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use changelog_parser::{parse_markdown_file, Changelog};
//!
//! let outcome = parse_markdown_file("CHANGELOG.md");
//! if let Ok(latest) = outcome.changelog().require_latest_version() {
//!     println!("{} has {} changes", latest.number(), latest.changes().len());
//! }
//!
//! let json = outcome.changelog().to_json().unwrap();
//! let restored = Changelog::from_json(&json).unwrap();
//! assert_eq!(restored.version_numbers(), outcome.changelog().version_numbers());
//! ```

pub mod change;
pub mod changelog;
pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod scanner;
pub mod version;

pub use change::{ChangeEntry, ChangeKind, ChangeType};
pub use changelog::Changelog;
pub use codec::{ChangeRecord, VersionRecord};
pub use config::ChangelogConfig;
pub use error::{ChangelogError, Result};
pub use reader::{parse_markdown_file, JsonReader, MarkdownReader, ReadOutcome};
pub use scanner::{ScanOptions, Scanner};
pub use version::{
    ChangelogVersion, FreeformBlock, ResolvedVersion, SemverResolver, SubHeader, VersionResolver,
};
