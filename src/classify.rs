//! Change Entry Classification
//!
//! Turns the remainder of a bullet line (everything after the bullet marker)
//! into a [`ChangeEntry`]. Two syntaxes are recognized, tried in order:
//!
//! 1. Bracketed: `{C} Category: Text`, `(G) Category: Text`, `( ) Category: Text`
//! 2. Plain: `Category: Text`, or just `Text`
//!
//! Classification never fails. Anything that is not bracketed ends up as a
//! neutral misc change.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::change::{ChangeEntry, ChangeKind, ChangeType, LETTER_EMPTY};

static BRACKETED_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A([{(])(.)([})])([^:]*):(.*)\z").unwrap());

/// Classify the remainder of a bullet line
pub fn classify_entry(line: &str) -> ChangeEntry {
    if let Some(entry) = classify_bracketed(line) {
        return entry;
    }

    classify_plain(line)
}

/// Bracketed syntax: `<open><scope><close><category>:<text>`
///
/// Only `{…}` and `(…)` count, and the closing bracket must match the
/// opening one.
pub fn classify_bracketed(line: &str) -> Option<ChangeEntry> {
    let caps = BRACKETED_ENTRY.captures(line)?;

    let open = caps[1].chars().next()?;
    let letter = caps[2].chars().next()?;
    let close = caps[3].chars().next()?;

    if closing_bracket(open) != Some(close) {
        return None;
    }

    Some(ChangeEntry::from_markers(
        Some(open),
        letter,
        caps[4].trim(),
        caps[5].trim(),
    ))
}

/// Plain syntax: split on the first colon, or take the whole line as text
pub fn classify_plain(line: &str) -> ChangeEntry {
    let line = line.trim_matches(|c: char| c == '-' || c.is_whitespace());

    let (category, text) = match line.split_once(':') {
        Some((category, text)) => (category.trim(), text.trim()),
        None => ("", line),
    };

    ChangeEntry::new(
        ChangeKind::from_letter(LETTER_EMPTY),
        ChangeType::Neutral,
        category,
        text,
    )
}

fn closing_bracket(open: char) -> Option<char> {
    match open {
        '{' => Some('}'),
        '(' => Some(')'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_optional() {
        let entry = classify_entry("{C} UI: Added dark mode.");
        assert_eq!(entry.kind(), ChangeKind::Content);
        assert_eq!(entry.change_type(), ChangeType::Optional);
        assert_eq!(entry.category(), "UI");
        assert_eq!(entry.text(), "Added dark mode.");
    }

    #[test]
    fn test_global_mandatory() {
        let entry = classify_entry("(G) Core: Breaking API change.");
        assert_eq!(entry.kind(), ChangeKind::Global);
        assert_eq!(entry.change_type(), ChangeType::Mandatory);
        assert_eq!(entry.category(), "Core");
        assert_eq!(entry.text(), "Breaking API change.");
    }

    #[test]
    fn test_blank_scope_is_neutral() {
        let entry = classify_entry("( ) Note: internal refactor.");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.change_type(), ChangeType::Neutral);
        assert_eq!(entry.category(), "Note");
        assert_eq!(entry.text(), "internal refactor.");
    }

    #[test]
    fn test_optional_with_blank_scope() {
        let entry = classify_entry("{ } Docs: Typo fixes.");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.change_type(), ChangeType::Optional);
    }

    #[test]
    fn test_unknown_scope_letter_is_misc() {
        let entry = classify_entry("(X) Build: New pipeline.");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.change_type(), ChangeType::Mandatory);
        assert_eq!(entry.category(), "Build");
    }

    #[test]
    fn test_no_colon() {
        let entry = classify_entry("Changed the default timeout.");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.change_type(), ChangeType::Neutral);
        assert_eq!(entry.category(), "");
        assert_eq!(entry.text(), "Changed the default timeout.");
    }

    #[test]
    fn test_plain_splits_on_first_colon() {
        let entry = classify_entry("Links: See https://example.com for details");
        assert_eq!(entry.category(), "Links");
        assert_eq!(entry.text(), "See https://example.com for details");
    }

    #[test]
    fn test_bracketed_text_keeps_later_colons() {
        let entry = classify_entry("{G} Docs: Moved to https://example.com");
        assert_eq!(entry.category(), "Docs");
        assert_eq!(entry.text(), "Moved to https://example.com");
    }

    #[test]
    fn test_mismatched_brackets_fall_back_to_plain() {
        let entry = classify_entry("{C) UI: Added dark mode.");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.change_type(), ChangeType::Neutral);
        assert_eq!(entry.category(), "{C) UI");
    }

    #[test]
    fn test_bracketed_without_colon_falls_back() {
        let entry = classify_entry("(G) Everything changed");
        assert_eq!(entry.kind(), ChangeKind::Misc);
        assert_eq!(entry.category(), "");
        assert_eq!(entry.text(), "(G) Everything changed");
    }

    #[test]
    fn test_empty_parts_are_kept() {
        let entry = classify_entry("{C} :");
        assert_eq!(entry.kind(), ChangeKind::Content);
        assert_eq!(entry.category(), "");
        assert_eq!(entry.text(), "");
    }
}
