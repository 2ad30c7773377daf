//! Comparison module
//!
//! Structural comparison of expected fixtures against what the target
//! binary actually produced:
//! - whole profiles (encrypted flag, note count, then notes pairwise)
//! - single notes (`last_touched` excluded; timestamps differ across runs)
//! - captured output fragments, parsed as JSON or compared as raw text
//!
//! Every mismatch renders both sides as pretty JSON so a failing case can
//! be diagnosed from the report alone.

use crate::codec::DecodeError;
use crate::models::{JsonExpectation, Note, Profile};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Expected and actual structures diverged.
#[derive(Debug, Error)]
#[error("# EXPECTED #\n{}\n# GOT #\n{}", render(.expected), render(.actual))]
pub struct CompareError {
    pub expected: Value,
    pub actual: Value,
}

/// Failure while checking one captured output fragment: the output either
/// would not parse or did not match.
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Compare(#[from] CompareError),
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn mismatch<E: Serialize, A: Serialize>(expected: &E, actual: &A) -> CompareError {
    CompareError {
        expected: serde_json::to_value(expected).unwrap_or(Value::Null),
        actual: serde_json::to_value(actual).unwrap_or(Value::Null),
    }
}

/// Compare two profiles: equal `encrypted` flags, equal note counts, then
/// notes pairwise by position.
pub fn compare_profiles(expected: &Profile, actual: &Profile) -> Result<(), CompareError> {
    if expected.encrypted != actual.encrypted || expected.notes.len() != actual.notes.len() {
        return Err(mismatch(expected, actual));
    }
    for (clean, dirty) in expected.notes.iter().zip(&actual.notes) {
        compare_notes(clean, dirty)?;
    }
    Ok(())
}

/// Compare two notes on `id`, `title`, `status` and `body`. `last_touched`
/// is excluded: it changes on every run.
pub fn compare_notes(expected: &Note, actual: &Note) -> Result<(), CompareError> {
    let equal = expected.id == actual.id
        && expected.title == actual.title
        && expected.status == actual.status
        && expected.body == actual.body;
    if equal {
        Ok(())
    } else {
        Err(mismatch(expected, actual))
    }
}

/// Parse one captured stdout as JSON and compare it against its
/// expectation: a single note, or a note list matched element-wise with
/// `null` entries skipping their position.
pub fn compare_json_fragment(expected: &JsonExpectation, raw: &str) -> Result<(), FragmentError> {
    match expected {
        JsonExpectation::One(note) => {
            let actual: Note = serde_json::from_str(raw).map_err(DecodeError::from)?;
            compare_notes(note, &actual)?;
        }
        JsonExpectation::Many(list) => {
            let actual: Vec<Note> = serde_json::from_str(raw).map_err(DecodeError::from)?;
            if list.len() != actual.len() {
                return Err(mismatch(list, &actual).into());
            }
            for (clean, dirty) in list.iter().zip(&actual) {
                if let Some(clean) = clean {
                    compare_notes(clean, dirty)?;
                }
            }
        }
    }
    Ok(())
}

/// Compare one captured stdout against an expected string, verbatim.
pub fn compare_text_fragment(expected: &str, raw: &str) -> Result<(), CompareError> {
    if expected == raw {
        Ok(())
    } else {
        Err(mismatch(&expected, &raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            status: "".to_string(),
            body: "".to_string(),
            last_touched: "2024-01-15 09:30:00 +0000".to_string(),
        }
    }

    #[test]
    fn note_comparison_is_reflexive() {
        let n = note(1, "a title");
        assert!(compare_notes(&n, &n).is_ok());
    }

    #[test]
    fn note_comparison_ignores_last_touched() {
        let clean = note(1, "a title");
        let mut dirty = clean.clone();
        dirty.last_touched = "2031-12-01 00:00:00 +0000".to_string();
        assert!(compare_notes(&clean, &dirty).is_ok());
    }

    #[test]
    fn each_compared_field_can_fail_alone() {
        let clean = note(1, "a title");

        let mut dirty = clean.clone();
        dirty.id = 2;
        assert!(compare_notes(&clean, &dirty).is_err());

        let mut dirty = clean.clone();
        dirty.title = "another title".to_string();
        assert!(compare_notes(&clean, &dirty).is_err());

        let mut dirty = clean.clone();
        dirty.status = "Urgent".to_string();
        assert!(compare_notes(&clean, &dirty).is_err());

        let mut dirty = clean.clone();
        dirty.body = "changed".to_string();
        assert!(compare_notes(&clean, &dirty).is_err());
    }

    #[test]
    fn mismatch_renders_both_sides() {
        let clean = note(1, "a title");
        let mut dirty = clean.clone();
        dirty.title = "wrong".to_string();
        let err = compare_notes(&clean, &dirty).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("# EXPECTED #"));
        assert!(message.contains("# GOT #"));
        assert!(message.contains("a title"));
        assert!(message.contains("wrong"));
    }

    #[test]
    fn profile_comparison_checks_flag_and_count() {
        let clean = Profile {
            encrypted: false,
            notes: vec![note(1, "a")],
        };
        let mut dirty = clean.clone();
        assert!(compare_profiles(&clean, &dirty).is_ok());

        dirty.encrypted = true;
        assert!(compare_profiles(&clean, &dirty).is_err());

        dirty.encrypted = false;
        dirty.notes.push(note(2, "b"));
        assert!(compare_profiles(&clean, &dirty).is_err());
    }

    #[test]
    fn json_fragment_single_note() {
        let expected = JsonExpectation::One(note(1, "a title"));
        let raw = r#"{"id": 1, "title": "a title", "status": "", "body": "", "last_touched": "2030-01-01 00:00:00 +0000"}"#;
        assert!(compare_json_fragment(&expected, raw).is_ok());
    }

    #[test]
    fn json_fragment_list_with_skips() {
        let expected = JsonExpectation::Many(vec![None, Some(note(2, "b"))]);
        let raw = r#"[
            {"id": 1, "title": "anything", "status": "", "body": "", "last_touched": "2030-01-01 00:00:00 +0000"},
            {"id": 2, "title": "b", "status": "", "body": "", "last_touched": "2030-01-01 00:00:00 +0000"}
        ]"#;
        assert!(compare_json_fragment(&expected, raw).is_ok());
    }

    #[test]
    fn json_fragment_length_mismatch_fails() {
        let expected = JsonExpectation::Many(vec![Some(note(1, "a"))]);
        let raw = "[]";
        let err = compare_json_fragment(&expected, raw).unwrap_err();
        assert!(matches!(err, FragmentError::Compare(_)));
    }

    #[test]
    fn json_fragment_parse_failure_is_decode_error() {
        let expected = JsonExpectation::Many(vec![]);
        let err = compare_json_fragment(&expected, "not json").unwrap_err();
        assert!(matches!(err, FragmentError::Decode(_)));
    }

    #[test]
    fn text_fragment_requires_exact_match() {
        assert!(compare_text_fragment("1: a title\n", "1: a title\n").is_ok());
        let err = compare_text_fragment("1: a title\n", "1: a title").unwrap_err();
        assert!(err.to_string().contains("# EXPECTED #"));
    }
}
