//! Unit tests for data models module
//!
//! Validates suite-document decoding: tagged check selection, load-time
//! rejection of malformed cases, and field defaults.

use super::*;
use serde_json::json;

fn case_from(value: serde_json::Value) -> Result<TestCase, String> {
    serde_json::from_value::<TestCase>(value).map_err(|err| err.to_string())
}

#[test]
fn profile_case_decodes_with_defaults() {
    let case = case_from(json!({
        "name": "new default profile",
        "cmds": [["new-profile"]],
        "result_path": "default.json",
        "result": {"encrypted": false, "notes": []}
    }))
    .unwrap();

    assert_eq!(case.name, "new default profile");
    assert!(case.profile.is_none());
    assert!(case.profile_folder.is_none());
    assert!(case.stdin.is_empty());
    assert!(case.cmd_interval.is_none());
    assert!(!case.should_fail);
    match case.check {
        CheckSpec::Profile {
            result_path,
            expected,
            passphrase,
        } => {
            assert_eq!(result_path, "default.json");
            assert!(!expected.encrypted);
            assert!(expected.notes.is_empty());
            assert!(passphrase.is_none());
        }
        other => panic!("expected profile check, got {other:?}"),
    }
}

#[test]
fn expected_note_defaults_last_touched() {
    let case = case_from(json!({
        "name": "single note",
        "cmds": [["new-profile"], ["add", "a title"]],
        "result_path": "default.json",
        "result": {
            "encrypted": false,
            "notes": [{"id": 1, "title": "a title", "status": "", "body": ""}]
        }
    }))
    .unwrap();

    match case.check {
        CheckSpec::Profile { expected, .. } => {
            assert_eq!(expected.notes[0].last_touched, "");
        }
        other => panic!("expected profile check, got {other:?}"),
    }
}

#[test]
fn json_case_decodes_mixed_expectations() {
    let case = case_from(json!({
        "name": "list as json",
        "cmds": [["new-profile"], ["view", "1", "-j"], ["list", "-j"]],
        "result_type": "json",
        "results": [
            null,
            {"id": 1, "title": "a", "status": "", "body": ""},
            [null, {"id": 2, "title": "b", "status": "", "body": ""}]
        ]
    }))
    .unwrap();

    match case.check {
        CheckSpec::JsonFragments { expected } => {
            assert_eq!(expected.len(), 3);
            assert!(expected[0].is_none());
            assert!(matches!(expected[1], Some(JsonExpectation::One(_))));
            match &expected[2] {
                Some(JsonExpectation::Many(list)) => {
                    assert_eq!(list.len(), 2);
                    assert!(list[0].is_none());
                    assert_eq!(list[1].as_ref().unwrap().id, 2);
                }
                other => panic!("expected note list, got {other:?}"),
            }
        }
        other => panic!("expected json check, got {other:?}"),
    }
}

#[test]
fn text_case_decodes_strings_and_skips() {
    let case = case_from(json!({
        "name": "text list",
        "cmds": [["new-profile"], ["list"]],
        "result_type": "text",
        "results": [null, "1: a title\n"]
    }))
    .unwrap();

    match case.check {
        CheckSpec::TextFragments { expected } => {
            assert_eq!(expected, vec![None, Some("1: a title\n".to_string())]);
        }
        other => panic!("expected text check, got {other:?}"),
    }
}

#[test]
fn profile_case_requires_result_path() {
    let err = case_from(json!({
        "name": "broken",
        "cmds": [["new-profile"]],
        "result": {"encrypted": false, "notes": []}
    }))
    .unwrap_err();
    assert!(err.contains("broken"));
    assert!(err.contains("result_path"));
}

#[test]
fn encrypted_result_requires_passphrase() {
    let err = case_from(json!({
        "name": "enc",
        "cmds": [["new-profile", "--encrypted", "-k", "DEBUG"]],
        "result_path": "default.json",
        "result": {"encrypted": true, "notes": []}
    }))
    .unwrap_err();
    assert!(err.contains("result_passphrase"));
}

#[test]
fn stdin_length_must_match_cmds() {
    let err = case_from(json!({
        "name": "staged",
        "cmds": [["new-profile"], ["add", "t", "--stdin-body"]],
        "stdin": ["only one"],
        "result_path": "default.json",
        "result": {"encrypted": false, "notes": []}
    }))
    .unwrap_err();
    assert!(err.contains("stdin has 1 entries for 2 cmds"));
}

#[test]
fn empty_cmds_accepted() {
    // A case may run no commands at all; a fragment check with an empty
    // expectation list then passes vacuously.
    let case = case_from(json!({
        "name": "no cmds",
        "cmds": [],
        "result_type": "text",
        "results": []
    }))
    .unwrap();
    assert!(case.cmds.is_empty());
    match case.check {
        CheckSpec::TextFragments { expected } => assert!(expected.is_empty()),
        other => panic!("expected text check, got {other:?}"),
    }
}

#[test]
fn unknown_result_type_rejected() {
    let err = case_from(json!({
        "name": "odd",
        "cmds": [["list"]],
        "result_type": "xml",
        "results": []
    }))
    .unwrap_err();
    assert!(err.contains("unknown result_type 'xml'"));
}

#[test]
fn negative_cmd_interval_rejected() {
    let err = case_from(json!({
        "name": "bad wait",
        "cmds": [["list"]],
        "cmd_interval": -0.5,
        "result_type": "text",
        "results": [null]
    }))
    .unwrap_err();
    assert!(err.contains("cmd_interval"));
}

#[test]
fn cmd_interval_converts_to_duration() {
    let case = case_from(json!({
        "name": "wait",
        "cmds": [["list"]],
        "cmd_interval": 0.25,
        "result_type": "text",
        "results": [null]
    }))
    .unwrap();
    assert_eq!(case.cmd_interval, Some(Duration::from_millis(250)));
}

#[test]
fn unknown_case_keys_rejected() {
    let err = case_from(json!({
        "name": "stray",
        "cmds": [["list"]],
        "result_path": "default.json",
        "result": {"encrypted": false, "notes": []},
        "retries": 3
    }))
    .unwrap_err();
    assert!(err.contains("retries"));
}

#[test]
fn suite_accepts_desc_and_description() {
    let doc = json!({
        "title": "profile tests",
        "desc": "basic profile behavior",
        "tests": []
    });
    let suite: TestSuite = serde_json::from_value(doc).unwrap();
    assert_eq!(suite.desc, "basic profile behavior");

    let doc = json!({
        "title": "profile tests",
        "description": "long-form key",
        "tests": []
    });
    let suite: TestSuite = serde_json::from_value(doc).unwrap();
    assert_eq!(suite.desc, "long-form key");
}

#[test]
fn note_roundtrips_through_json() {
    let note = Note {
        id: 4,
        title: "a title".to_string(),
        status: "Urgent".to_string(),
        body: "some body".to_string(),
        last_touched: "2024-01-15 09:30:00 +0000".to_string(),
    };
    let text = serde_json::to_string(&note).unwrap();
    let back: Note = serde_json::from_str(&text).unwrap();
    assert_eq!(note, back);
}
