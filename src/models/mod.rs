//! Data models module
//!
//! Defines core data structures:
//! - Note / Profile: the persisted note format produced by the target binary
//! - TestSuite / TestCase: one suite document and its test cases
//! - CheckSpec: what a case verifies (profile file, JSON output, text output)
//!
//! Suite documents are validated while decoding: a malformed test case is
//! rejected with a field-level message before any command runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single note inside a profile.
///
/// `id` and `status` stay loosely typed on purpose: a negative id or an
/// unknown status must surface as an invariant violation with a note index,
/// not as a JSON decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub body: String,
    /// Expected fixtures embedded in suite documents omit this field;
    /// comparison ignores it either way.
    #[serde(default)]
    pub last_touched: String,
}

/// A decoded profile file: the full on-disk note collection for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub encrypted: bool,
    pub notes: Vec<Note>,
}

/// One suite document: an ordered list of test cases under a shared title.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    pub title: String,
    #[serde(alias = "description")]
    pub desc: String,
    pub tests: Vec<TestCase>,
}

/// What a test case checks once its commands have run.
#[derive(Debug, Clone)]
pub enum CheckSpec {
    /// Read the profile file the target persisted and compare it to a fixture.
    Profile {
        /// Result file, relative to the scratch root.
        result_path: String,
        expected: Profile,
        /// Required when `expected.encrypted` is true.
        passphrase: Option<String>,
    },
    /// Parse each captured stdout as JSON and compare note contents.
    /// `None` entries skip comparison for that command.
    JsonFragments { expected: Vec<Option<JsonExpectation>> },
    /// Compare each captured stdout verbatim. `None` entries skip.
    TextFragments { expected: Vec<Option<String>> },
}

/// Expected value for one JSON output fragment: a single note or a list of
/// notes (with `null` placeholders for positions to skip).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonExpectation {
    Many(Vec<Option<Note>>),
    One(Note),
}

/// One test scenario: a command sequence plus the check to apply afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTestCase")]
pub struct TestCase {
    pub name: String,
    /// Value for the target's `-p` flag; absent means its default profile.
    pub profile: Option<String>,
    /// Subdirectory of the scratch root to hand to `-f`; absent means the
    /// scratch root itself.
    pub profile_folder: Option<String>,
    /// One argument list per invocation, run strictly in order. May be
    /// empty, in which case a fragment check passes vacuously.
    pub cmds: Vec<Vec<String>>,
    /// Staged stdin, parallel to `cmds` when non-empty.
    pub stdin: Vec<Option<String>>,
    /// Delay inserted before each output-captured invocation, modelling
    /// interactive pauses. Profile-mode runs ignore it.
    pub cmd_interval: Option<Duration>,
    /// When true, non-zero exit statuses are expected and not an error.
    pub should_fail: bool,
    pub check: CheckSpec,
}

/// Wire shape of a test case as it appears in a suite document. Converted
/// into [`TestCase`] so that `result_type` becomes a tagged [`CheckSpec`]
/// instead of being inferred from key presence at run time.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTestCase {
    name: String,
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    profile_folder: Option<String>,
    cmds: Vec<Vec<String>>,
    #[serde(default)]
    stdin: Vec<Option<String>>,
    #[serde(default)]
    cmd_interval: Option<f64>,
    #[serde(default)]
    should_fail: bool,
    #[serde(default)]
    result_type: Option<String>,
    #[serde(default)]
    result_path: Option<String>,
    #[serde(default)]
    result: Option<Profile>,
    #[serde(default)]
    result_passphrase: Option<String>,
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

impl TryFrom<RawTestCase> for TestCase {
    type Error = String;

    fn try_from(raw: RawTestCase) -> Result<Self, Self::Error> {
        let RawTestCase {
            name,
            profile,
            profile_folder,
            cmds,
            stdin,
            cmd_interval,
            should_fail,
            result_type,
            result_path,
            result,
            result_passphrase,
            results,
        } = raw;

        if !stdin.is_empty() && stdin.len() != cmds.len() {
            return Err(format!(
                "test case '{name}': stdin has {} entries for {} cmds",
                stdin.len(),
                cmds.len()
            ));
        }
        let cmd_interval = match cmd_interval {
            Some(seconds) => Some(Duration::try_from_secs_f64(seconds).map_err(|_| {
                format!("test case '{name}': cmd_interval must be a non-negative number of seconds")
            })?),
            None => None,
        };

        let check = match result_type.as_deref() {
            None => {
                let result_path = result_path.ok_or_else(|| {
                    format!("test case '{name}': result_path is required for profile comparison")
                })?;
                let expected = result.ok_or_else(|| {
                    format!("test case '{name}': result is required for profile comparison")
                })?;
                if expected.encrypted && result_passphrase.is_none() {
                    return Err(format!(
                        "test case '{name}': result_passphrase is required when the expected profile is encrypted"
                    ));
                }
                CheckSpec::Profile {
                    result_path,
                    expected,
                    passphrase: result_passphrase,
                }
            }
            Some("json") => {
                let entries = results.ok_or_else(|| {
                    format!("test case '{name}': results is required for json output comparison")
                })?;
                let expected = entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| match entry {
                        serde_json::Value::Null => Ok(None),
                        other => serde_json::from_value::<JsonExpectation>(other)
                            .map(Some)
                            .map_err(|err| format!("test case '{name}': results[{index}]: {err}")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                CheckSpec::JsonFragments { expected }
            }
            Some("text") => {
                let entries = results.ok_or_else(|| {
                    format!("test case '{name}': results is required for text output comparison")
                })?;
                let expected = entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| match entry {
                        serde_json::Value::Null => Ok(None),
                        serde_json::Value::String(text) => Ok(Some(text)),
                        other => Err(format!(
                            "test case '{name}': results[{index}] must be a string or null, got {other}"
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                CheckSpec::TextFragments { expected }
            }
            Some(other) => {
                return Err(format!("test case '{name}': unknown result_type '{other}'"))
            }
        };

        Ok(TestCase {
            name,
            profile,
            profile_folder,
            cmds,
            stdin,
            cmd_interval,
            should_fail,
            check,
        })
    }
}

#[cfg(test)]
mod tests;
