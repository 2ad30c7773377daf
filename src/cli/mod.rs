//! CLI argument parsing and validation module
//!
//! Handles the command-line interface using clap, including:
//! - Target binary and schema document paths
//! - Suite selection (single document or categories)
//! - Condensed versus verbose progress output
//! - Diagnostic log level

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Suite documents run for the profile comparison category
const PROFILE_SUITES: &[&str] = &[
    "suites/profile_default.json",
    "suites/profile_second.json",
    "suites/profile_encrypted.json",
    "suites/profile_bad_input.json",
];

/// Suite documents run for the json output category
const JSON_SUITES: &[&str] = &["suites/json_list.json", "suites/json_search.json"];

/// Suite documents run for the text output category
const TEXT_SUITES: &[&str] = &["suites/text_output.json"];

/// Default schema document describing the profile file format
const DEFAULT_SCHEMA_PATH: &str = "docs/schema.json";

/// Configuration for one harness run, built once here and passed by
/// reference to everything that needs it.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path to the note-taking binary under test
    pub target: PathBuf,
    /// Path to the profile schema document
    pub schema_path: PathBuf,
    /// Suite documents to run, in order
    pub suites: Vec<PathBuf>,
    /// Whether to print one character per case instead of one line
    pub condensed: bool,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<HarnessConfig> {
    let matches = Command::new("notecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Conformance harness for a note-taking command-line tool")
        .long_about(
            "Drives a note-taking binary through scripted invocations, then checks \
             the profile files it persists, or the output it prints, against \
             expected fixtures.",
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .value_name("PATH")
                .help("Path to the note-taking binary under test")
                .required(true),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .value_name("PATH")
                .help("Profile schema document")
                .default_value(DEFAULT_SCHEMA_PATH),
        )
        .arg(
            Arg::new("suite")
                .short('s')
                .long("suite")
                .value_name("PATH")
                .help("Run a single suite document instead of the default categories")
                .conflicts_with_all(["profile-tests", "json-tests", "text-tests"]),
        )
        .arg(
            Arg::new("profile-tests")
                .long("profile-tests")
                .help("Run the profile comparison suites")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json-tests")
                .long("json-tests")
                .help("Run the json output suites")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text-tests")
                .long("text-tests")
                .help("Run the text output suites")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("condensed")
                .long("condensed")
                .help("Print one character of progress per test case")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Diagnostic log filter used when RUST_LOG is unset")
                .default_value("warn"),
        )
        .get_matches();

    let target = matches
        .get_one::<String>("target")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("--target is required"))?;
    if !target.exists() {
        return Err(anyhow!("target binary does not exist: {}", target.display()));
    }

    let schema_path = matches
        .get_one::<String>("schema")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));
    if !schema_path.exists() {
        return Err(anyhow!(
            "schema document does not exist: {}",
            schema_path.display()
        ));
    }

    // Category flags combine; none selected means everything, unless a
    // single suite document was requested instead.
    let mut suites: Vec<PathBuf> = Vec::new();
    if matches.get_flag("profile-tests") {
        suites.extend(PROFILE_SUITES.iter().map(PathBuf::from));
    }
    if matches.get_flag("json-tests") {
        suites.extend(JSON_SUITES.iter().map(PathBuf::from));
    }
    if matches.get_flag("text-tests") {
        suites.extend(TEXT_SUITES.iter().map(PathBuf::from));
    }
    if suites.is_empty() {
        match matches.get_one::<String>("suite") {
            Some(path) => suites.push(PathBuf::from(path)),
            None => {
                suites.extend(PROFILE_SUITES.iter().map(PathBuf::from));
                suites.extend(JSON_SUITES.iter().map(PathBuf::from));
                suites.extend(TEXT_SUITES.iter().map(PathBuf::from));
            }
        }
    }
    for path in &suites {
        if !path.exists() {
            return Err(anyhow!("suite document does not exist: {}", path.display()));
        }
    }

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "warn".to_string());

    Ok(HarnessConfig {
        target,
        schema_path,
        suites,
        condensed: matches.get_flag("condensed"),
        log_level,
    })
}
