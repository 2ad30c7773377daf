//! Test suite runner module
//!
//! Loads suite documents and sequences their cases:
//! - one scratch directory per suite run, wiped between cases
//! - profile-mode pipeline: run commands, read the result file, decode,
//!   schema-validate, invariant-validate, compare against the fixture
//! - fragment-mode pipeline: run commands with stdout captured, compare
//!   each output against its expectation
//!
//! Every component failure is caught at the case boundary and becomes a
//! failed case; the runner always continues to the next case.

use crate::cli::HarnessConfig;
use crate::codec::{self, DecodeError};
use crate::compare::{self, CompareError, FragmentError};
use crate::exec::{self, ExecutionError};
use crate::models::{CheckSpec, TestCase, TestSuite};
use crate::output::Reporter;
use crate::validate::{self, InvariantError, SchemaError, SchemaValidator};

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Any failure that turns one test case into a `Failed` outcome. Each
/// variant keeps its component's message so failure kinds stay
/// distinguishable in the report.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Invariant(#[from] InvariantError),
    #[error(transparent)]
    Compare(#[from] CompareError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("result file is missing: {path}")]
    MissingResultFile { path: PathBuf },
    #[error("could not read result file {path}: {source}")]
    ResultFileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("expected {expected} captured outputs, got {actual}")]
    FragmentCount { expected: usize, actual: usize },
}

/// Terminal state of one executed case.
#[derive(Debug)]
pub enum CaseStatus {
    Passed,
    Failed(CaseError),
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub status: CaseStatus,
}

/// Aggregate result of one suite run.
#[derive(Debug)]
pub struct SuiteOutcome {
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseOutcome>,
}

/// Read and decode a suite document. A malformed document is a fatal load
/// error, reported before any command runs.
pub fn load_suite(path: &Path) -> Result<TestSuite> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read suite document {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("suite document {} is malformed", path.display()))
}

/// Runs suites sequentially against one target binary and one compiled
/// schema, reporting progress as it goes.
pub struct SuiteRunner<'a> {
    config: &'a HarnessConfig,
    schema: &'a SchemaValidator,
    reporter: &'a Reporter,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(
        config: &'a HarnessConfig,
        schema: &'a SchemaValidator,
        reporter: &'a Reporter,
    ) -> Self {
        SuiteRunner {
            config,
            schema,
            reporter,
        }
    }

    /// Run every case of `suite` inside a fresh scratch directory.
    ///
    /// Only scratch-directory failures abort the run: once the scratch
    /// tree cannot be wiped, case isolation is gone.
    pub fn run(&self, suite: &TestSuite) -> Result<SuiteOutcome> {
        let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
        debug!(suite = %suite.title, tests = suite.tests.len(), "running suite");

        self.reporter.suite_header(suite);
        let mut cases = Vec::with_capacity(suite.tests.len());
        let mut failed = 0;

        for case in &suite.tests {
            self.reporter.case_start(&case.name);
            let status = match self.run_case(case, scratch.path()) {
                Ok(()) => {
                    self.reporter.case_passed();
                    CaseStatus::Passed
                }
                Err(error) => {
                    failed += 1;
                    self.reporter.case_failed(&error);
                    CaseStatus::Failed(error)
                }
            };
            debug!(case = %case.name, failed = matches!(status, CaseStatus::Failed(_)), "case finished");
            cases.push(CaseOutcome {
                name: case.name.clone(),
                status,
            });
            wipe_scratch(scratch.path()).context("failed to wipe scratch directory")?;
        }

        let passed = suite.tests.len() - failed;
        self.reporter.suite_tally(passed, failed);
        Ok(SuiteOutcome {
            passed,
            failed,
            cases,
        })
    }

    fn run_case(&self, case: &TestCase, scratch: &Path) -> Result<(), CaseError> {
        match &case.check {
            CheckSpec::Profile {
                result_path,
                expected,
                passphrase,
            } => {
                exec::run_case(&self.config.target, scratch, case, false)?;

                let path = scratch.join(result_path);
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(source) if source.kind() == io::ErrorKind::NotFound => {
                        return Err(CaseError::MissingResultFile { path })
                    }
                    Err(source) => return Err(CaseError::ResultFileRead { path, source }),
                };

                let value = codec::decode_value(&bytes, expected.encrypted, passphrase.as_deref())?;
                self.schema.validate(&value)?;
                let actual = serde_json::from_value(value).map_err(DecodeError::from)?;
                validate::validate_invariants(&actual)?;
                compare::compare_profiles(expected, &actual)?;
            }
            CheckSpec::JsonFragments { expected } => {
                let outputs = exec::run_case(&self.config.target, scratch, case, true)?;
                check_fragment_count(expected.len(), outputs.len())?;
                for (entry, raw) in expected.iter().zip(&outputs) {
                    if let Some(expectation) = entry {
                        compare::compare_json_fragment(expectation, raw)?;
                    }
                }
            }
            CheckSpec::TextFragments { expected } => {
                let outputs = exec::run_case(&self.config.target, scratch, case, true)?;
                check_fragment_count(expected.len(), outputs.len())?;
                for (entry, raw) in expected.iter().zip(&outputs) {
                    if let Some(expectation) = entry {
                        compare::compare_text_fragment(expectation, raw)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_fragment_count(expected: usize, actual: usize) -> Result<(), CaseError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CaseError::FragmentCount { expected, actual })
    }
}

/// Remove everything inside `root` without removing `root` itself, so the
/// next case starts from an empty scratch tree.
fn wipe_scratch(root: &Path) -> io::Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
