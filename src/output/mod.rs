//! Run reporting module
//!
//! Handles:
//! - Suite headers and per-case status lines (verbose or condensed)
//! - Failure details, colorized red
//! - Per-suite tallies and the end-of-run summary with elapsed time
//!
//! Progress goes to stdout; diagnostics from `tracing` go to stderr, so
//! reports stay pipeable.

use crate::constants::{ANSI_RED, ANSI_RESET};
use crate::models::TestSuite;
use crate::suite::CaseError;

use std::io::{self, Write};
use std::time::Duration;

/// Writes run progress to stdout, one line per case or one character per
/// case in condensed mode.
pub struct Reporter {
    condensed: bool,
}

impl Reporter {
    pub fn new(condensed: bool) -> Self {
        Reporter { condensed }
    }

    /// Print the suite title block before its cases run.
    pub fn suite_header(&self, suite: &TestSuite) {
        println!("# {}\n#    {}", suite.title, suite.desc);
        if !self.condensed {
            println!("#\n# running {} tests.\n", suite.tests.len());
        }
    }

    /// Announce a case before it runs; verbose mode leaves the line open
    /// for the PASSED/FAILED suffix.
    pub fn case_start(&self, name: &str) {
        if !self.condensed {
            print!("  test: {name}");
        }
        let _ = io::stdout().flush();
    }

    pub fn case_passed(&self) {
        if self.condensed {
            print!(".");
            let _ = io::stdout().flush();
        } else {
            println!(" [PASSED]");
        }
    }

    /// Mark the case failed and print the failure detail in both modes.
    pub fn case_failed(&self, error: &CaseError) {
        if self.condensed {
            print!("{ANSI_RED}F{ANSI_RESET}");
        } else {
            println!("{ANSI_RED} [FAILED]{ANSI_RESET}");
        }
        println!("{error}");
        let _ = io::stdout().flush();
    }

    pub fn suite_tally(&self, passed: usize, failed: usize) {
        println!("\n[passed: {passed}, failed {failed}]\n");
    }

    /// End-of-run aggregate line with wall-clock elapsed time.
    pub fn run_summary(&self, total: usize, failed: usize, elapsed: Duration) {
        println!(
            "ran {} tests overall: {} passed, {} failed, took {}\n",
            total,
            total - failed,
            failed,
            format_elapsed(elapsed)
        );
    }

    pub fn run_failed_banner(&self) {
        println!("{ANSI_RED}BAD{ANSI_RESET}");
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
