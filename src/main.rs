#![forbid(unsafe_code)]

use anyhow::Result;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use notecheck::cli;
use notecheck::output::Reporter;
use notecheck::suite::{self, SuiteRunner};
use notecheck::validate::SchemaValidator;

fn main() -> Result<()> {
    let config = cli::parse_args()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(binary = %config.target.display(), suites = config.suites.len(), "configuration loaded");

    let start_time = Instant::now();

    // One schema compilation shared across every suite in the run
    let schema = SchemaValidator::from_file(&config.schema_path)?;
    let reporter = Reporter::new(config.condensed);
    let runner = SuiteRunner::new(&config, &schema, &reporter);

    let mut total = 0;
    let mut failed = 0;
    for path in &config.suites {
        let suite = suite::load_suite(path)?;
        total += suite.tests.len();
        let outcome = runner.run(&suite)?;
        failed += outcome.failed;
    }

    reporter.run_summary(total, failed, start_time.elapsed());
    if failed > 0 {
        reporter.run_failed_banner();
        std::process::exit(1);
    }
    Ok(())
}
