//! Runs registered tests against a WebDriver endpoint

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use webcompat_webdriver::Session;

use crate::case::InterventionTest;
use crate::config::{Interventions, RunConfig, Variant};
use crate::error::InterventionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    /// The check ran and its assertion did not hold
    Failed,
    /// The browser or harness failed before the check could decide
    Errored,
    Skipped,
}

/// Result of one test under one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub bug: u32,
    pub site: String,
    pub name: String,
    pub interventions: Interventions,
    pub outcome: TestOutcome,
    pub duration_ms: u64,
    pub message: Option<String>,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Tests that pass the configured bug/name filter
    pub fn select<'a>(&self, tests: &'a [InterventionTest]) -> Vec<&'a InterventionTest> {
        let filter = &self.config.filter;
        tests
            .iter()
            .filter(|t| filter.bug.map_or(true, |bug| t.bug == bug))
            .filter(|t| filter.name.as_deref().map_or(true, |name| t.name.contains(name)))
            .collect()
    }

    /// Run every selected test under every configured variant
    pub async fn run(&self, tests: &[InterventionTest]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let selected = self.select(tests);
        let variants = self.config.variants();

        info!(
            "Running {} test(s) x {} variant(s) against {}",
            selected.len(),
            variants.len(),
            self.config.webdriver_url
        );

        let mut results = Vec::new();
        for variant in &variants {
            for test in &selected {
                let result = self.run_test(test, variant).await;
                match result.outcome {
                    TestOutcome::Passed => info!("✓ {} [{}] ({} ms)", test.id(), variant.interventions, result.duration_ms),
                    TestOutcome::Skipped => info!(
                        "- {} [{}] {}",
                        test.id(),
                        variant.interventions,
                        result.message.as_deref().unwrap_or("skipped")
                    ),
                    TestOutcome::Failed | TestOutcome::Errored => error!(
                        "✗ {} [{}] - {}",
                        test.id(),
                        variant.interventions,
                        result.message.as_deref().unwrap_or("unknown error")
                    ),
                }
                results.push(result);
            }
        }

        let count = |outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let suite = SuiteResult {
            started_at,
            total: results.len(),
            passed: count(TestOutcome::Passed),
            failed: count(TestOutcome::Failed),
            errored: count(TestOutcome::Errored),
            skipped: count(TestOutcome::Skipped),
            duration_ms: start.elapsed().as_millis() as u64,
            results,
        };

        info!(
            "Test Results: {} passed, {} failed, {} errored, {} skipped ({} ms)",
            suite.passed, suite.failed, suite.errored, suite.skipped, suite.duration_ms
        );
        suite
    }

    /// Run one test under one variant with its own browser session
    pub async fn run_test(&self, test: &InterventionTest, variant: &Variant) -> TestResult {
        let start = Instant::now();
        let finish = |outcome, message: Option<String>| TestResult {
            bug: test.bug,
            site: test.site.to_string(),
            name: test.name.to_string(),
            interventions: variant.interventions,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
            message,
        };

        if let Some(reason) = test.markers.skip_reason(variant) {
            return finish(TestOutcome::Skipped, Some(reason));
        }

        debug!("Starting session for {} with interventions {}", test.id(), variant.interventions);
        let capabilities = self.config.capabilities(variant.interventions);
        let session = match Session::new(&self.config.webdriver_url, &capabilities).await {
            Ok(session) => session.with_polling(self.config.polling()),
            Err(e) => return finish(TestOutcome::Errored, Some(format!("could not start session: {}", e))),
        };

        let outcome = AssertUnwindSafe((test.body)(&session)).catch_unwind().await;

        if let Err(e) = session.close().await {
            warn!("Failed to close session after {}: {}", test.id(), e);
        }

        match outcome {
            Ok(Ok(())) => finish(TestOutcome::Passed, None),
            Ok(Err(e)) if e.is_assertion() => finish(TestOutcome::Failed, Some(e.to_string())),
            Ok(Err(e)) => finish(TestOutcome::Errored, Some(e.to_string())),
            Err(panic) => finish(TestOutcome::Errored, Some(format!("test body panicked: {}", panic_message(&*panic)))),
        }
    }

    /// Write results to `<output_dir>/webcompat-results.json`
    pub fn write_results(&self, results: &SuiteResult) -> InterventionResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("webcompat-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string payload"
    }
}
