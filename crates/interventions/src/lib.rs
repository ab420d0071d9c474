//! Web-compatibility intervention regression checks
//!
//! Each site module holds the tests for one bug report. A test is a plain
//! async function over an [`AutomationClient`](webcompat_webdriver::AutomationClient)
//! plus [`Markers`] saying which intervention states and platforms it applies
//! to. The [`Runner`] expands every test over the configured states, opens a
//! fresh Firefox session per invocation with the matching prefs, and records
//! the outcome.
//!
//! ```text
//! webcompat-run ──> Runner ──> for each Variant { interventions, platform }
//!                                 for each InterventionTest
//!                                   Markers::skip_reason?  -> Skipped
//!                                   Session::new(prefs)
//!                                   (test.body)(&session) -> Passed / Failed / Errored
//!                                   session.close()
//! ```

pub mod case;
pub mod checks;
pub mod config;
pub mod error;
pub mod markers;
pub mod runner;
pub mod sites;

#[cfg(test)]
mod fake;

pub use case::{InterventionTest, TestFn};
pub use config::{InterventionMode, Interventions, Platform, RunConfig, Variant};
pub use error::{InterventionError, InterventionResult};
pub use markers::Markers;
pub use runner::{Runner, SuiteResult, TestOutcome, TestResult};
