//! Live-site runs of every registered test
//!
//! Need a geckodriver listening at `WEBCOMPAT_WEBDRIVER_URL` (default
//! `http://127.0.0.1:4444`) and network access to the real sites, so they are
//! ignored by default. Run with:
//!   cargo test -p webcompat-interventions --test live_sites -- --ignored

use std::process::Command;

use webcompat_interventions::{sites, InterventionMode, RunConfig, Runner, TestOutcome};

fn webdriver_url() -> String {
    std::env::var("WEBCOMPAT_WEBDRIVER_URL").unwrap_or_else(|_| "http://127.0.0.1:4444".to_string())
}

fn in_path(bin: &str) -> bool {
    Command::new("sh")
        .arg("-lc")
        .arg(format!("command -v {bin} >/dev/null 2>&1"))
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

async fn run_live(mode: InterventionMode) {
    if std::env::var("WEBCOMPAT_WEBDRIVER_URL").is_err() && !in_path("geckodriver") {
        eprintln!("Skipping: no WEBCOMPAT_WEBDRIVER_URL and geckodriver not in PATH");
        return;
    }

    let config = RunConfig {
        webdriver_url: webdriver_url(),
        interventions: mode,
        ..Default::default()
    };
    let suite = Runner::new(config).run(&sites::all()).await;

    for result in &suite.results {
        assert!(
            matches!(result.outcome, TestOutcome::Passed | TestOutcome::Skipped),
            "{}::{} [{}] {:?}: {}",
            result.bug,
            result.name,
            result.interventions,
            result.outcome,
            result.message.as_deref().unwrap_or_default()
        );
    }
}

#[tokio::test]
#[ignore]
async fn live_sites_with_interventions() {
    run_live(InterventionMode::Enabled).await;
}

#[tokio::test]
#[ignore]
async fn live_sites_without_interventions() {
    run_live(InterventionMode::Disabled).await;
}
