//! Run configuration

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use webcompat_webdriver::{FirefoxCapabilities, Polling};

use crate::error::{InterventionError, InterventionResult};

/// Prefs that gate every intervention shipped with the webcompat addon
pub const INTERVENTION_PREFS: [&str; 2] = [
    "extensions.webcompat.perform_injections",
    "extensions.webcompat.perform_ua_overrides",
];

/// Whether the browser applies interventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interventions {
    Enabled,
    Disabled,
}

impl Interventions {
    pub fn is_enabled(self) -> bool {
        matches!(self, Interventions::Enabled)
    }
}

impl fmt::Display for Interventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interventions::Enabled => f.write_str("enabled"),
            Interventions::Disabled => f.write_str("disabled"),
        }
    }
}

/// Which intervention states a run covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionMode {
    Enabled,
    Disabled,
    #[default]
    Both,
}

impl InterventionMode {
    pub fn states(self) -> &'static [Interventions] {
        match self {
            InterventionMode::Enabled => &[Interventions::Enabled],
            InterventionMode::Disabled => &[Interventions::Disabled],
            InterventionMode::Both => &[Interventions::Enabled, Interventions::Disabled],
        }
    }
}

/// Platform the browser under test runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Linux,
    Mac,
    Windows,
    Android,
}

impl Platform {
    /// Desktop platform of the host running the harness
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Android => "android",
        };
        f.write_str(name)
    }
}

/// One concrete configuration a test body runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub interventions: Interventions,
    pub platform: Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub page_load_ms: u64,
    /// Upper bound on waiting for elements to appear
    pub await_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            page_load_ms: 30_000,
            await_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

/// Which registered tests to run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestFilter {
    pub bug: Option<u32>,
    /// Substring of the test name
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// geckodriver (or other WebDriver) endpoint
    pub webdriver_url: String,
    pub interventions: InterventionMode,
    pub platform: Platform,
    pub headless: bool,
    /// Firefox binary; geckodriver picks one when unset
    pub binary: Option<PathBuf>,
    /// App package used when `platform` is android
    pub android_package: String,
    pub timeouts: Timeouts,
    pub filter: TestFilter,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://127.0.0.1:4444".to_string(),
            interventions: InterventionMode::default(),
            platform: Platform::current(),
            headless: true,
            binary: None,
            android_package: "org.mozilla.geckoview_example".to_string(),
            timeouts: Timeouts::default(),
            filter: TestFilter::default(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunConfig {
    pub fn from_toml(content: &str) -> InterventionResult<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> InterventionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> InterventionResult<()> {
        if !(self.webdriver_url.starts_with("http://") || self.webdriver_url.starts_with("https://")) {
            return Err(InterventionError::InvalidConfig(format!(
                "webdriver_url must be an http(s) URL, got {:?}",
                self.webdriver_url
            )));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(InterventionError::InvalidConfig("poll_interval_ms must be non-zero".to_string()));
        }
        if self.platform == Platform::Android && self.android_package.is_empty() {
            return Err(InterventionError::InvalidConfig("android runs need android_package".to_string()));
        }
        Ok(())
    }

    /// Variants this run covers, in execution order
    pub fn variants(&self) -> Vec<Variant> {
        self.interventions
            .states()
            .iter()
            .map(|&interventions| Variant {
                interventions,
                platform: self.platform,
            })
            .collect()
    }

    /// New-session capabilities with the intervention prefs for `interventions`
    pub fn capabilities(&self, interventions: Interventions) -> FirefoxCapabilities {
        let mut caps = INTERVENTION_PREFS
            .iter()
            .fold(FirefoxCapabilities::new(), |caps, pref| caps.pref(*pref, interventions.is_enabled()))
            .page_load_timeout_ms(self.timeouts.page_load_ms);

        if self.platform == Platform::Android {
            caps = caps.android_package(&self.android_package);
        } else {
            caps = caps.headless(self.headless).binary(self.binary.clone());
        }
        caps
    }

    pub fn polling(&self) -> Polling {
        Polling {
            timeout: Duration::from_millis(self.timeouts.await_ms),
            interval: Duration::from_millis(self.timeouts.poll_interval_ms),
        }
    }
}
