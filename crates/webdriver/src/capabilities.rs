//! Session capabilities for Firefox

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{json, Value};

/// Builder for the `capabilities` body of a new-session request
#[derive(Debug, Clone, Default)]
pub struct FirefoxCapabilities {
    prefs: BTreeMap<String, Value>,
    args: Vec<String>,
    binary: Option<PathBuf>,
    android_package: Option<String>,
    page_load_timeout_ms: Option<u64>,
}

impl FirefoxCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pref(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.prefs.insert(name.into(), value.into());
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.args.retain(|a| a != "-headless");
        if headless {
            self.args.push("-headless".to_string());
        }
        self
    }

    pub fn binary(mut self, binary: Option<PathBuf>) -> Self {
        self.binary = binary;
        self
    }

    /// Run against Firefox for Android through geckodriver's adb support
    pub fn android_package(mut self, package: impl Into<String>) -> Self {
        self.android_package = Some(package.into());
        self
    }

    pub fn page_load_timeout_ms(mut self, ms: u64) -> Self {
        self.page_load_timeout_ms = Some(ms);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut firefox = serde_json::Map::new();
        firefox.insert("prefs".to_string(), json!(self.prefs));
        if !self.args.is_empty() {
            firefox.insert("args".to_string(), json!(self.args));
        }
        if let Some(binary) = &self.binary {
            firefox.insert("binary".to_string(), json!(binary.to_string_lossy()));
        }
        if let Some(package) = &self.android_package {
            firefox.insert("androidPackage".to_string(), json!(package));
        }

        let mut always_match = serde_json::Map::new();
        always_match.insert("browserName".to_string(), json!("firefox"));
        always_match.insert("moz:firefoxOptions".to_string(), Value::Object(firefox));
        if let Some(ms) = self.page_load_timeout_ms {
            always_match.insert("timeouts".to_string(), json!({ "pageLoad": ms }));
        }

        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}
