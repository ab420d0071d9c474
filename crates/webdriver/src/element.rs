//! Web element references

use serde::{Deserialize, Serialize};

/// Key identifying a web element reference in WebDriver JSON
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Handle to an element in the current browsing context.
///
/// Serializes to the W3C element reference object, so a slice of these can
/// be passed straight into `execute_script` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
