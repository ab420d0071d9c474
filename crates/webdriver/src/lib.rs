//! Minimal W3C WebDriver client
//!
//! Covers exactly what the intervention checks need: session lifecycle,
//! navigation, CSS element lookup with visibility polling, and synchronous
//! script execution. Errors keep the remote end's classification so callers
//! can tell an expected `unknown error` apart from anything else.

pub mod capabilities;
pub mod client;
pub mod element;
pub mod error;
pub mod session;

pub use capabilities::FirefoxCapabilities;
pub use client::AutomationClient;
pub use element::{ElementRef, ELEMENT_KEY};
pub use error::{ErrorCode, WebDriverError, WebDriverResult};
pub use session::{AwaitCss, Polling, Session};

#[cfg(feature = "test-server")]
pub mod testing;
