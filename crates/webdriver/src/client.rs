//! The automation surface that check bodies are written against

use async_trait::async_trait;
use serde_json::Value;

use crate::element::ElementRef;
use crate::error::WebDriverResult;
use crate::session::{AwaitCss, Session};

/// Operations a check may perform against the browser.
///
/// Check bodies only ever see `&dyn AutomationClient`; the runner owns the
/// underlying session and its lifecycle.
#[async_trait]
pub trait AutomationClient: Send + Sync {
    async fn navigate(&self, url: &str) -> WebDriverResult<()>;

    async fn await_css(&self, selector: &str, options: AwaitCss) -> WebDriverResult<Vec<ElementRef>>;

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> WebDriverResult<Value>;
}

#[async_trait]
impl AutomationClient for Session {
    async fn navigate(&self, url: &str) -> WebDriverResult<()> {
        Session::navigate(self, url).await
    }

    async fn await_css(&self, selector: &str, options: AwaitCss) -> WebDriverResult<Vec<ElementRef>> {
        Session::await_css(self, selector, options).await
    }

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> WebDriverResult<Value> {
        Session::execute_script(self, script, args).await
    }
}
