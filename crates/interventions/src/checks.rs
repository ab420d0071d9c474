//! Reusable check building blocks for site tests

use serde_json::Value;
use tracing::debug;
use webcompat_webdriver::{AutomationClient, AwaitCss};

use crate::error::{InterventionError, InterventionResult};

/// Returns false as soon as one element's box is taller than it is wide.
/// An empty element list passes.
pub const NO_BOX_TALLER_THAN_WIDE: &str = r#"
    const [elements] = arguments;
    for (const element of elements) {
      const box = element.getBoundingClientRect();
      if (box.height > box.width) {
        return false;
      }
    }
    return true;
"#;

/// Fail with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> InterventionResult<()> {
    if condition {
        Ok(())
    } else {
        Err(InterventionError::AssertionFailed(message.into()))
    }
}

/// Navigation to `url` must fail with `unknown error`.
///
/// Success is an assertion failure; any other navigation error is passed
/// through untouched so it surfaces as a test error.
pub async fn expect_dead_site(client: &dyn AutomationClient, url: &str) -> InterventionResult<()> {
    match client.navigate(url).await {
        Ok(()) => Err(InterventionError::AssertionFailed(format!(
            "navigation to {} succeeded but the site should be dead",
            url
        ))),
        Err(e) if e.is_unknown_error() => {
            debug!("{} is unreachable as expected: {}", url, e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load `url`, wait for every element matching `selector` to be displayed,
/// then report whether none of them renders taller than wide.
pub async fn boxes_not_taller_than_wide(
    client: &dyn AutomationClient,
    url: &str,
    selector: &str,
) -> InterventionResult<bool> {
    client.navigate(url).await?;
    let elements = client.await_css(selector, AwaitCss::default().displayed().all()).await?;
    debug!("Checking boxes of {} element(s) matching {}", elements.len(), selector);

    let result = client
        .execute_script(NO_BOX_TALLER_THAN_WIDE, vec![serde_json::to_value(&elements)?])
        .await?;
    expect_bool(result)
}

fn expect_bool(value: Value) -> InterventionResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| InterventionError::UnexpectedResult(format!("expected a boolean, got {}", value)))
}
