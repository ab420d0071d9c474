//! virtual-cards.exnode.ru renders its table text vertically without the intervention

use futures::future::BoxFuture;
use webcompat_webdriver::AutomationClient;

use crate::case::InterventionTest;
use crate::checks::{boxes_not_taller_than_wide, ensure};
use crate::config::Platform;
use crate::error::InterventionResult;

pub const BUG: u32 = 1994142;
pub const SITE: &str = "virtual-cards.exnode.ru";

pub const URL: &str = "https://virtual-cards.exnode.ru/";
pub const CELLS_CSS: &str = ".flexbe-table__td:nth-child(2)";

/// Broken cells come out taller than they are wide
pub async fn table_text_properly_rendered(client: &dyn AutomationClient) -> InterventionResult<bool> {
    boxes_not_taller_than_wide(client, URL, CELLS_CSS).await
}

fn enabled(client: &dyn AutomationClient) -> BoxFuture<'_, InterventionResult<()>> {
    Box::pin(async move {
        ensure(
            table_text_properly_rendered(client).await?,
            "table cells render taller than wide with interventions enabled",
        )
    })
}

fn disabled(client: &dyn AutomationClient) -> BoxFuture<'_, InterventionResult<()>> {
    Box::pin(async move {
        ensure(
            !table_text_properly_rendered(client).await?,
            "table cells render correctly without interventions",
        )
    })
}

pub fn tests() -> Vec<InterventionTest> {
    vec![
        InterventionTest::new(BUG, SITE, "test_enabled", enabled)
            .skip_platforms(&[Platform::Android])
            .with_interventions(),
        InterventionTest::new(BUG, SITE, "test_disabled", disabled)
            .skip_platforms(&[Platform::Android])
            .without_interventions(),
    ]
}
