//! indices.circana.com (and its former iriworldwide domain) no longer resolve

use futures::future::BoxFuture;
use webcompat_webdriver::AutomationClient;

use crate::case::InterventionTest;
use crate::checks::expect_dead_site;
use crate::error::InterventionResult;

pub const BUG: u32 = 1933811;
pub const SITE: &str = "indices.circana.com";

pub const URL: &str = "https://indices.circana.com";
pub const OLD_URL: &str = "https://indices.iriworldwide.com";

fn regression_site_is_dead(client: &dyn AutomationClient) -> BoxFuture<'_, InterventionResult<()>> {
    Box::pin(expect_dead_site(client, URL))
}

fn regression_old_site_is_dead(client: &dyn AutomationClient) -> BoxFuture<'_, InterventionResult<()>> {
    Box::pin(expect_dead_site(client, OLD_URL))
}

pub fn tests() -> Vec<InterventionTest> {
    vec![
        InterventionTest::new(BUG, SITE, "test_regression_site_is_dead", regression_site_is_dead)
            .with_interventions(),
        InterventionTest::new(BUG, SITE, "test_regression_old_site_is_dead", regression_old_site_is_dead)
            .with_interventions(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeClient;
    use webcompat_webdriver::ErrorCode;

    #[tokio::test]
    async fn test_both_urls_checked() {
        for test in tests() {
            let client = FakeClient::new().fail_navigation(ErrorCode::UnknownError);
            (test.body)(&client).await.unwrap();
            let expected = if test.name.contains("old") { OLD_URL } else { URL };
            assert_eq!(client.navigations(), vec![expected.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_reachable_site_fails() {
        for test in tests() {
            let err = (test.body)(&FakeClient::new()).await.unwrap_err();
            assert!(err.is_assertion());
        }
    }

    #[test]
    fn test_markers() {
        for test in tests() {
            assert!(test.markers.with_interventions);
            assert!(!test.markers.without_interventions);
            assert!(test.markers.skip_platforms.is_empty());
        }
    }
}
