//! Registered intervention tests

use futures::future::BoxFuture;
use webcompat_webdriver::AutomationClient;

use crate::config::Platform;
use crate::error::InterventionResult;
use crate::markers::Markers;

/// Body of a test; borrows the client for the duration of the run
pub type TestFn = for<'a> fn(&'a dyn AutomationClient) -> BoxFuture<'a, InterventionResult<()>>;

/// One test tied to a bug report about one site
#[derive(Clone)]
pub struct InterventionTest {
    pub bug: u32,
    pub site: &'static str,
    pub name: &'static str,
    pub markers: Markers,
    pub body: TestFn,
}

impl InterventionTest {
    pub fn new(bug: u32, site: &'static str, name: &'static str, body: TestFn) -> Self {
        Self {
            bug,
            site,
            name,
            markers: Markers::default(),
            body,
        }
    }

    pub fn with_interventions(mut self) -> Self {
        self.markers.with_interventions = true;
        self
    }

    pub fn without_interventions(mut self) -> Self {
        self.markers.without_interventions = true;
        self
    }

    pub fn skip_platforms(mut self, platforms: &[Platform]) -> Self {
        self.markers.skip_platforms.extend_from_slice(platforms);
        self
    }

    /// Stable identifier, e.g. `1933811::test_regression_site_is_dead`
    pub fn id(&self) -> String {
        format!("{}::{}", self.bug, self.name)
    }
}

impl std::fmt::Debug for InterventionTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterventionTest")
            .field("bug", &self.bug)
            .field("site", &self.site)
            .field("name", &self.name)
            .field("markers", &self.markers)
            .finish()
    }
}
