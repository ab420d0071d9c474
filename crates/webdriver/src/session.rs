//! WebDriver session over HTTP

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::capabilities::FirefoxCapabilities;
use crate::element::ElementRef;
use crate::error::{ErrorCode, ErrorPayload, WebDriverError, WebDriverResult};

/// Options for [`Session::await_css`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AwaitCss {
    /// Only accept elements that are displayed
    pub displayed: bool,
    /// Return every matching element instead of the first one
    pub all: bool,
    /// Overrides the session's polling timeout
    pub timeout: Option<Duration>,
}

impl AwaitCss {
    pub fn displayed(mut self) -> Self {
        self.displayed = true;
        self
    }

    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// How long and how often element lookups are retried
#[derive(Debug, Clone, Copy)]
pub struct Polling {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// An open WebDriver session
pub struct Session {
    http: reqwest::Client,
    endpoint: String,
    id: String,
    polling: Polling,
}

impl Session {
    /// Create a new session on the remote end at `endpoint`
    pub async fn new(endpoint: &str, capabilities: &FirefoxCapabilities) -> WebDriverResult<Self> {
        let http = reqwest::Client::builder().build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let url = format!("{}/session", endpoint);
        let value = send(&http, Method::POST, &url, Some(capabilities.to_json())).await?;
        let created: NewSession = serde_json::from_value(value)?;

        info!("Created WebDriver session {}", created.session_id);
        Ok(Self {
            http,
            endpoint,
            id: created.session_id,
            polling: Polling::default(),
        })
    }

    pub fn with_polling(mut self, polling: Polling) -> Self {
        self.polling = polling;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> WebDriverResult<Value> {
        let url = format!("{}/session/{}{}", self.endpoint, self.id, path);
        send(&self.http, method, &url, body).await
    }

    /// Navigate the current top-level browsing context
    pub async fn navigate(&self, url: &str) -> WebDriverResult<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    /// Find all elements matching a CSS selector; may be empty
    pub async fn find_elements(&self, selector: &str) -> WebDriverResult<Vec<ElementRef>> {
        let value = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn is_displayed(&self, element: &ElementRef) -> WebDriverResult<bool> {
        let value = self
            .command(Method::GET, &format!("/element/{}/displayed", element.id), None)
            .await?;
        value
            .as_bool()
            .ok_or_else(|| WebDriverError::InvalidResponse(format!("expected boolean, got {}", value)))
    }

    /// Poll until elements matching `selector` are present (and displayed if
    /// requested), returning either all of them or just the first.
    pub async fn await_css(&self, selector: &str, options: AwaitCss) -> WebDriverResult<Vec<ElementRef>> {
        let start = Instant::now();
        let timeout = options.timeout.unwrap_or(self.polling.timeout);

        loop {
            let mut found = self.find_elements(selector).await?;

            if options.displayed {
                let mut shown = Vec::with_capacity(found.len());
                for element in found {
                    match self.is_displayed(&element).await {
                        Ok(true) => shown.push(element),
                        Ok(false) => {}
                        // the node went away between lookup and check
                        Err(e) if matches!(e.code(), Some(ErrorCode::StaleElementReference)) => {}
                        Err(e) => return Err(e),
                    }
                }
                found = shown;
            }

            if !found.is_empty() {
                if !options.all {
                    found.truncate(1);
                }
                debug!("Found {} element(s) for {}", found.len(), selector);
                return Ok(found);
            }

            if start.elapsed() >= timeout {
                return Err(WebDriverError::Timeout(selector.to_string()));
            }
            sleep(self.polling.interval).await;
        }
    }

    /// Run a synchronous script in the page; `arguments` is available to it
    pub async fn execute_script(&self, script: &str, args: Vec<Value>) -> WebDriverResult<Value> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    /// End the session and close the browser
    pub async fn close(self) -> WebDriverResult<()> {
        info!("Deleting WebDriver session {}", self.id);
        let url = format!("{}/session/{}", self.endpoint, self.id);
        send(&self.http, Method::DELETE, &url, None).await?;
        Ok(())
    }
}

/// Send one command and unwrap the `value` member of the response
async fn send(http: &reqwest::Client, method: Method, url: &str, body: Option<Value>) -> WebDriverResult<Value> {
    debug!("WebDriver {} {}", method, url);

    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let mut body: Value = response.json().await?;
    let value = body
        .get_mut("value")
        .map(Value::take)
        .ok_or_else(|| WebDriverError::InvalidResponse(format!("missing value in {} response", status)))?;

    if status == StatusCode::OK {
        return Ok(value);
    }

    match serde_json::from_value::<ErrorPayload>(value) {
        Ok(payload) => Err(payload.into()),
        Err(_) => Err(WebDriverError::InvalidResponse(format!("HTTP {} without error payload", status))),
    }
}
