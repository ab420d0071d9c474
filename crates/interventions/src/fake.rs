//! In-memory automation client for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use webcompat_webdriver::{AutomationClient, AwaitCss, ElementRef, ErrorCode, WebDriverError, WebDriverResult};

#[derive(Debug, Clone)]
pub struct FakeBox {
    pub width: f64,
    pub height: f64,
    pub displayed: bool,
}

impl FakeBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, displayed: true }
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }
}

/// Answers every selector with the same set of boxes and evaluates scripts
/// as the box aspect check
#[derive(Default)]
pub struct FakeClient {
    navigation_error: Option<ErrorCode>,
    boxes: Vec<FakeBox>,
    script_result: Option<Value>,
    calls: Mutex<Vec<&'static str>>,
    navigations: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_navigation(mut self, code: ErrorCode) -> Self {
        self.navigation_error = Some(code);
        self
    }

    pub fn boxes(mut self, boxes: Vec<FakeBox>) -> Self {
        self.boxes = boxes;
        self
    }

    pub fn script_result(mut self, value: Value) -> Self {
        self.script_result = Some(value);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl AutomationClient for FakeClient {
    async fn navigate(&self, url: &str) -> WebDriverResult<()> {
        self.record("navigate");
        self.navigations.lock().push(url.to_string());
        match &self.navigation_error {
            Some(code) => Err(WebDriverError::Protocol {
                code: code.clone(),
                message: format!("Reached error page for {}", url),
            }),
            None => Ok(()),
        }
    }

    async fn await_css(&self, _selector: &str, options: AwaitCss) -> WebDriverResult<Vec<ElementRef>> {
        self.record("await_css");
        let mut found: Vec<ElementRef> = self
            .boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.displayed || !options.displayed)
            .map(|(i, _)| ElementRef::new(i.to_string()))
            .collect();
        if !options.all {
            found.truncate(1);
        }
        Ok(found)
    }

    async fn execute_script(&self, _script: &str, args: Vec<Value>) -> WebDriverResult<Value> {
        self.record("execute_script");
        if let Some(result) = &self.script_result {
            return Ok(result.clone());
        }

        let elements: Vec<ElementRef> = match args.into_iter().next() {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        let ok = elements
            .iter()
            .filter_map(|el| el.id.parse::<usize>().ok())
            .filter_map(|i| self.boxes.get(i))
            .all(|b| b.height <= b.width);
        Ok(json!(ok))
    }
}
