//! In-process fake WebDriver endpoint for tests
//!
//! Serves the handful of commands [`Session`](crate::Session) issues, backed
//! by scripted pages instead of a browser. Pages can be made to depend on a
//! browser pref so a test can observe the effect of session capabilities.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::element::ELEMENT_KEY;
use crate::error::ErrorCode;

/// An element with a rendered box
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    pub displayed: bool,
    pub width: f64,
    pub height: f64,
}

impl MockElement {
    pub fn visible(width: f64, height: f64) -> Self {
        Self { displayed: true, width, height }
    }

    pub fn hidden(width: f64, height: f64) -> Self {
        Self { displayed: false, width, height }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPage {
    elements: Vec<(String, MockElement)>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, selector: &str, element: MockElement) -> Self {
        self.elements.push((selector.to_string(), element));
        self
    }
}

/// Evaluates `execute/sync`; receives every element passed in the arguments
pub type ScriptFn = Arc<dyn Fn(&str, &[MockElement]) -> Value + Send + Sync>;

enum Route {
    Page(MockPage),
    Fail(ErrorCode, String),
}

struct PageRule {
    url: String,
    pref: Option<(String, Value)>,
    route: Route,
}

struct SessionState {
    capabilities: Value,
    elements: HashMap<String, MockElement>,
    by_selector: HashMap<String, Vec<String>>,
}

#[derive(Default)]
struct MockState {
    rules: Vec<PageRule>,
    script: Option<ScriptFn>,
    sessions: HashMap<String, SessionState>,
    created: Vec<Value>,
    navigations: Vec<String>,
    next_id: u64,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// Builder for a fake WebDriver endpoint
#[derive(Default)]
pub struct MockDriver {
    state: MockState,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: MockPage) -> Self {
        self.state.rules.push(PageRule { url: url.to_string(), pref: None, route: Route::Page(page) });
        self
    }

    /// Serve `page` at `url` only for sessions created with `pref == value`
    pub fn page_with_pref(mut self, url: &str, pref: &str, value: impl Into<Value>, page: MockPage) -> Self {
        self.state.rules.push(PageRule {
            url: url.to_string(),
            pref: Some((pref.to_string(), value.into())),
            route: Route::Page(page),
        });
        self
    }

    /// Make navigation to `url` fail with `code`
    pub fn failing(mut self, url: &str, code: ErrorCode) -> Self {
        let message = format!("Reached error page: about:neterror?u={}", url);
        self.state.rules.push(PageRule { url: url.to_string(), pref: None, route: Route::Fail(code, message) });
        self
    }

    pub fn script(mut self, f: impl Fn(&str, &[MockElement]) -> Value + Send + Sync + 'static) -> Self {
        self.state.script = Some(Arc::new(f));
        self
    }

    /// Bind to an ephemeral localhost port and start serving
    pub async fn start(self) -> std::io::Result<MockHandle> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let endpoint = format!("http://{}", listener.local_addr()?);
        let state = Arc::new(Mutex::new(self.state));

        let app = Router::new()
            .route("/session", post(new_session))
            .route("/session/:id", delete(delete_session))
            .route("/session/:id/url", post(navigate))
            .route("/session/:id/elements", post(find_elements))
            .route("/session/:id/element/:eid/displayed", get(is_displayed))
            .route("/session/:id/execute/sync", post(execute_sync))
            .with_state(state.clone());

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(MockHandle { endpoint, state, task })
    }
}

/// A running fake endpoint; stops serving when dropped
pub struct MockHandle {
    pub endpoint: String,
    state: Arc<Mutex<MockState>>,
    task: JoinHandle<()>,
}

impl MockHandle {
    /// Capabilities of every session created so far, in order
    pub fn created_sessions(&self) -> Vec<Value> {
        self.state.lock().created.clone()
    }

    pub fn open_sessions(&self) -> usize {
        self.state.lock().sessions.len()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type Shared = State<Arc<Mutex<MockState>>>;

fn ok(value: Value) -> Response {
    Json(json!({ "value": value })).into_response()
}

fn fail(code: ErrorCode, message: &str) -> Response {
    let status = match code {
        ErrorCode::InvalidSessionId | ErrorCode::NoSuchElement => StatusCode::NOT_FOUND,
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({ "value": { "error": code.as_str(), "message": message, "stacktrace": "" } });
    (status, Json(body)).into_response()
}

fn no_session(id: &str) -> Response {
    fail(ErrorCode::InvalidSessionId, &format!("no session {}", id))
}

fn pref_matches(capabilities: &Value, pref: &Option<(String, Value)>) -> bool {
    match pref {
        None => true,
        Some((name, value)) => {
            capabilities["capabilities"]["alwaysMatch"]["moz:firefoxOptions"]["prefs"].get(name) == Some(value)
        }
    }
}

async fn new_session(State(state): Shared, Json(capabilities): Json<Value>) -> Response {
    let mut state = state.lock();
    let id = state.next_id("session");
    state.created.push(capabilities.clone());
    state.sessions.insert(
        id.clone(),
        SessionState { capabilities, elements: HashMap::new(), by_selector: HashMap::new() },
    );
    ok(json!({ "sessionId": id, "capabilities": { "browserName": "firefox" } }))
}

async fn delete_session(State(state): Shared, Path(id): Path<String>) -> Response {
    match state.lock().sessions.remove(&id) {
        Some(_) => ok(Value::Null),
        None => no_session(&id),
    }
}

async fn navigate(State(state): Shared, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let Some(url) = body["url"].as_str().map(str::to_string) else {
        return fail(ErrorCode::InvalidArgument, "missing url");
    };

    let mut guard = state.lock();
    let state = &mut *guard;
    let Some(session) = state.sessions.get(&id) else {
        return no_session(&id);
    };
    state.navigations.push(url.clone());

    let page = state
        .rules
        .iter()
        .find(|rule| rule.url == url && pref_matches(&session.capabilities, &rule.pref))
        .map(|rule| &rule.route);

    let page = match page {
        Some(Route::Fail(code, message)) => return fail(code.clone(), message),
        Some(Route::Page(page)) => page.clone(),
        None => MockPage::default(),
    };

    let mut elements = HashMap::new();
    let mut by_selector: HashMap<String, Vec<String>> = HashMap::new();
    for (selector, element) in page.elements {
        let eid = state.next_id("el");
        elements.insert(eid.clone(), element);
        by_selector.entry(selector).or_default().push(eid);
    }

    if let Some(session) = state.sessions.get_mut(&id) {
        session.elements = elements;
        session.by_selector = by_selector;
    }
    ok(Value::Null)
}

async fn find_elements(State(state): Shared, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let state = state.lock();
    let Some(session) = state.sessions.get(&id) else {
        return no_session(&id);
    };
    if body["using"] != "css selector" {
        return fail(ErrorCode::InvalidArgument, "only css selectors are supported");
    }
    let selector = body["value"].as_str().unwrap_or_default();
    let found: Vec<Value> = session
        .by_selector
        .get(selector)
        .map(|ids| ids.iter().map(|eid| json!({ ELEMENT_KEY: eid })).collect())
        .unwrap_or_default();
    ok(Value::Array(found))
}

async fn is_displayed(State(state): Shared, Path((id, eid)): Path<(String, String)>) -> Response {
    let state = state.lock();
    let Some(session) = state.sessions.get(&id) else {
        return no_session(&id);
    };
    match session.elements.get(&eid) {
        Some(element) => ok(json!(element.displayed)),
        None => fail(ErrorCode::StaleElementReference, &format!("{} is no longer attached", eid)),
    }
}

fn collect_elements(value: &Value, session: &SessionState, out: &mut Vec<MockElement>) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_elements(v, session, out)),
        Value::Object(map) => {
            if let Some(element) = map.get(ELEMENT_KEY).and_then(Value::as_str).and_then(|eid| session.elements.get(eid)) {
                out.push(element.clone());
            }
        }
        _ => {}
    }
}

async fn execute_sync(State(state): Shared, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let state = state.lock();
    let Some(session) = state.sessions.get(&id) else {
        return no_session(&id);
    };
    let Some(script) = state.script.clone() else {
        return fail(ErrorCode::JavascriptError, "no script evaluator configured");
    };

    let mut elements = Vec::new();
    collect_elements(&body["args"], session, &mut elements);
    ok(script(body["script"].as_str().unwrap_or_default(), &elements))
}
