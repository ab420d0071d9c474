//! Session tests against the in-process fake endpoint

use std::time::Duration;

use serde_json::{json, Value};
use webcompat_webdriver::testing::{MockDriver, MockElement, MockPage};
use webcompat_webdriver::{
    AutomationClient, AwaitCss, ErrorCode, FirefoxCapabilities, Polling, Session, WebDriverError,
};

fn quick() -> Polling {
    Polling {
        timeout: Duration::from_millis(300),
        interval: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn test_session_lifecycle_sends_capabilities() {
    let driver = MockDriver::new().start().await.unwrap();
    let caps = FirefoxCapabilities::new().pref("dom.example", true).headless(true);

    let session = Session::new(&driver.endpoint, &caps).await.unwrap();
    assert!(!session.id().is_empty());
    assert_eq!(driver.open_sessions(), 1);

    let created = driver.created_sessions();
    assert_eq!(
        created[0]["capabilities"]["alwaysMatch"]["moz:firefoxOptions"]["prefs"]["dom.example"],
        true
    );

    session.close().await.unwrap();
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn test_navigation_failure_keeps_classification() {
    let driver = MockDriver::new()
        .failing("https://dead.example/", ErrorCode::UnknownError)
        .failing("https://self-signed.example/", ErrorCode::InsecureCertificate)
        .start()
        .await
        .unwrap();
    let session = Session::new(&driver.endpoint, &FirefoxCapabilities::new()).await.unwrap();

    let err = session.navigate("https://dead.example/").await.unwrap_err();
    assert!(err.is_unknown_error(), "got {err}");

    let err = session.navigate("https://self-signed.example/").await.unwrap_err();
    assert!(!err.is_unknown_error());
    assert_eq!(err.code(), Some(&ErrorCode::InsecureCertificate));

    session.navigate("https://alive.example/").await.unwrap();
    assert_eq!(driver.navigations().len(), 3);
}

#[tokio::test]
async fn test_await_css_filters_hidden_and_honours_all() {
    let page = MockPage::new()
        .element("td", MockElement::hidden(10.0, 10.0))
        .element("td", MockElement::visible(20.0, 10.0))
        .element("td", MockElement::visible(30.0, 10.0));
    let driver = MockDriver::new().page("https://site.example/", page).start().await.unwrap();
    let session = Session::new(&driver.endpoint, &FirefoxCapabilities::new())
        .await
        .unwrap()
        .with_polling(quick());
    session.navigate("https://site.example/").await.unwrap();

    let any = AwaitCss::default();
    assert_eq!(session.find_elements("td").await.unwrap().len(), 3);
    assert_eq!(session.await_css("td", any.displayed().all()).await.unwrap().len(), 2);
    assert_eq!(session.await_css("td", any.displayed()).await.unwrap().len(), 1);
    assert_eq!(session.await_css("td", any.all()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_await_css_times_out_when_nothing_matches() {
    let driver = MockDriver::new().start().await.unwrap();
    let session = Session::new(&driver.endpoint, &FirefoxCapabilities::new())
        .await
        .unwrap()
        .with_polling(quick());
    session.navigate("https://empty.example/").await.unwrap();

    assert!(session.find_elements(".missing").await.unwrap().is_empty());
    let err = session
        .await_css(".missing", AwaitCss::default().displayed().all())
        .await
        .unwrap_err();
    assert!(matches!(err, WebDriverError::Timeout(ref s) if s == ".missing"));

    let err = session
        .await_css(".missing", AwaitCss::default().timeout(Duration::from_millis(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, WebDriverError::Timeout(_)));
}

#[tokio::test]
async fn test_execute_script_receives_element_arguments() {
    let page = MockPage::new()
        .element(".cell", MockElement::visible(40.0, 12.0))
        .element(".cell", MockElement::visible(12.0, 40.0));
    let driver = MockDriver::new()
        .page("https://site.example/", page)
        .script(|_, els| json!(els.len()))
        .start()
        .await
        .unwrap();
    let session = Session::new(&driver.endpoint, &FirefoxCapabilities::new()).await.unwrap();
    session.navigate("https://site.example/").await.unwrap();

    let cells = session.await_css(".cell", AwaitCss::default().all()).await.unwrap();
    let client: &dyn AutomationClient = &session;
    let result = client
        .execute_script("return arguments[0].length;", vec![serde_json::to_value(&cells).unwrap()])
        .await
        .unwrap();
    assert_eq!(result, json!(2));

    let none = client.execute_script("return 0;", vec![]).await.unwrap();
    assert_eq!(none, json!(0));
}

#[tokio::test]
async fn test_commands_on_closed_session_fail() {
    let driver = MockDriver::new().start().await.unwrap();
    let session = Session::new(&driver.endpoint, &FirefoxCapabilities::new()).await.unwrap();
    let endpoint = driver.endpoint.clone();
    let id = session.id().to_string();
    session.close().await.unwrap();

    let response: Value = reqwest::Client::new()
        .post(format!("{}/session/{}/url", endpoint, id))
        .json(&json!({ "url": "https://x.example/" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["value"]["error"], "invalid session id");
}
