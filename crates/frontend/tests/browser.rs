//! Browser adapter tests.
//!
//! Run with `wasm-pack test --headless --firefox -- --no-default-features`
//! so the page guard does not navigate the test runner away.

#![cfg(target_arch = "wasm32")]

use http::header::CONTENT_TYPE;
use portal_core::{
    DocumentQuery, KeyValueStore, Location, PortalSettings, Session, StaticDocument,
    StaticLocation, TokenBundle,
};
use portal_frontend::bindings::{check_auth, has_session};
use portal_frontend::{
    BrowserDocument, BrowserLocation, BrowserStorage, browser_session, injected_base_url,
    injected_settings, install_gateway, request_options,
};
use portal_http::RequestGateway;
use std::sync::Arc;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn set_global(name: &str, value: &JsValue) {
    let window = web_sys::window().unwrap();
    js_sys::Reflect::set(&window, &JsValue::from_str(name), value).unwrap();
}

fn clear_global(name: &str) {
    let window = web_sys::window().unwrap();
    js_sys::Reflect::delete_property(&window, &JsValue::from_str(name)).unwrap();
}

#[wasm_bindgen_test]
fn storage_keeps_raw_strings() {
    let storage = BrowserStorage;
    storage.set("portalTestKey", "plain-token").unwrap();

    let raw = web_sys::window()
        .unwrap()
        .local_storage()
        .unwrap()
        .unwrap()
        .get_item("portalTestKey")
        .unwrap();
    assert_eq!(raw.as_deref(), Some("plain-token"));
    assert_eq!(storage.get("portalTestKey").unwrap().as_deref(), Some("plain-token"));

    storage.remove("portalTestKey").unwrap();
    assert_eq!(storage.get("portalTestKey").unwrap(), None);
    // Removing again is fine
    storage.remove("portalTestKey").unwrap();
}

#[wasm_bindgen_test]
fn document_reads_meta_content() {
    let document = web_sys::window().unwrap().document().unwrap();
    let meta = document.create_element("meta").unwrap();
    meta.set_attribute("name", "portal-test-meta").unwrap();
    meta.set_attribute("content", "abc123").unwrap();
    document.head().unwrap().append_child(&meta).unwrap();

    assert_eq!(
        BrowserDocument.meta_content("portal-test-meta").as_deref(),
        Some("abc123")
    );
    assert_eq!(BrowserDocument.meta_content("portal-missing-meta"), None);

    meta.remove();
}

#[wasm_bindgen_test]
fn location_reports_a_path() {
    assert!(BrowserLocation.pathname().starts_with('/'));
}

#[wasm_bindgen_test]
fn app_url_global_is_read() {
    set_global("APP_URL", &JsValue::from_str("https://app.example.com"));
    assert_eq!(
        injected_base_url().as_deref(),
        Some("https://app.example.com")
    );

    set_global("APP_URL", &JsValue::from_str(""));
    assert_eq!(injected_base_url(), None);

    clear_global("APP_URL");
    assert_eq!(injected_base_url(), None);
}

#[wasm_bindgen_test]
fn settings_global_overrides_defaults() {
    let value = js_sys::JSON::parse(
        r#"{"base_url":"https://api.example.com","routes":{"login_path":"/signin"}}"#,
    )
    .unwrap();
    set_global("PORTAL_SETTINGS", &value);

    let settings = injected_settings();
    assert_eq!(settings.base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(settings.routes.login_path, "/signin");
    assert_eq!(settings.routes.home_path, "/");
    assert_eq!(settings.storage.access_token, "accessToken");

    set_global("PORTAL_SETTINGS", &JsValue::from_str("not an object"));
    assert_eq!(injected_settings(), PortalSettings::default());

    clear_global("PORTAL_SETTINGS");
    assert_eq!(injected_settings(), PortalSettings::default());
}

#[wasm_bindgen_test]
fn session_uses_local_storage() {
    let mut settings = PortalSettings::default();
    settings.base_url = Some("https://app.example.com/".to_string());
    settings.storage.access_token = "portalTestAccess".to_string();
    settings.storage.refresh_token = "portalTestRefresh".to_string();

    let session = browser_session(settings).unwrap();
    assert_eq!(session.base_url(), "https://app.example.com");
    assert!(!session.has_session());

    session
        .save_credentials(&TokenBundle::access("tok").with_refresh("ref"))
        .unwrap();
    assert!(session.has_session());
    assert_eq!(
        BrowserStorage.get("portalTestRefresh").unwrap().as_deref(),
        Some("ref")
    );

    session.credentials().clear().unwrap();
    assert!(!session.has_session());
}

fn page_gateway(page: &str) -> Arc<StaticLocation> {
    let location = Arc::new(StaticLocation::new(page));
    let session = Session::builder()
        .base_url("https://app.test")
        .store(Arc::new(BrowserStorage))
        .location(location.clone())
        .document(Arc::new(StaticDocument::new()))
        .build()
        .unwrap();
    install_gateway(RequestGateway::new(Arc::new(session)).unwrap());
    location
}

fn clear_tokens() {
    BrowserStorage.remove("accessToken").unwrap();
    BrowserStorage.remove("refreshToken").unwrap();
}

#[wasm_bindgen_test]
fn check_auth_sends_anonymous_visitor_to_login() {
    clear_tokens();
    let location = page_gateway("/dashboard");

    assert!(has_session().is_ok_and(|signed_in| !signed_in));
    assert!(check_auth().is_ok_and(|redirected| redirected));
    assert_eq!(location.navigations(), vec!["https://app.test/login"]);
}

#[wasm_bindgen_test]
fn check_auth_sends_signed_in_visitor_home() {
    clear_tokens();
    BrowserStorage.set("accessToken", "tok").unwrap();
    let location = page_gateway("/login");

    assert!(has_session().is_ok_and(|signed_in| signed_in));
    assert!(check_auth().is_ok_and(|redirected| redirected));
    assert_eq!(location.navigations(), vec!["https://app.test/"]);
    clear_tokens();
}

#[wasm_bindgen_test]
fn check_auth_leaves_swagger_alone() {
    clear_tokens();
    let location = page_gateway("/swagger/index.html");

    assert!(check_auth().is_ok_and(|redirected| !redirected));
    assert!(location.navigations().is_empty());
}

#[wasm_bindgen_test]
fn page_script_headers_reach_request_options() {
    let headers = js_sys::JSON::parse(
        r#"{"Content-Type":"multipart/form-data; boundary=x","X-Trace":"abc"}"#,
    )
    .unwrap();

    let options = request_options(Some("post"), Some("payload".to_string()), headers)
        .unwrap_or_else(|_| panic!("headers should convert"));
    assert_eq!(options.method, http::Method::POST);
    assert_eq!(
        options.headers.get(CONTENT_TYPE).unwrap(),
        "multipart/form-data; boundary=x"
    );
    assert_eq!(options.headers.get("x-trace").unwrap(), "abc");
    assert_eq!(options.body.as_deref(), Some(&b"payload"[..]));

    let options = request_options(None, None, JsValue::UNDEFINED)
        .unwrap_or_else(|_| panic!("missing headers are allowed"));
    assert_eq!(options.method, http::Method::GET);
    assert!(options.headers.is_empty());

    assert!(request_options(None, None, JsValue::from_str("nope")).is_err());
}
