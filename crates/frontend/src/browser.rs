//! `localStorage`, `window.location` and `document` adapters
//!
//! Each adapter looks the browser object up on every call, so they hold no
//! JS handles and satisfy the `Send + Sync` bounds of the core traits.

use portal_core::{DocumentQuery, KeyValueStore, Location, PortalError, PortalResult, PortalSettings};
use wasm_bindgen::JsValue;
use web_sys::Storage;

fn local_storage() -> PortalResult<Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| PortalError::storage("localStorage is unavailable"))
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// [`KeyValueStore`] over `window.localStorage`. Values are stored raw, not
/// JSON encoded, so pages reading the same keys see plain token strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| PortalError::storage(js_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| PortalError::storage(js_message(&e)))
    }

    fn remove(&self, key: &str) -> PortalResult<()> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| PortalError::storage(js_message(&e)))
    }
}

/// [`Location`] over `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl Location for BrowserLocation {
    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, url: &str) -> PortalResult<()> {
        let window =
            web_sys::window().ok_or_else(|| PortalError::navigation("no window to navigate"))?;
        window
            .location()
            .set_href(url)
            .map_err(|e| PortalError::navigation(js_message(&e)))
    }
}

/// [`DocumentQuery`] over the current `document`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDocument;

impl DocumentQuery for BrowserDocument {
    fn meta_content(&self, name: &str) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let selector = format!("meta[name=\"{name}\"]");
        match document.query_selector(&selector) {
            Ok(element) => element?.get_attribute("content"),
            Err(e) => {
                tracing::warn!(name, error = %js_message(&e), "Invalid meta selector");
                None
            }
        }
    }
}

/// Base URL the server rendered into the page as `window.APP_URL`
pub fn injected_base_url() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str("APP_URL"))
        .ok()?
        .as_string()
        .filter(|url| !url.is_empty())
}

/// `window.location.origin`, the last-resort base URL
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// Settings object the page may provide as `window.PORTAL_SETTINGS`.
///
/// Missing fields fall back to their defaults; a malformed object is logged
/// and ignored.
pub fn injected_settings() -> PortalSettings {
    let Some(value) = web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("PORTAL_SETTINGS")).ok())
        .filter(|v| !v.is_undefined() && !v.is_null())
    else {
        return PortalSettings::default();
    };

    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed PORTAL_SETTINGS");
        PortalSettings::default()
    })
}
