//! Functions exported to page scripts
//!
//! Server-rendered pages that are not written in Rust call these through
//! the generated JS glue: `saveTokens(tokens)`, `logout()`, `getUser()`,
//! `checkAuth()`, `hasSession()` and `apiRequest(path, method, body, headers)`.

use crate::bootstrap::{browser_gateway, init_logging, install_guard};
use crate::browser::injected_settings;
use http::{HeaderName, HeaderValue, Method};
use portal_core::{GuardDecision, SessionGuard, TokenBundle};
use portal_http::{RequestGateway, RequestOptions};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

thread_local! {
    static GATEWAY: RefCell<Option<RequestGateway>> = const { RefCell::new(None) };
}

/// The page's gateway, built on first use
fn gateway() -> Result<RequestGateway, JsError> {
    GATEWAY.with(|slot| {
        if let Some(gateway) = slot.borrow().as_ref() {
            return Ok(gateway.clone());
        }
        let gateway = browser_gateway(injected_settings())?;
        *slot.borrow_mut() = Some(gateway.clone());
        Ok(gateway)
    })
}

/// Use `gateway` for every exported function on this page instead of the
/// one built from `window.PORTAL_SETTINGS`
pub fn install_gateway(gateway: RequestGateway) {
    GATEWAY.with(|slot| *slot.borrow_mut() = Some(gateway));
}

/// Initialise logging and guard the current page.
///
/// Runs when the module is instantiated unless the `autostart` feature is off.
#[cfg_attr(feature = "autostart", wasm_bindgen(start))]
pub fn start() {
    init_logging();
    match gateway() {
        Ok(gateway) => install_guard(gateway.session().clone()),
        Err(e) => {
            tracing::error!(error = ?JsValue::from(e), "Portal failed to start");
        }
    }
}

/// Store `{ access: { token }, refresh: { token } }` as issued by the API
#[wasm_bindgen(js_name = saveTokens)]
pub fn save_tokens(tokens: JsValue) -> Result<(), JsError> {
    let bundle: TokenBundle = serde_wasm_bindgen::from_value(tokens)?;
    gateway()?.save_credentials(&bundle)?;
    Ok(())
}

/// Clear stored tokens and go to the login page
#[wasm_bindgen]
pub fn logout() -> Result<(), JsError> {
    gateway()?.logout();
    Ok(())
}

/// Claims of the stored access token, or `null`
#[wasm_bindgen(js_name = getUser)]
pub fn get_user() -> Result<JsValue, JsError> {
    match gateway()?.current_user() {
        Some(claims) => Ok(claims.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?),
        None => Ok(JsValue::NULL),
    }
}

/// Run the session guard now: anonymous visitors go to the login page,
/// signed-in visitors leave the login/register pages.
///
/// Returns `true` when a redirect was started.
#[wasm_bindgen(js_name = checkAuth)]
pub fn check_auth() -> Result<bool, JsError> {
    let decision = SessionGuard::new(gateway()?.session().clone()).enforce();
    Ok(matches!(
        decision,
        GuardDecision::RedirectToLogin | GuardDecision::RedirectToHome
    ))
}

/// Whether an access token is stored
#[wasm_bindgen(js_name = hasSession)]
pub fn has_session() -> Result<bool, JsError> {
    Ok(gateway()?.session().has_session())
}

/// Build request options from the loosely typed page script arguments.
///
/// `headers` may be `undefined`, `null` or an object of string values; they
/// override the gateway defaults.
pub fn request_options(
    method: Option<&str>,
    body: Option<String>,
    headers: JsValue,
) -> Result<RequestOptions, JsError> {
    let method = match method {
        Some(method) => Method::from_bytes(method.to_uppercase().as_bytes())?,
        None => Method::GET,
    };
    let mut options = RequestOptions::new(method);

    let headers: Option<HashMap<String, String>> = serde_wasm_bindgen::from_value(headers)?;
    for (name, value) in headers.unwrap_or_default() {
        options = options.header(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(&value)?,
        );
    }

    if let Some(body) = body {
        options = options.body(body);
    }
    Ok(options)
}

#[derive(Serialize)]
struct ApiReply {
    status: u16,
    ok: bool,
    body: String,
}

/// Send a request through the gateway and resolve to `{ status, ok, body }`.
///
/// A 401 outside the public pages logs out before the promise resolves.
#[wasm_bindgen(js_name = apiRequest)]
pub async fn api_request(
    path: String,
    method: Option<String>,
    body: Option<String>,
    headers: JsValue,
) -> Result<JsValue, JsError> {
    let options = request_options(method.as_deref(), body, headers)?;
    let response = gateway()?.request(&path, options).await?;
    let status = response.status();
    let reply = ApiReply {
        status: status.as_u16(),
        ok: status.is_success(),
        body: response.text().await?,
    };
    Ok(serde_wasm_bindgen::to_value(&reply)?)
}
