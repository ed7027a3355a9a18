//! Wiring the browser adapters into a session, gateway and page guard

use crate::browser::{
    BrowserDocument, BrowserLocation, BrowserStorage, injected_base_url, page_origin,
};
use gloo_events::EventListener;
use portal_core::{PortalResult, PortalSettings, Session, SessionGuard};
use portal_http::{ClientError, RequestGateway};
use std::sync::Arc;
use tracing_subscriber::fmt::format::Pretty;
use tracing_subscriber::prelude::*;
use tracing_web::{MakeWebConsoleWriter, performance_layer};

/// Route `tracing` output to the browser console.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialised");
    }
}

/// Build a session over `localStorage`, `window.location` and `document`.
///
/// The base URL comes from `settings.base_url`, then `window.APP_URL`, then
/// the page origin.
pub fn browser_session(settings: PortalSettings) -> PortalResult<Arc<Session>> {
    let base_url =
        settings.resolve_base_url(injected_base_url().as_deref(), page_origin().as_deref())?;

    let session = Session::builder()
        .settings(settings)
        .base_url(base_url)
        .store(Arc::new(BrowserStorage))
        .location(Arc::new(BrowserLocation))
        .document(Arc::new(BrowserDocument))
        .build()?;

    tracing::debug!(base_url = %session.base_url(), "Browser session ready");
    Ok(Arc::new(session))
}

/// Build a request gateway for the current page
pub fn browser_gateway(settings: PortalSettings) -> Result<RequestGateway, ClientError> {
    let session = browser_session(settings)?;
    RequestGateway::new(session)
}

/// Run the session guard once the document has been parsed.
///
/// If parsing already finished the guard runs immediately.
pub fn install_guard(session: Arc<Session>) {
    let guard = SessionGuard::new(session);
    let document = gloo_utils::document();

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            guard.enforce();
        })
        .forget();
    } else {
        guard.enforce();
    }
}
