//! Portal browser frontend
//!
//! Binds the gateway to `localStorage`, `window.location` and the page's
//! `<meta>` tags, guards each page on load and exposes a small API to page
//! scripts.

pub mod bindings;
pub mod bootstrap;
pub mod browser;

pub use bindings::{install_gateway, request_options, start};
pub use bootstrap::{browser_gateway, browser_session, init_logging, install_guard};
pub use browser::{
    BrowserDocument, BrowserLocation, BrowserStorage, injected_base_url, injected_settings,
    page_origin,
};
