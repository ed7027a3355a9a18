//! Page location and document providers
//!
//! These replace direct reads of `window.location` and `document` so the
//! redirect and header logic can run against fakes.

use crate::error::PortalResult;
use std::collections::HashMap;
use std::sync::Mutex;

/// Current page location plus hard navigation
#[cfg_attr(test, mockall::automock)]
pub trait Location: Send + Sync {
    /// Path component of the current page URL, e.g. `/app/dashboard`
    fn pathname(&self) -> String;

    /// Navigate the page to `url`. In a browser this unloads the page.
    fn navigate(&self, url: &str) -> PortalResult<()>;
}

/// Read access to server-rendered document metadata
#[cfg_attr(test, mockall::automock)]
pub trait DocumentQuery: Send + Sync {
    /// `content` attribute of the `<meta name="...">` element, if present
    fn meta_content(&self, name: &str) -> Option<String>;
}

/// Location with a settable path that records every navigation
#[derive(Debug, Default)]
pub struct StaticLocation {
    pathname: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl StaticLocation {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: Mutex::new(pathname.into()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    pub fn set_pathname(&self, pathname: impl Into<String>) {
        if let Ok(mut current) = self.pathname.lock() {
            *current = pathname.into();
        }
    }

    /// URLs passed to [`Location::navigate`], oldest first
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Location for StaticLocation {
    fn pathname(&self) -> String {
        self.pathname
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn navigate(&self, url: &str) -> PortalResult<()> {
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(url.to_string());
        }
        Ok(())
    }
}

/// Document whose metadata is fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    meta: HashMap<String, String>,
}

impl StaticDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(name.into(), content.into());
        self
    }
}

impl DocumentQuery for StaticDocument {
    fn meta_content(&self, name: &str) -> Option<String> {
        self.meta.get(name).cloned()
    }
}
