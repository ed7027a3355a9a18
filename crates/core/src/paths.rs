//! Page path classification

use crate::settings::RouteSettings;

/// Decides which pages are public and which skip the page-load guard.
///
/// Matching is by substring, so `/login?next=/users` and `/auth/login` are
/// both public under the default `/login` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    public_paths: Vec<String>,
    guard_exempt_paths: Vec<String>,
}

impl PathPolicy {
    pub fn new(public_paths: Vec<String>, guard_exempt_paths: Vec<String>) -> Self {
        Self {
            public_paths,
            guard_exempt_paths,
        }
    }

    pub fn from_routes(routes: &RouteSettings) -> Self {
        Self::new(
            routes.public_paths.clone(),
            routes.guard_exempt_paths.clone(),
        )
    }

    /// Login, register and forgot-password style pages
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| path.contains(p.as_str()))
    }

    /// Pages the guard never runs on, such as the API documentation viewer
    pub fn is_guard_exempt(&self, path: &str) -> bool {
        self.guard_exempt_paths
            .iter()
            .any(|p| path.contains(p.as_str()))
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::from_routes(&RouteSettings::default())
    }
}
