//! Response interception policy

use crate::paths::PathPolicy;
use http::StatusCode;

/// What the gateway should do after seeing a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// Hand the response back untouched
    Continue,
    /// The session expired: clear credentials and send the user to login
    Logout,
}

/// Maps a response status and the current page path to an action
#[derive(Debug, Clone, Default)]
pub struct SessionExpiryPolicy {
    paths: PathPolicy,
}

impl SessionExpiryPolicy {
    pub fn new(paths: PathPolicy) -> Self {
        Self { paths }
    }

    /// Only an exact 401 counts as an expired session, and never while the
    /// user is already on a public page (a failed login attempt also
    /// answers 401).
    pub fn evaluate(&self, status: StatusCode, current_path: &str) -> ResponseAction {
        if status == StatusCode::UNAUTHORIZED && !self.paths.is_public(current_path) {
            tracing::debug!(path = current_path, "Unauthorized response outside public pages");
            ResponseAction::Logout
        } else {
            ResponseAction::Continue
        }
    }
}
