//! Page-load session guard

use crate::paths::PathPolicy;
use crate::session::Session;
use std::sync::Arc;

/// Outcome of checking the current page against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The page may be shown as is
    Stay,
    /// No session on a protected page
    RedirectToLogin,
    /// Signed in, but on a login/register/forgot-password page
    RedirectToHome,
    /// The page opts out of guarding entirely
    Exempt,
}

impl GuardDecision {
    pub fn decide(has_session: bool, path: &str, paths: &PathPolicy) -> Self {
        if paths.is_guard_exempt(path) {
            return Self::Exempt;
        }
        match (has_session, paths.is_public(path)) {
            (false, false) => Self::RedirectToLogin,
            (true, true) => Self::RedirectToHome,
            _ => Self::Stay,
        }
    }
}

/// Redirects visitors to where their session state says they belong
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Arc<Session>,
}

impl SessionGuard {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Check the current page and redirect if needed. Meant to run once per
    /// page load.
    pub fn enforce(&self) -> GuardDecision {
        let path = self.session.current_path();
        let decision = GuardDecision::decide(self.session.has_session(), &path, self.session.paths());
        tracing::debug!(path = %path, ?decision, "Session guard");

        match decision {
            GuardDecision::RedirectToLogin => self.session.redirect(&self.session.login_url()),
            GuardDecision::RedirectToHome => self.session.redirect(&self.session.home_url()),
            GuardDecision::Stay | GuardDecision::Exempt => {}
        }
        decision
    }
}
