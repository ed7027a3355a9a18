//! Session service
//!
//! Owns the injected dependencies (storage, location, document) and the
//! resolved base URL. The request gateway and the page guard both act
//! through it instead of reaching for page globals.

use crate::claims::{UserClaims, decode_claims};
use crate::credentials::{CredentialStore, TokenBundle};
use crate::error::{PortalError, PortalResult, TokenError};
use crate::location::{DocumentQuery, Location, StaticDocument};
use crate::paths::PathPolicy;
use crate::settings::PortalSettings;
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Browser-session state and the side effects that change it
pub struct Session {
    base_url: String,
    settings: PortalSettings,
    paths: PathPolicy,
    credentials: CredentialStore,
    location: Arc<dyn Location>,
    document: Arc<dyn DocumentQuery>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Base origin without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    pub fn paths(&self) -> &PathPolicy {
        &self.paths
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Absolute URLs (anything starting with `http`) pass through; everything
    /// else is appended to the base URL.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    pub fn login_url(&self) -> String {
        self.resolve_url(&self.settings.routes.login_path)
    }

    pub fn home_url(&self) -> String {
        self.resolve_url(&self.settings.routes.home_path)
    }

    pub fn current_path(&self) -> String {
        self.location.pathname()
    }

    /// CSRF value rendered into the page, read fresh on every call
    pub fn csrf_token(&self) -> Option<String> {
        self.document.meta_content(&self.settings.csrf.meta_name)
    }

    /// Stored access token; unreadable storage reads as no token
    pub fn access_token(&self) -> Option<String> {
        self.credentials.access_token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read access token");
            None
        })
    }

    pub fn has_session(&self) -> bool {
        self.credentials.has_session()
    }

    /// Persist the tokens present in `bundle`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects a write
    pub fn save_credentials(&self, bundle: &TokenBundle) -> PortalResult<()> {
        self.credentials.save(bundle)
    }

    /// Drop both tokens and hard-navigate to the login page.
    ///
    /// Navigation happens even if clearing storage failed; in a browser the
    /// page unloads afterwards.
    pub fn logout(&self) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "Failed to clear stored credentials");
        }

        let target = self.login_url();
        tracing::info!(target = %target, "Logging out");
        self.redirect(&target);
    }

    /// Navigate to `url`, logging failures
    pub fn redirect(&self, url: &str) {
        if let Err(e) = self.location.navigate(url) {
            tracing::error!(url, error = %e, "Navigation failed");
        }
    }

    /// Claims of the stored access token, or `None` when there is no token
    /// or it cannot be decoded
    pub fn current_user(&self) -> Option<UserClaims> {
        match self.decode_current_user() {
            Ok(claims) => Some(claims),
            Err(TokenError::Missing) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Stored access token is not decodable");
                None
            }
        }
    }

    fn decode_current_user(&self) -> Result<UserClaims, TokenError> {
        let token = self.credentials.access_token()?.ok_or(TokenError::Missing)?;
        decode_claims(&token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Session`]
#[derive(Default)]
pub struct SessionBuilder {
    settings: Option<PortalSettings>,
    base_url: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
    location: Option<Arc<dyn Location>>,
    document: Option<Arc<dyn DocumentQuery>>,
}

impl SessionBuilder {
    /// Settings to use; defaults apply when unset
    pub fn settings(mut self, settings: PortalSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Base URL supplied by the host. `settings.base_url` takes precedence.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn location(mut self, location: Arc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Document to read metadata from; a document without metadata is used when unset
    pub fn document(mut self, document: Arc<dyn DocumentQuery>) -> Self {
        self.document = Some(document);
        self
    }

    /// Build the session
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidConfig`] when no base URL, store or
    /// location was provided
    pub fn build(self) -> PortalResult<Session> {
        let settings = self.settings.unwrap_or_default();
        let base_url = settings.resolve_base_url(self.base_url.as_deref(), None)?;
        let store = self
            .store
            .ok_or_else(|| PortalError::invalid_config("store is required"))?;
        let location = self
            .location
            .ok_or_else(|| PortalError::invalid_config("location is required"))?;
        let document = self
            .document
            .unwrap_or_else(|| Arc::new(StaticDocument::new()));

        Ok(Session {
            paths: PathPolicy::from_routes(&settings.routes),
            credentials: CredentialStore::new(store, settings.storage.clone()),
            base_url,
            settings,
            location,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{MockLocation, StaticLocation};
    use crate::store::MemoryStore;

    const BASE: &str = "https://app.test";

    fn session_with(store: Arc<MemoryStore>, location: Arc<dyn Location>) -> Session {
        Session::builder()
            .base_url(BASE)
            .store(store)
            .location(location)
            .document(Arc::new(StaticDocument::new().with_meta("csrf-token", "tok")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = Session::builder()
            .store(Arc::new(MemoryStore::new()))
            .location(Arc::new(StaticLocation::new("/")))
            .build();
        assert!(matches!(result, Err(PortalError::InvalidConfig { .. })));
    }

    #[test]
    fn test_resolve_url() {
        let session = session_with(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticLocation::new("/")),
        );

        assert_eq!(session.resolve_url("/v1/users"), "https://app.test/v1/users");
        assert_eq!(
            session.resolve_url("http://other.test/x"),
            "http://other.test/x"
        );
        assert_eq!(session.login_url(), "https://app.test/login");
        assert_eq!(session.home_url(), "https://app.test/");
    }

    #[test]
    fn test_logout_clears_and_redirects_once() {
        let store = Arc::new(MemoryStore::with_entries([
            ("accessToken", "a"),
            ("refreshToken", "r"),
            ("theme", "dark"),
        ]));
        let mut location = MockLocation::new();
        location
            .expect_navigate()
            .withf(|url| url == "https://app.test/login")
            .times(1)
            .returning(|_| Ok(()));

        let session = session_with(store.clone(), Arc::new(location));
        session.logout();

        assert_eq!(store.get("accessToken").unwrap(), None);
        assert_eq!(store.get("refreshToken").unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_current_user() {
        let store = Arc::new(MemoryStore::new());
        let session = session_with(store.clone(), Arc::new(StaticLocation::new("/")));
        assert_eq!(session.current_user(), None);

        store.set("accessToken", "x.eyJzdWIiOiJhYmMifQ.y").unwrap();
        let user = session.current_user().unwrap();
        assert_eq!(user.subject(), Some("abc"));

        store.set("accessToken", "not-a-jwt").unwrap();
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_csrf_token_from_document() {
        let session = session_with(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticLocation::new("/")),
        );
        assert_eq!(session.csrf_token().as_deref(), Some("tok"));
    }
}
