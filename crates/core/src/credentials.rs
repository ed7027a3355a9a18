//! Persisted access and refresh tokens

use crate::error::PortalResult;
use crate::settings::StorageKeys;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single issued token as returned by the auth endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Expiry as reported by the server; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

/// The `tokens` object of a login or register response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<TokenEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<TokenEntry>,
}

impl TokenEntry {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            expires: None,
        }
    }
}

impl TokenBundle {
    /// Bundle carrying only an access token
    pub fn access(token: impl Into<String>) -> Self {
        Self {
            access: Some(TokenEntry::new(token)),
            refresh: None,
        }
    }

    /// Bundle carrying only a refresh token
    pub fn refresh(token: impl Into<String>) -> Self {
        Self {
            access: None,
            refresh: Some(TokenEntry::new(token)),
        }
    }

    pub fn with_refresh(mut self, token: impl Into<String>) -> Self {
        self.refresh = Some(TokenEntry::new(token));
        self
    }

    fn access_token(&self) -> Option<&str> {
        present(self.access.as_ref())
    }

    fn refresh_token(&self) -> Option<&str> {
        present(self.refresh.as_ref())
    }
}

// Empty strings count as absent, same as a missing field.
fn present(entry: Option<&TokenEntry>) -> Option<&str> {
    entry
        .and_then(|e| e.token.as_deref())
        .filter(|t| !t.is_empty())
}

/// Typed view over the credential keys of a [`KeyValueStore`]
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// The stored access token, if any
    pub fn access_token(&self) -> PortalResult<Option<String>> {
        Ok(self
            .store
            .get(&self.keys.access_token)?
            .filter(|t| !t.is_empty()))
    }

    /// Whether a session exists, i.e. an access token is stored.
    ///
    /// A store that cannot be read counts as signed out.
    pub fn has_session(&self) -> bool {
        match self.access_token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read access token");
                false
            }
        }
    }

    /// Persist whichever tokens `bundle` carries; other keys are left alone
    pub fn save(&self, bundle: &TokenBundle) -> PortalResult<()> {
        if let Some(token) = bundle.access_token() {
            self.store.set(&self.keys.access_token, token)?;
            tracing::debug!("Stored access token");
        }
        if let Some(token) = bundle.refresh_token() {
            self.store.set(&self.keys.refresh_token, token)?;
            tracing::debug!("Stored refresh token");
        }
        Ok(())
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    pub fn clear(&self) -> PortalResult<()> {
        let access = self.store.remove(&self.keys.access_token);
        let refresh = self.store.remove(&self.keys.refresh_token);
        access.and(refresh)
    }
}
