//! Gateway configuration

use crate::error::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level Portal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Base origin for relative request paths and redirects.
    /// When unset the host supplies one (the page origin in a browser).
    pub base_url: Option<String>,

    /// Storage key names
    pub storage: StorageKeys,

    /// CSRF metadata and header names
    pub csrf: CsrfSettings,

    /// Navigation targets and path classification
    pub routes: RouteSettings,
}

/// Keys under which credentials are persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
}

/// Where the CSRF value comes from and where it goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfSettings {
    /// `name` attribute of the `<meta>` element carrying the token
    pub meta_name: String,
    /// Outbound request header
    pub header_name: String,
}

/// Redirect targets and path allowlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Appended to the base URL for the unauthenticated redirect
    pub login_path: String,
    /// Appended to the base URL for the already-authenticated redirect
    pub home_path: String,
    /// Substrings marking a page as reachable without a session
    pub public_paths: Vec<String>,
    /// Substrings marking a page the page-load guard skips entirely
    pub guard_exempt_paths: Vec<String>,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            storage: StorageKeys::default(),
            csrf: CsrfSettings::default(),
            routes: RouteSettings::default(),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: "accessToken".to_string(),
            refresh_token: "refreshToken".to_string(),
        }
    }
}

impl Default for CsrfSettings {
    fn default() -> Self {
        Self {
            meta_name: "csrf-token".to_string(),
            header_name: "X-CSRF-TOKEN".to_string(),
        }
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            public_paths: vec![
                "/login".to_string(),
                "/register".to_string(),
                "/forgot-password".to_string(),
            ],
            guard_exempt_paths: vec!["/swagger".to_string()],
        }
    }
}

impl PortalSettings {
    /// Load configuration from a file, overlaid with `PORTAL_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the merged values do not deserialize
    pub fn from_file<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        Self::load(Some(path.as_ref()), Self::environment())
    }

    /// Load configuration from defaults and `PORTAL_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> PortalResult<Self> {
        Self::load(None, Self::environment())
    }

    fn load(file: Option<&Path>, environment: config::Environment) -> PortalResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder.add_source(environment).build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `PORTAL_BASE_URL`, `PORTAL_ROUTES__LOGIN_PATH`, ...
    fn environment() -> config::Environment {
        config::Environment::with_prefix("PORTAL")
            .prefix_separator("_")
            .separator("__")
    }

    /// Pick the base URL for this host.
    ///
    /// Precedence: configured `base_url`, then `injected` (a value the page
    /// embeds, such as `window.APP_URL`), then the page `origin`. Empty values
    /// are skipped and a trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidConfig`] when no candidate is available
    pub fn resolve_base_url(
        &self,
        injected: Option<&str>,
        origin: Option<&str>,
    ) -> PortalResult<String> {
        [self.base_url.as_deref(), injected, origin]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .map(|base| base.trim_end_matches('/').to_string())
            .ok_or_else(|| PortalError::invalid_config("no base URL configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_backend_contract() {
        let settings = PortalSettings::default();
        assert_eq!(settings.storage.access_token, "accessToken");
        assert_eq!(settings.storage.refresh_token, "refreshToken");
        assert_eq!(settings.csrf.meta_name, "csrf-token");
        assert_eq!(settings.csrf.header_name, "X-CSRF-TOKEN");
        assert_eq!(
            settings.routes.public_paths,
            vec!["/login", "/register", "/forgot-password"]
        );
        assert_eq!(settings.routes.guard_exempt_paths, vec!["/swagger"]);
    }

    #[test]
    fn test_resolve_base_url_precedence() {
        let mut settings = PortalSettings::default();

        assert_eq!(
            settings
                .resolve_base_url(Some("https://injected.test/"), Some("https://origin.test"))
                .unwrap(),
            "https://injected.test"
        );
        assert_eq!(
            settings
                .resolve_base_url(Some(""), Some("https://origin.test"))
                .unwrap(),
            "https://origin.test"
        );

        settings.base_url = Some("https://configured.test".to_string());
        assert_eq!(
            settings
                .resolve_base_url(Some("https://injected.test"), Some("https://origin.test"))
                .unwrap(),
            "https://configured.test"
        );
    }

    #[test]
    fn test_resolve_base_url_requires_a_candidate() {
        let result = PortalSettings::default().resolve_base_url(None, None);
        assert!(matches!(result, Err(PortalError::InvalidConfig { .. })));
    }

    fn fixed_environment(vars: &[(&str, &str)]) -> config::Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        PortalSettings::environment().source(Some(vars))
    }

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_fields() {
        let file = settings_file(
            r#"
base_url = "https://app.example.com"

[routes]
login_path = "/signin"
public_paths = ["/signin", "/signup"]
"#,
        );

        let settings = PortalSettings::load(Some(file.path()), fixed_environment(&[])).unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("https://app.example.com"));
        assert_eq!(settings.routes.login_path, "/signin");
        assert_eq!(settings.routes.public_paths, vec!["/signin", "/signup"]);
        assert_eq!(settings.routes.home_path, "/");
        assert_eq!(settings.storage, StorageKeys::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = settings_file(
            r#"
base_url = "https://file.example.com"

[routes]
login_path = "/signin"
"#,
        );

        let settings = PortalSettings::load(
            Some(file.path()),
            fixed_environment(&[
                ("PORTAL_BASE_URL", "https://env.example.com"),
                ("PORTAL_CSRF__HEADER_NAME", "X-XSRF-TOKEN"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(settings.csrf.header_name, "X-XSRF-TOKEN");
        assert_eq!(settings.routes.login_path, "/signin");
    }

    #[test]
    fn test_environment_alone_layers_over_defaults() {
        let settings = PortalSettings::load(
            None,
            fixed_environment(&[
                ("PORTAL_ROUTES__LOGIN_PATH", "/auth/login"),
                ("PORTAL_STORAGE__ACCESS_TOKEN", "portalAccess"),
                ("UNRELATED_BASE_URL", "https://ignored.example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.base_url, None);
        assert_eq!(settings.routes.login_path, "/auth/login");
        assert_eq!(settings.routes.home_path, "/");
        assert_eq!(settings.storage.access_token, "portalAccess");
        assert_eq!(settings.storage.refresh_token, "refreshToken");
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let settings = PortalSettings::load(None, fixed_environment(&[])).unwrap();
        assert_eq!(settings, PortalSettings::default());
    }
}
