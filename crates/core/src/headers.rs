//! Outbound request decoration

use crate::settings::CsrfSettings;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::HeaderMap;

/// Builds the header set every API call carries.
///
/// Pure: the CSRF value and access token are passed in, nothing is read
/// from the page or storage here.
#[derive(Debug, Clone)]
pub struct RequestDecorator {
    csrf_header: HeaderName,
}

impl RequestDecorator {
    pub fn new(csrf_header: HeaderName) -> Self {
        Self { csrf_header }
    }

    /// Falls back to `X-CSRF-TOKEN` when the configured name is not a valid header name
    pub fn from_settings(csrf: &CsrfSettings) -> Self {
        let csrf_header = HeaderName::try_from(csrf.header_name.as_str()).unwrap_or_else(|e| {
            tracing::warn!(header = %csrf.header_name, error = %e, "Invalid CSRF header name");
            HeaderName::from_static("x-csrf-token")
        });
        Self::new(csrf_header)
    }

    pub fn csrf_header(&self) -> &HeaderName {
        &self.csrf_header
    }

    /// Merge the fixed headers with `caller` headers.
    ///
    /// Order of precedence, lowest first:
    /// 1. `Content-Type` / `Accept` set to `application/json`, and the CSRF
    ///    header (empty when the page carries no token)
    /// 2. caller headers, replacing any of the above
    /// 3. `Authorization: Bearer <token>` when a token is stored. A caller
    ///    `Authorization` survives only when there is no stored token.
    pub fn decorate(
        &self,
        csrf_token: Option<&str>,
        access_token: Option<&str>,
        caller: &HeaderMap,
    ) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(caller.len() + 4);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(self.csrf_header.clone(), header_value(csrf_token.unwrap_or("")));

        for name in caller.keys() {
            headers.remove(name);
        }
        for (name, value) in caller {
            headers.append(name.clone(), value.clone());
        }

        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            match HeaderValue::try_from(format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => tracing::warn!(error = %e, "Stored access token is not a valid header value"),
            }
        }

        tracing::debug!(
            header_count = headers.len(),
            authorized = headers.contains_key(AUTHORIZATION),
            "Decorated request headers"
        );
        headers
    }
}

impl Default for RequestDecorator {
    fn default() -> Self {
        Self::from_settings(&CsrfSettings::default())
    }
}

/// Header value from page-supplied text; invalid bytes degrade to empty
fn header_value(text: &str) -> HeaderValue {
    HeaderValue::try_from(text).unwrap_or_else(|_| HeaderValue::from_static(""))
}
