//! Session-aware request gateway

pub mod auth;
pub mod error;
pub mod options;
pub mod users;

pub use error::ClientError;
pub use options::RequestOptions;

use portal_core::{
    PortalResult, RequestDecorator, ResponseAction, Session, SessionExpiryPolicy, TokenBundle,
    UserClaims,
};
use reqwest::{Client, ClientBuilder, Response};
use std::sync::Arc;

/// Issues API requests on behalf of the signed-in user.
///
/// Every request carries JSON content negotiation headers, the page CSRF
/// token and, when stored, the bearer access token. A 401 received outside
/// the public pages logs the user out before the response is returned.
#[derive(Clone)]
pub struct RequestGateway {
    client: Client,
    session: Arc<Session>,
    decorator: RequestDecorator,
    policy: SessionExpiryPolicy,
}

impl RequestGateway {
    /// Create a gateway with a default HTTP client
    pub fn new(session: Arc<Session>) -> Result<Self, ClientError> {
        Self::builder().session(session).build()
    }

    /// Create a new gateway builder
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Build the outgoing request without sending it.
    ///
    /// Reads the CSRF token and access token at call time.
    pub fn prepare(&self, path: &str, options: RequestOptions) -> reqwest::RequestBuilder {
        let url = self.session.resolve_url(path);
        let csrf = self.session.csrf_token();
        let token = self.session.access_token();
        let headers = self
            .decorator
            .decorate(csrf.as_deref(), token.as_deref(), &options.headers);

        let mut request = self.client.request(options.method, url).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }
        request
    }

    /// Decide what a response means for the session. Does not act on it.
    pub fn intercept(&self, response: &Response) -> ResponseAction {
        self.policy
            .evaluate(response.status(), &self.session.current_path())
    }

    /// Send a request and return the raw response.
    ///
    /// A session-expired response triggers [`Session::logout`] first; the
    /// response is still returned so callers can react to it. Transport
    /// failures are returned as [`ClientError::Request`]. No retries.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let method = options.method.clone();
        let response = self.prepare(path, options).send().await?;
        tracing::debug!(%method, path, status = %response.status(), "API response");

        if self.intercept(&response) == ResponseAction::Logout {
            tracing::warn!(path, "Session expired");
            self.session.logout();
        }

        Ok(response)
    }

    /// Send a request and decode a JSON success body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.checked(path, options).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose success response carries no body we need
    pub async fn execute_empty(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<(), ClientError> {
        self.checked(path, options).await.map(drop)
    }

    async fn checked(&self, path: &str, options: RequestOptions) -> Result<Response, ClientError> {
        let response = self.request(path, options).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_body(status, &body))
        }
    }

    /// Persist the tokens present in `bundle`
    pub fn save_credentials(&self, bundle: &TokenBundle) -> PortalResult<()> {
        self.session.save_credentials(bundle)
    }

    /// Clear credentials and navigate to the login page
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Claims of the stored access token, if decodable
    pub fn current_user(&self) -> Option<UserClaims> {
        self.session.current_user()
    }
}

/// Builder for RequestGateway
#[derive(Default)]
pub struct GatewayBuilder {
    session: Option<Arc<Session>>,
    client: Option<Client>,
    user_agent: Option<String>,
}

impl GatewayBuilder {
    /// Set the session the gateway reads credentials from
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Use a preconfigured HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the user agent (ignored in the browser, which sends its own)
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the gateway
    pub fn build(self) -> Result<RequestGateway, ClientError> {
        let session = self
            .session
            .ok_or_else(|| ClientError::Configuration("session is required".into()))?;

        let client = match self.client {
            Some(client) => client,
            None => build_client(self.user_agent)?,
        };

        let settings = session.settings();
        Ok(RequestGateway {
            decorator: RequestDecorator::from_settings(&settings.csrf),
            policy: SessionExpiryPolicy::new(session.paths().clone()),
            client,
            session,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(user_agent: Option<String>) -> Result<Client, ClientError> {
    let user_agent = user_agent.unwrap_or_else(|| "portal-http/0.1.0".to_string());
    Ok(ClientBuilder::new().user_agent(user_agent).build()?)
}

#[cfg(target_arch = "wasm32")]
fn build_client(user_agent: Option<String>) -> Result<Client, ClientError> {
    let _ = user_agent; // The browser controls User-Agent
    Ok(ClientBuilder::new().build()?)
}
