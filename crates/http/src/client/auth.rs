//! Authentication API client methods

use super::{ClientError, RequestGateway, RequestOptions};
use crate::types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};

impl RequestGateway {
    /// Sign in and store the issued tokens
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let response: AuthResponse = self
            .execute("/v1/auth/login", RequestOptions::post().json(&body)?)
            .await?;

        self.save_credentials(&response.tokens)?;
        tracing::info!(user_id = %response.user.id, "Signed in");
        Ok(response)
    }

    /// Create an account and store the issued tokens
    pub async fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        };
        let response: AuthResponse = self
            .execute("/v1/auth/register", RequestOptions::post().json(&body)?)
            .await?;

        self.save_credentials(&response.tokens)?;
        tracing::info!(user_id = %response.user.id, "Registered");
        Ok(response)
    }

    /// Ask the server to email a password reset link
    pub async fn forgot_password(&self, email: impl Into<String>) -> Result<(), ClientError> {
        let body = ForgotPasswordRequest {
            email: email.into(),
        };
        self.execute_empty(
            "/v1/auth/forgot-password",
            RequestOptions::post().json(&body)?,
        )
        .await
    }

    /// Set a new password using the token from the reset link
    pub async fn reset_password(
        &self,
        token: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), ClientError> {
        let body = ResetPasswordRequest {
            password: password.into(),
        };
        self.execute_empty(
            "/v1/auth/reset-password",
            RequestOptions::post().query("token", token).json(&body)?,
        )
        .await
    }
}
