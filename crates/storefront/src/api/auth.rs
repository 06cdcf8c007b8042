//! Authentication endpoints.

use secrecy::SecretString;
use serde_json::Value;
use shopfront_core::{Credentials, PasswordReset, Registration, User};
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

/// Successful login: the bearer token plus the signed-in user.
pub struct LoginPayload {
    pub token: SecretString,
    pub user: User,
}

impl std::fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl ApiClient {
    /// `POST /auth/login`.
    ///
    /// The payload is the user record with an extra `accessToken` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload has no token.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginPayload, ApiError> {
        let response: ApiResponse<Value> = self.post("/auth/login", credentials).await?;
        let data = response.reject_failure("Login failed")?.data;

        let Some(Value::Object(mut fields)) = data else {
            return Err(ApiError::Parse("login response has no data".to_string()));
        };
        let token = match fields.remove("accessToken") {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => return Err(ApiError::Parse("login response has no accessToken".to_string())),
        };
        let user: User = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ApiError::Parse(format!("invalid user in login response: {e}")))?;

        Ok(LoginPayload {
            token: SecretString::from(token),
            user,
        })
    }

    /// `POST /auth/register`. Any 2xx response counts as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self.post("/auth/register", registration).await?;
        response.reject_failure("Registration failed")?;
        Ok(())
    }

    /// `POST /auth/forgotPassword`. Requires `success: true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reset is refused.
    #[instrument(skip(self, reset), fields(username = %reset.username))]
    pub async fn forgot_password(&self, reset: &PasswordReset) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self.post("/auth/forgotPassword", reset).await?;
        response.require_success("Password reset failed")?;
        Ok(())
    }
}
