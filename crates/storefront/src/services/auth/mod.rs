//! Authentication service.
//!
//! Wraps the auth endpoints and keeps session storage in step with them:
//! a successful login persists `token` and `user`, logout removes both.

mod error;

pub use error::AuthError;

use shopfront_core::{Credentials, PasswordReset, Registration};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::session::{Session, SessionStore};

/// Shown after a successful registration.
pub const REGISTRATION_SUCCESS: &str = "Registration successful";

/// Shown after a successful password reset.
pub const PASSWORD_RESET_SUCCESS: &str = "Password reset successfully";

/// Authentication service.
pub struct AuthService<'a> {
    client: &'a ApiClient,
    store: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: &'a ApiClient, store: &'a SessionStore) -> Self {
        Self { client, store }
    }

    /// Log in and persist the new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank input, `AuthError::Api`
    /// with the server message or "Login failed" when the backend refuses.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if is_blank(&credentials.username) || credentials.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let payload = self
            .client
            .login(credentials)
            .await
            .map_err(|e| AuthError::api(e, "Login failed"))?;
        let session = self.store.persist_login(payload)?;

        info!(admin = session.is_admin(), "Logged in");
        Ok(session)
    }

    /// Create an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank input, `AuthError::Api`
    /// with the server message or "Registration failed" otherwise.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<&'static str, AuthError> {
        if is_blank(&registration.username)
            || is_blank(&registration.email)
            || registration.password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        self.client
            .register(registration)
            .await
            .map_err(|e| AuthError::api(e, "Registration failed"))?;
        Ok(REGISTRATION_SUCCESS)
    }

    /// Reset a password using the recovery answer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank input, `AuthError::Api`
    /// with the server message or "Password reset failed" otherwise.
    #[instrument(skip(self, reset), fields(username = %reset.username))]
    pub async fn forgot_password(&self, reset: &PasswordReset) -> Result<&'static str, AuthError> {
        if is_blank(&reset.username) || is_blank(&reset.help_text) || reset.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        self.client
            .forgot_password(reset)
            .await
            .map_err(|e| AuthError::api(e, "Password reset failed"))?;
        Ok(PASSWORD_RESET_SUCCESS)
    }

    /// Clear stored credentials and return the anonymous session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if storage cannot be written.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<Session, AuthError> {
        let session = self.store.clear()?;
        info!("Logged out");
        Ok(session)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::ClientConfig;
    use crate::session::{MemoryStorage, SessionStorage, keys};

    use super::*;

    fn fixtures() -> (ApiClient, SessionStore) {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "tok").unwrap();
        storage.set(keys::USER, r#"{"_id":"u1","username":"alice"}"#).unwrap();
        (client, SessionStore::new(storage))
    }

    #[tokio::test]
    async fn test_blank_login_is_rejected_locally() {
        let (client, store) = fixtures();
        let auth = AuthService::new(&client, &store);
        let err = auth
            .login(&Credentials {
                username: "  ".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }

    #[tokio::test]
    async fn test_blank_reset_is_rejected_locally() {
        let (client, store) = fixtures();
        let auth = AuthService::new(&client, &store);
        let err = auth
            .forgot_password(&PasswordReset {
                username: "alice".to_string(),
                help_text: String::new(),
                password: "new".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    #[test]
    fn test_logout_clears_session() {
        let (client, store) = fixtures();
        assert!(store.restore().unwrap().is_authenticated());

        let session = AuthService::new(&client, &store).logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!store.restore().unwrap().is_authenticated());
    }

    #[test]
    fn test_api_error_message() {
        let err = AuthError::api(
            crate::api::ApiError::Status {
                status: 401,
                message: "Wrong credentials".to_string(),
            },
            "Login failed",
        );
        assert_eq!(err.to_string(), "Wrong credentials");
    }
}
