//! Login, registration and password reset screens.
//!
//! Each screen owns its form fields and the message shown under the form.
//! Submission goes through [`AuthService`], which keeps session storage in
//! step with the backend.

use shopfront_core::{Credentials, PasswordReset, Registration};
use tracing::instrument;

use crate::services::auth::AuthService;
use crate::session::Session;

/// Inline outcome of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Username/password login.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: String,
    pub password: String,
    notice: Option<Notice>,
}

impl LoginScreen {
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Submit the form. Returns the new session on success.
    #[instrument(skip(self, auth), fields(username = %self.username))]
    pub async fn submit(&mut self, auth: &AuthService<'_>) -> Option<Session> {
        let credentials = Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        match auth.login(&credentials).await {
            Ok(session) => {
                self.notice = None;
                self.password.clear();
                Some(session)
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                None
            }
        }
    }
}

/// Account registration.
#[derive(Debug, Default)]
pub struct RegisterScreen {
    pub username: String,
    pub email: String,
    pub password: String,
    notice: Option<Notice>,
}

impl RegisterScreen {
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Submit the form. Returns whether the account was created.
    #[instrument(skip(self, auth), fields(username = %self.username))]
    pub async fn submit(&mut self, auth: &AuthService<'_>) -> bool {
        let registration = Registration {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let (notice, ok) = match auth.register(&registration).await {
            Ok(message) => (Notice::Success(message.to_string()), true),
            Err(e) => (Notice::Error(e.to_string()), false),
        };
        self.notice = Some(notice);
        ok
    }
}

/// Password reset using the recovery answer.
#[derive(Debug, Default)]
pub struct ForgotPasswordScreen {
    pub username: String,
    pub help_text: String,
    pub new_password: String,
    notice: Option<Notice>,
}

impl ForgotPasswordScreen {
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Submit the form. Returns whether the password was reset.
    #[instrument(skip(self, auth), fields(username = %self.username))]
    pub async fn submit(&mut self, auth: &AuthService<'_>) -> bool {
        let reset = PasswordReset {
            username: self.username.trim().to_string(),
            help_text: self.help_text.clone(),
            password: self.new_password.clone(),
        };
        let (notice, ok) = match auth.forgot_password(&reset).await {
            Ok(message) => (Notice::Success(message.to_string()), true),
            Err(e) => (Notice::Error(e.to_string()), false),
        };
        self.notice = Some(notice);
        ok
    }
}
