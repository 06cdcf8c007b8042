//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field is blank. No request was sent.
    #[error("Please fill in all fields")]
    MissingFields,

    /// The backend refused the request or could not be reached.
    ///
    /// `message` is the server message or the operation's fallback text.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Session storage could not be written.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub(crate) fn api(source: ApiError, fallback: &str) -> Self {
        Self::Api {
            message: source.user_message(fallback),
            source,
        }
    }
}
