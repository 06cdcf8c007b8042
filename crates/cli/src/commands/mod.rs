//! Command implementations.
//!
//! Each command builds the screen it drives, runs one action, and prints the
//! resulting view. Screens report failures through their load state or
//! banner; commands turn those into [`CliError::Failed`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod products;

use shopfront_core::CurrencyCode;
use shopfront_storefront::access::{AccessDenied, AdminAccess};
use shopfront_storefront::api::{ApiClient, ApiError};
use shopfront_storefront::config::{ClientConfig, ConfigError};
use shopfront_storefront::screen::LoadState;
use shopfront_storefront::screens::{CheckoutError, FormError};
use shopfront_storefront::services::auth::AuthError;
use shopfront_storefront::session::{FileStorage, Session, SessionError, SessionStore};
use thiserror::Error;

/// Errors that end a command with exit code 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// A screen reported an error message.
    #[error("{0}")]
    Failed(String),
}

/// Everything a command needs: configuration, the base client and the
/// session restored from storage.
pub struct Context {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub store: SessionStore,
    pub session: Session,
}

impl Context {
    /// Build the client and restore the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or storage is
    /// unreadable.
    pub fn new(config: ClientConfig) -> Result<Self, CliError> {
        let client = ApiClient::new(&config)?;
        let store = SessionStore::new(FileStorage::new(&config.session_file));
        let session = store.restore()?;
        tracing::debug!(
            authenticated = session.is_authenticated(),
            admin = session.is_admin(),
            "Session restored"
        );
        Ok(Self {
            config,
            client,
            store,
            session,
        })
    }

    pub const fn currency(&self) -> CurrencyCode {
        self.config.currency
    }

    /// Admin capability of the current session.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for anonymous and shopper sessions.
    pub fn admin_access(&self) -> Result<AdminAccess, CliError> {
        Ok(self.session.capabilities().admin_access()?)
    }
}

/// Fail if a screen's load ended in an error.
pub fn loaded<T>(state: &LoadState<T>) -> Result<&T, CliError> {
    match state {
        LoadState::Ready(value) => Ok(value),
        LoadState::Error(message) => Err(CliError::Failed(message.clone())),
        LoadState::Loading => Err(CliError::Failed("Still loading".to_string())),
    }
}

/// Fail if a screen's last action left an error banner.
pub fn no_banner(banner: Option<&str>) -> Result<(), CliError> {
    banner.map_or(Ok(()), |message| Err(CliError::Failed(message.to_string())))
}
