//! Persisted authentication state.
//!
//! The session is two keys in a key/value store: the bearer `token` and the
//! JSON-serialized `user`. It is read once at startup into a [`Session`]
//! value. Login and logout write the store and hand back a fresh `Session`;
//! nothing else mutates it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use shopfront_core::User;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::access::Capabilities;
use crate::api::{ApiClient, LoginPayload};

/// Storage keys for authentication data.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the JSON-serialized signed-in user.
    pub const USER: &str = "user";
}

/// Errors that can occur while reading or writing session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session storage lock poisoned")]
    Poisoned,
}

/// String key/value storage that outlives the process.
pub trait SessionStorage: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a key. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Session storage in a JSON object file.
///
/// A missing file reads as empty storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// The authentication state of one client run.
///
/// Signed in only when both the token and the user are present.
/// Capabilities are computed when the value is built.
#[derive(Default)]
pub struct Session {
    auth: Option<(SecretString, User)>,
    capabilities: Capabilities,
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session.
    #[must_use]
    pub fn authenticated(token: SecretString, user: User) -> Self {
        let capabilities = Capabilities::for_user(Some(&user));
        Self {
            auth: Some((token, user)),
            capabilities,
        }
    }

    /// Bearer token, when signed in.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.auth.as_ref().map(|(token, _)| token)
    }

    /// Signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|(_, user)| user)
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.capabilities.is_authenticated
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.capabilities.is_admin
    }

    /// A client that authenticates as this session.
    #[must_use]
    pub fn client(&self, base: &ApiClient) -> ApiClient {
        base.with_token(self.token())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .field("user", &self.user())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Reads and writes the session keys.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Restore the session saved by a previous run.
    ///
    /// A stored user that is not valid JSON clears both keys and yields the
    /// anonymous session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage itself cannot be read or cleared.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Result<Session, SessionError> {
        let token = self.storage.get(keys::TOKEN)?.filter(|t| !t.is_empty());
        let user_json = self.storage.get(keys::USER)?;

        let (Some(token), Some(user_json)) = (token, user_json) else {
            debug!("No stored session");
            return Ok(Session::anonymous());
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => {
                debug!(user_id = %user.id, "Restored session");
                Ok(Session::authenticated(SecretString::from(token), user))
            }
            Err(e) => {
                warn!(error = %e, "Stored user is corrupt, clearing session");
                self.clear()
            }
        }
    }

    /// Persist a successful login and return the new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    #[instrument(skip(self, payload), fields(user_id = %payload.user.id))]
    pub fn persist_login(&self, payload: LoginPayload) -> Result<Session, SessionError> {
        let user_json = serde_json::to_string(&payload.user)?;
        self.storage.set(keys::TOKEN, payload.token.expose_secret())?;
        self.storage.set(keys::USER, &user_json)?;
        Ok(Session::authenticated(payload.token, payload.user))
    }

    /// Remove both keys and return the anonymous session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<Session, SessionError> {
        self.storage.remove(keys::TOKEN)?;
        self.storage.remove(keys::USER)?;
        Ok(Session::anonymous())
    }
}
