//! Screen state shared by every list-backed view.
//!
//! A screen starts in [`LoadState::Loading`] and settles in `Ready` or
//! `Error`; retrying re-enters `Loading`. Once `Ready`, mutations never leave
//! it: a failed mutation only sets the inline banner.
//!
//! After a successful mutation the list is either patched in place or
//! re-fetched, as fixed per operation by [`Mutation::policy`].

use shopfront_core::Record;
use tracing::{debug, warn};

use crate::api::ApiError;

/// Load lifecycle of a screen's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Error(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// Settle a load, turning a failure into its display message.
    pub fn from_result(result: Result<T, ApiError>, fallback: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                warn!(error = %e, "Load failed");
                Self::Error(e.user_message(fallback))
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub const fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// How a list learns about a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPolicy {
    /// Splice the server-returned record into the list by id.
    Patch,
    /// Discard the list and fetch it again.
    Refetch,
}

/// Mutations issued from list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    UserEdit,
    UserDelete,
    OrderStatus,
    ProductActivate,
    ProductDeactivate,
    ProductDelete,
}

impl Mutation {
    /// Refresh policy for this operation.
    #[must_use]
    pub const fn policy(self) -> MutationPolicy {
        match self {
            Self::UserEdit => MutationPolicy::Patch,
            Self::UserDelete
            | Self::OrderStatus
            | Self::ProductActivate
            | Self::ProductDeactivate
            | Self::ProductDelete => MutationPolicy::Refetch,
        }
    }

    /// Banner text when the backend gave no message.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::UserEdit => "Failed to update user",
            Self::UserDelete => "Failed to delete user",
            Self::OrderStatus => "Failed to update order status",
            Self::ProductActivate | Self::ProductDeactivate => "Failed to update product status",
            Self::ProductDelete => "Failed to delete product",
        }
    }
}

/// What a successful mutation returned.
#[derive(Debug, Clone)]
pub enum Applied<T: Record> {
    /// The changed record.
    Record(T),
    /// The id of a removed record.
    Removed(T::Id),
    /// Nothing usable for a local patch.
    Done,
}

/// A list of records plus its inline error banner.
#[derive(Debug, Clone)]
pub struct ListScreen<T: Record> {
    state: LoadState<Vec<T>>,
    banner: Option<String>,
    load_fallback: &'static str,
}

impl<T: Record> ListScreen<T> {
    /// A list that is loading; `load_fallback` is shown if loading fails
    /// without a server message.
    #[must_use]
    pub const fn new(load_fallback: &'static str) -> Self {
        Self {
            state: LoadState::Loading,
            banner: None,
            load_fallback,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Vec<T>> {
        &self.state
    }

    /// Loaded records, empty unless `Ready`.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.state.ready().map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Find a loaded record by id.
    #[must_use]
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items().iter().find(|record| record.id() == id)
    }

    /// Enter `Loading`, as on first show or retry.
    pub fn start_loading(&mut self) {
        self.state = LoadState::Loading;
        self.banner = None;
    }

    /// Settle the initial load (or a retry).
    pub fn finish_load(&mut self, result: Result<Vec<T>, ApiError>) {
        self.state = LoadState::from_result(result, self.load_fallback);
    }

    /// Replace the list after a post-mutation refetch.
    ///
    /// A failed refetch keeps the current list and shows the error in the
    /// banner so the screen stays usable.
    pub fn finish_refetch(&mut self, result: Result<Vec<T>, ApiError>) {
        match result {
            Ok(items) => self.state = LoadState::Ready(items),
            Err(e) => {
                warn!(error = %e, "Refetch failed");
                self.banner = Some(e.user_message(self.load_fallback));
            }
        }
    }

    /// Replace the record with the same id, keeping its position.
    ///
    /// Returns `false` if no loaded record has that id.
    pub fn patch(&mut self, record: T) -> bool {
        let Some(items) = self.state.ready_mut() else {
            return false;
        };
        match items.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the record with this id. Returns whether one was removed.
    pub fn remove(&mut self, id: &T::Id) -> bool {
        let Some(items) = self.state.ready_mut() else {
            return false;
        };
        let before = items.len();
        items.retain(|record| record.id() != id);
        items.len() != before
    }

    /// Apply a mutation's outcome according to its policy.
    ///
    /// Returns `true` when the caller must refetch the list. On failure the
    /// list is untouched and the banner carries the error.
    pub fn settle(&mut self, mutation: Mutation, result: Result<Applied<T>, ApiError>) -> bool {
        let applied = match result {
            Ok(applied) => applied,
            Err(e) => {
                warn!(?mutation, error = %e, "Mutation failed");
                self.banner = Some(e.user_message(mutation.failure_message()));
                return false;
            }
        };

        self.banner = None;
        debug!(?mutation, policy = ?mutation.policy(), "Mutation succeeded");
        match (mutation.policy(), applied) {
            (MutationPolicy::Refetch, _) | (MutationPolicy::Patch, Applied::Done) => true,
            (MutationPolicy::Patch, Applied::Record(record)) => !self.patch(record),
            (MutationPolicy::Patch, Applied::Removed(id)) => !self.remove(&id),
        }
    }
}
