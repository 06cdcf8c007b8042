//! User management: list, edit and delete accounts.

use shopfront_core::{BadgeColor, User, UserId, UserUpdate};
use shopfront_storefront::access::AdminAccess;
use shopfront_storefront::api::{ApiClient, ApiError};
use shopfront_storefront::screen::{Applied, ListScreen, Mutation};
use shopfront_storefront::session::Session;
use tracing::{info, instrument};

use crate::filters::{Badge, date};

/// One user in a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Badge,
    pub joined: String,
}

impl UserRowView {
    #[must_use]
    pub fn new(user: &User) -> Self {
        let color = if user.is_admin {
            BadgeColor::Primary
        } else {
            BadgeColor::Default
        };
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: Badge::new(user.role_label(), color),
            joined: date(user.created_at.as_ref()),
        }
    }
}

/// The admin user table.
#[derive(Debug)]
pub struct UsersScreen {
    client: ApiClient,
    list: ListScreen<User>,
}

impl UsersScreen {
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, _access: AdminAccess) -> Self {
        Self {
            client: session.client(client),
            list: ListScreen::new("Failed to fetch users"),
        }
    }

    #[must_use]
    pub const fn list(&self) -> &ListScreen<User> {
        &self.list
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.list.start_loading();
        let result = self.client.list_users().await;
        self.list.finish_load(result);
    }

    async fn refetch(&mut self) {
        let result = self.client.list_users().await;
        self.list.finish_refetch(result);
    }

    /// Edit form prefilled from a loaded user.
    #[must_use]
    pub fn edit_form(&self, id: &UserId) -> Option<UserUpdate> {
        self.list.find(id).map(UserUpdate::from)
    }

    /// Save an edit. The returned record replaces the old one in place.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn edit(&mut self, id: &UserId, update: &UserUpdate) {
        let result = self
            .client
            .update_user(id, update)
            .await
            .map(Applied::Record);
        if result.is_ok() {
            info!("User updated");
        }
        if self.list.settle(Mutation::UserEdit, result) {
            self.refetch().await;
        }
    }

    /// Delete a user, then refetch the table.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&mut self, id: &UserId) {
        let result = self
            .client
            .delete_user(id)
            .await
            .map(|()| Applied::Removed(id.clone()));
        if result.is_ok() {
            info!("User deleted");
        }
        if self.list.settle(Mutation::UserDelete, result) {
            self.refetch().await;
        }
    }

    /// Fetch a single user from the backend, whether or not it is listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn fetch_user(&self, id: &UserId) -> Result<UserRowView, ApiError> {
        let user = self.client.get_user(id).await?;
        Ok(UserRowView::new(&user))
    }

    /// Table rows, in list order.
    #[must_use]
    pub fn rows(&self) -> Vec<UserRowView> {
        self.list.items().iter().map(UserRowView::new).collect()
    }
}
