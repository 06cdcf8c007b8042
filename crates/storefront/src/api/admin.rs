//! Admin console endpoints.
//!
//! The backend rejects these for non-admin tokens; the client does not
//! re-check.

use serde::Serialize;
use serde_json::Value;
use shopfront_core::{
    AdminOrder, DashboardStats, OrderId, OrderStatus, ProductStats, User, UserId, UserUpdate,
};
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

impl ApiClient {
    /// `GET /admin/dashboard`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let response: ApiResponse<DashboardStats> = self.get("/admin/dashboard").await?;
        response.into_data("Failed to fetch dashboard statistics")
    }

    /// `GET /admin/users`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response: ApiResponse<Vec<User>> = self.get("/admin/users").await?;
        response.into_data("Failed to fetch users")
    }

    /// `GET /admin/users/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        let response: ApiResponse<User> =
            self.get(&format!("/admin/users/{}", id.as_str())).await?;
        response.into_data("Failed to fetch user")
    }

    /// `PUT /admin/users/:id`. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let response: ApiResponse<User> = self
            .put(&format!("/admin/users/{}", id.as_str()), update)
            .await?;
        response.into_data("Failed to update user")
    }

    /// `DELETE /admin/users/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self
            .delete(&format!("/admin/users/{}", id.as_str()), &[])
            .await?;
        response.require_success("Failed to delete user")?;
        Ok(())
    }

    /// `GET /admin/orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<AdminOrder>, ApiError> {
        let response: ApiResponse<Vec<AdminOrder>> = self.get("/admin/orders").await?;
        response.into_data("Failed to fetch orders")
    }

    /// `GET /admin/orders/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<AdminOrder, ApiError> {
        let response: ApiResponse<AdminOrder> =
            self.get(&format!("/admin/orders/{}", id.as_str())).await?;
        response.into_data("Failed to fetch order")
    }

    /// `PUT /admin/orders/:id/status` with `{status}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self
            .put(
                &format!("/admin/orders/{}/status", id.as_str()),
                &StatusBody { status },
            )
            .await?;
        response.require_success("Failed to update order status")?;
        Ok(())
    }

    /// `GET /admin/products/stats`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self))]
    pub async fn product_stats(&self) -> Result<ProductStats, ApiError> {
        let response: ApiResponse<ProductStats> = self.get("/admin/products/stats").await?;
        response.into_data("Failed to fetch product statistics")
    }
}
