//! Order placement.

use serde_json::Value;
use shopfront_core::{NewOrder, Order};
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

impl ApiClient {
    /// `POST /order/createOrder` with `{userId, products, amount, address}`.
    ///
    /// Any 2xx response counts as placed; the created order is returned when
    /// the backend echoes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, items = order.products.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Option<Order>, ApiError> {
        let response: ApiResponse<Value> = self.post("/order/createOrder", order).await?;
        let data = response.reject_failure("Failed to place order")?.data;
        Ok(data.and_then(|value| serde_json::from_value(value).ok()))
    }
}
