//! Cart endpoints.

use serde::Serialize;
use serde_json::Value;
use shopfront_core::{Cart, CartItem, ProductId, UserId};
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody<'a> {
    user_id: &'a UserId,
    products: [CartItem; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCartBody<'a> {
    product_id: &'a ProductId,
    quantity: u32,
}

impl ApiClient {
    /// `GET /cart/getCartitem/:userId`.
    ///
    /// `data` may be an array whose first element is the cart, or the cart
    /// may sit under a `cart` field. Anything else means no cart yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the cart is malformed.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: &UserId) -> Result<Option<Cart>, ApiError> {
        let body: Value = self
            .get(&format!("/cart/getCartitem/{}", user_id.as_str()))
            .await?;
        cart_from_body(body)
    }

    /// `POST /cart/addCartItem` with `{userId, products: [{productId, quantity}]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let body = AddToCartBody {
            user_id,
            products: [CartItem::new(product_id.clone(), quantity)],
        };
        let response: ApiResponse<Value> = self.post("/cart/addCartItem", &body).await?;
        response.require_success("Failed to add to cart")?;
        Ok(())
    }

    /// `PUT /cart/updateCart/:userId` with `{productId, quantity}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let body = UpdateCartBody {
            product_id,
            quantity,
        };
        let response: ApiResponse<Value> = self
            .put(&format!("/cart/updateCart/{}", user_id.as_str()), &body)
            .await?;
        response.reject_failure("Failed to update cart")?;
        Ok(())
    }

    /// `DELETE /cart/deleteCartItem/:productId?userId=`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports failure.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self
            .delete(
                &format!("/cart/deleteCartItem/{}", product_id.as_str()),
                &[("userId", user_id.as_str().to_string())],
            )
            .await?;
        response.reject_failure("Failed to remove item")?;
        Ok(())
    }
}

fn cart_from_body(body: Value) -> Result<Option<Cart>, ApiError> {
    let Value::Object(mut fields) = body else {
        return Ok(None);
    };

    let cart = match fields.remove("data") {
        Some(Value::Array(mut carts)) if !carts.is_empty() => Some(carts.swap_remove(0)),
        _ => fields.remove("cart").filter(Value::is_object),
    };

    cart.map(|value| {
        serde_json::from_value(value).map_err(|e| ApiError::Parse(format!("invalid cart: {e}")))
    })
    .transpose()
}
