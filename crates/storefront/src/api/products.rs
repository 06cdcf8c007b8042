//! Product catalog endpoints.

use serde::Serialize;
use serde_json::Value;
use shopfront_core::{Product, ProductId, ProductInput};
use tracing::instrument;

use super::{ApiClient, ApiError, ApiResponse};

/// Filters for `GET /products/getAllProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only products in this category.
    pub category: Option<String>,
    /// Newest products first.
    pub newest: bool,
}

impl ProductQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if self.newest {
            pairs.push(("new", "true".to_string()));
        }
        pairs
    }
}

#[derive(Serialize)]
struct StatusBody {
    active: bool,
}

impl ApiClient {
    /// `GET /products/getAllProducts[?query]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let response: ApiResponse<Vec<Product>> = self
            .get_with_query("/products/getAllProducts", &query.to_pairs())
            .await?;
        response.into_data("Failed to load products")
    }

    /// `GET /products/getProduct/:id`.
    ///
    /// The product may arrive under `data`, under `product`, or as the whole
    /// body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend reports failure, or
    /// no product can be found in the body.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let body: Value = self
            .get(&format!("/products/getProduct/{}", id.as_str()))
            .await?;
        product_from_body(body)
    }

    /// `POST /products/addProducts`.
    ///
    /// Succeeds when the body says `success: true` or echoes the new
    /// record's `_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product was not created.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn add_product(&self, input: &ProductInput) -> Result<Option<Product>, ApiError> {
        let body: Value = self.post("/products/addProducts", input).await?;
        let created = body.get("success").and_then(Value::as_bool) == Some(true)
            || body.get("_id").is_some();
        if !created {
            return Err(ApiError::Rejected(
                message_of(&body).unwrap_or_else(|| "Failed to add product".to_string()),
            ));
        }
        Ok(product_from_body(body).ok())
    }

    /// `PUT /products/editProduct/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, ApiError> {
        let response: ApiResponse<Value> = self
            .put(&format!("/products/editProduct/{}", id.as_str()), input)
            .await?;
        let data = response.require_success("Failed to update product")?.data;
        Ok(data.and_then(|value| serde_json::from_value(value).ok()))
    }

    /// `PUT /products/updateProductStatus/:id` with `{active}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_status(&self, id: &ProductId, active: bool) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self
            .put(
                &format!("/products/updateProductStatus/{}", id.as_str()),
                &StatusBody { active },
            )
            .await?;
        response.require_success("Failed to update product status")?;
        Ok(())
    }

    /// `DELETE /products/deleteProduct/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `success` is not true.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let response: ApiResponse<Value> = self
            .delete(&format!("/products/deleteProduct/{}", id.as_str()), &[])
            .await?;
        response.require_success("Failed to delete product")?;
        Ok(())
    }
}

/// Pick the product out of a lenient response body.
fn product_from_body(body: Value) -> Result<Product, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected(
            message_of(&body).unwrap_or_else(|| "Failed to load product".to_string()),
        ));
    }

    let candidate = match body {
        Value::Object(mut fields) => match (fields.remove("product"), fields.remove("data")) {
            (Some(product @ Value::Object(_)), _) | (_, Some(product @ Value::Object(_))) => {
                product
            }
            _ => Value::Object(fields),
        },
        other => other,
    };

    serde_json::from_value(candidate)
        .map_err(|e| ApiError::Parse(format!("invalid product: {e}")))
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}
