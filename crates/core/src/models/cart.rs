//! Server-persisted shopping cart.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UserId};

/// One (product, quantity) pair in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItem {
    /// Create a new cart item.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub products: Vec<CartItem>,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.products
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Drop the item for `product_id`, returning whether one was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|item| &item.product_id != product_id);
        self.products.len() != before
    }

    /// Set the quantity of an existing item, returning whether it was found.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        self.products
            .iter_mut()
            .find(|item| &item.product_id == product_id)
            .map(|item| item.quantity = quantity)
            .is_some()
    }
}
