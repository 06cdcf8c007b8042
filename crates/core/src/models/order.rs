//! Orders as created by shoppers and managed by administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CartItem, Record};
use crate::types::{OrderId, OrderStatus, Price, ProductId, UserId};

/// Order placement request built from the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub products: Vec<CartItem>,
    pub amount: Price,
    pub address: String,
}

/// An order as returned to the shopper who placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(default)]
    pub products: Vec<CartItem>,
    #[serde(default)]
    pub amount: Price,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Order {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }
}

/// A foreign key that the backend may or may not have populated.
///
/// Admin endpoints join users and products into orders, so the same field
/// arrives either as a bare id string or as an embedded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<I, T> {
    Populated(T),
    Id(I),
}

impl<I, T> Reference<I, T> {
    /// The embedded record, if the backend populated it.
    #[must_use]
    pub const fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(record) => Some(record),
            Self::Id(_) => None,
        }
    }
}

/// Customer fields joined into admin order listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerSummary {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Product fields joined into admin order lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Price,
}

/// One line of an admin order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderLine {
    #[serde(default)]
    pub product_id: Option<Reference<ProductId, ProductSummary>>,
    pub quantity: u32,
}

impl AdminOrderLine {
    /// Title of the joined product, if populated.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.product()
            .map(|product| product.title.as_str())
            .filter(|title| !title.is_empty())
    }

    /// Unit price of the joined product, zero when not populated.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.product().map_or(Price::ZERO, |product| product.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price().times(self.quantity)
    }

    fn product(&self) -> Option<&ProductSummary> {
        self.product_id.as_ref().and_then(Reference::populated)
    }
}

/// An order as listed in the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<Reference<UserId, CustomerSummary>>,
    #[serde(default)]
    pub products: Vec<AdminOrderLine>,
    #[serde(default)]
    pub amount: Price,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminOrder {
    /// The joined customer record, if populated.
    #[must_use]
    pub fn customer(&self) -> Option<&CustomerSummary> {
        self.user_id.as_ref().and_then(Reference::populated)
    }
}

impl Record for AdminOrder {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }
}
