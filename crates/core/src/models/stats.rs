//! Aggregate statistics served to the admin console.

use serde::{Deserialize, Serialize};

use super::AdminOrder;
use crate::types::{Price, ProductId};

/// Admin dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    pub total_revenue: Price,
    pub recent_orders: Vec<AdminOrder>,
}

/// Catalog analytics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductStats {
    pub total_products: u64,
    pub low_stock_products: Vec<LowStockProduct>,
    pub products_by_category: Vec<CategoryCount>,
}

/// A product whose stock is running out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LowStockProduct {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    pub stock: i32,
    pub price: Price,
}

impl LowStockProduct {
    /// Units available to sell, with negative stock counted as none.
    #[must_use]
    pub fn stock_on_hand(&self) -> u32 {
        u32::try_from(self.stock).unwrap_or(0)
    }
}

/// Number of products in a category.
///
/// The backend groups by category name, so the name arrives as `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: Option<String>,
    pub count: u64,
}
