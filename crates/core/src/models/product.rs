//! Catalog products.

use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{Price, ProductId};

/// A catalog product.
///
/// `active` is toggled by administrators; inactive products stay in the
/// catalog response and are labelled for admins only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub price: Price,
    /// Units on hand as the backend stores them; may be negative after
    /// overselling.
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Product {
    /// Units available to sell, with negative stock counted as none.
    #[must_use]
    pub fn stock_on_hand(&self) -> u32 {
        u32::try_from(self.stock).unwrap_or(0)
    }

    /// Description cut to `max_chars` characters, with `...` appended when cut.
    #[must_use]
    pub fn summary(&self, max_chars: usize) -> String {
        if self.desc.chars().count() > max_chars {
            let cut: String = self.desc.chars().take(max_chars).collect();
            format!("{cut}...")
        } else {
            self.desc.clone()
        }
    }
}

impl Record for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Body for creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    pub title: String,
    pub desc: String,
    pub img: String,
    pub price: Price,
    pub stock: u32,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            desc: product.desc.clone(),
            img: product.img.clone(),
            price: product.price,
            stock: product.stock_on_hand(),
            categories: product.categories.clone(),
            size: product.size.clone(),
            color: product.color.clone(),
        }
    }
}
