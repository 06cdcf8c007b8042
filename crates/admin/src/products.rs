//! Catalog analytics: totals, low stock and category breakdown.

use shopfront_core::{BadgeColor, CategoryCount, CurrencyCode, LowStockProduct, ProductStats};
use shopfront_storefront::access::AdminAccess;
use shopfront_storefront::api::ApiClient;
use shopfront_storefront::screen::LoadState;
use shopfront_storefront::session::Session;
use tracing::instrument;

use crate::filters::{Badge, or_not_available};

/// A product that is running out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockView {
    pub title: String,
    /// Stock count; red when sold out, amber otherwise.
    pub stock: Badge,
    pub price: String,
}

impl LowStockView {
    #[must_use]
    pub fn new(product: &LowStockProduct, currency: CurrencyCode) -> Self {
        let on_hand = product.stock_on_hand();
        let color = if on_hand == 0 {
            BadgeColor::Error
        } else {
            BadgeColor::Warning
        };
        Self {
            title: product.title.clone(),
            stock: Badge::new(on_hand.to_string(), color),
            price: product.price.display(currency),
        }
    }
}

/// Product count for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub category: String,
    pub count: u64,
}

impl From<&CategoryCount> for CategoryView {
    fn from(entry: &CategoryCount) -> Self {
        Self {
            category: or_not_available(entry.category.as_deref()),
            count: entry.count,
        }
    }
}

/// Product statistics display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStatsView {
    pub total_products: u64,
    pub low_stock: Vec<LowStockView>,
    pub by_category: Vec<CategoryView>,
}

impl ProductStatsView {
    #[must_use]
    pub fn new(stats: &ProductStats, currency: CurrencyCode) -> Self {
        Self {
            total_products: stats.total_products,
            low_stock: stats
                .low_stock_products
                .iter()
                .map(|product| LowStockView::new(product, currency))
                .collect(),
            by_category: stats
                .products_by_category
                .iter()
                .map(CategoryView::from)
                .collect(),
        }
    }
}

/// The product statistics screen.
#[derive(Debug)]
pub struct ProductStatsScreen {
    client: ApiClient,
    state: LoadState<ProductStats>,
}

impl ProductStatsScreen {
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, _access: AdminAccess) -> Self {
        Self {
            client: session.client(client),
            state: LoadState::Loading,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<ProductStats> {
        &self.state
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        let result = self.client.product_stats().await;
        self.state = LoadState::from_result(result, "Failed to fetch product statistics");
    }

    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> Option<ProductStatsView> {
        self.state
            .ready()
            .map(|stats| ProductStatsView::new(stats, currency))
    }
}
