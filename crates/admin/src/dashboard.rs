//! Admin dashboard: store counters and the most recent orders.

use shopfront_core::{CurrencyCode, DashboardStats};
use shopfront_storefront::access::AdminAccess;
use shopfront_storefront::api::ApiClient;
use shopfront_storefront::screen::LoadState;
use shopfront_storefront::session::Session;
use tracing::instrument;

use crate::orders::OrderRowView;

/// Dashboard display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    pub total_revenue: String,
    pub recent_orders: Vec<OrderRowView>,
}

impl DashboardView {
    #[must_use]
    pub fn new(stats: &DashboardStats, currency: CurrencyCode) -> Self {
        Self {
            total_users: stats.total_users,
            total_products: stats.total_products,
            total_orders: stats.total_orders,
            total_revenue: stats.total_revenue.display(currency),
            recent_orders: stats
                .recent_orders
                .iter()
                .map(|order| OrderRowView::new(order, currency))
                .collect(),
        }
    }
}

/// The dashboard screen.
#[derive(Debug)]
pub struct DashboardScreen {
    client: ApiClient,
    state: LoadState<DashboardStats>,
}

impl DashboardScreen {
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, _access: AdminAccess) -> Self {
        Self {
            client: session.client(client),
            state: LoadState::Loading,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<DashboardStats> {
        &self.state
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        let result = self.client.dashboard_stats().await;
        self.state = LoadState::from_result(result, "Failed to fetch dashboard statistics");
    }

    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> Option<DashboardView> {
        self.state
            .ready()
            .map(|stats| DashboardView::new(stats, currency))
    }
}
