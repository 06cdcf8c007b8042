//! Order management: list, detail and status updates.

use shopfront_core::{AdminOrder, AdminOrderLine, CurrencyCode, OrderId, OrderStatus};
use shopfront_storefront::access::AdminAccess;
use shopfront_storefront::api::{ApiClient, ApiError};
use shopfront_storefront::screen::{Applied, ListScreen, Mutation};
use shopfront_storefront::session::Session;
use tracing::{info, instrument, warn};

use crate::filters::{Badge, date, or_not_available};

/// One order in a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRowView {
    pub id: OrderId,
    /// Last 8 characters of the id.
    pub short_id: String,
    /// Customer username, `N/A` when the user was not joined.
    pub customer: String,
    pub amount: String,
    pub status: Badge,
    pub date: String,
}

impl OrderRowView {
    #[must_use]
    pub fn new(order: &AdminOrder, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.clone(),
            short_id: order.id.short().to_string(),
            customer: or_not_available(order.customer().map(|c| c.username.as_str())),
            amount: order.amount.display(currency),
            status: Badge::status(order.status),
            date: date(order.created_at.as_ref()),
        }
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    pub title: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl OrderLineView {
    #[must_use]
    pub fn new(line: &AdminOrderLine, currency: CurrencyCode) -> Self {
        Self {
            title: or_not_available(line.title()),
            unit_price: line.unit_price().display(currency),
            quantity: line.quantity,
            subtotal: line.subtotal().display(currency),
        }
    }
}

/// Full order detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetailView {
    pub row: OrderRowView,
    pub address: String,
    pub customer_username: String,
    pub customer_email: String,
    pub lines: Vec<OrderLineView>,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(order: &AdminOrder, currency: CurrencyCode) -> Self {
        let customer = order.customer();
        Self {
            row: OrderRowView::new(order, currency),
            address: or_not_available(Some(&order.address)),
            customer_username: or_not_available(customer.map(|c| c.username.as_str())),
            customer_email: or_not_available(customer.map(|c| c.email.as_str())),
            lines: order
                .products
                .iter()
                .map(|line| OrderLineView::new(line, currency))
                .collect(),
        }
    }
}

/// The admin order table.
#[derive(Debug)]
pub struct OrdersScreen {
    client: ApiClient,
    list: ListScreen<AdminOrder>,
}

impl OrdersScreen {
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, _access: AdminAccess) -> Self {
        Self {
            client: session.client(client),
            list: ListScreen::new("Failed to fetch orders"),
        }
    }

    #[must_use]
    pub const fn list(&self) -> &ListScreen<AdminOrder> {
        &self.list
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.list.start_loading();
        let result = self.client.list_orders().await;
        self.list.finish_load(result);
    }

    /// Set an order's status, then refetch the table.
    ///
    /// The result reports the status change alone. A failed refetch after a
    /// successful change still returns `Ok` and leaves its error in the
    /// banner.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the status change is refused; the
    /// banner carries the same message.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        if let Err(e) = self.client.update_order_status(id, status).await {
            warn!(error = %e, "Order status update failed");
            self.list
                .set_banner(e.user_message(Mutation::OrderStatus.failure_message()));
            return Err(e);
        }
        info!("Order status updated");
        if self.list.settle(Mutation::OrderStatus, Ok(Applied::Done)) {
            let result = self.client.list_orders().await;
            self.list.finish_refetch(result);
        }
        Ok(())
    }

    /// Table rows, in list order.
    #[must_use]
    pub fn rows(&self, currency: CurrencyCode) -> Vec<OrderRowView> {
        self.list
            .items()
            .iter()
            .map(|order| OrderRowView::new(order, currency))
            .collect()
    }

    /// Detail of a loaded order.
    #[must_use]
    pub fn detail(&self, id: &OrderId, currency: CurrencyCode) -> Option<OrderDetailView> {
        self.list
            .find(id)
            .map(|order| OrderDetailView::new(order, currency))
    }

    /// Fetch a single order from the backend, whether or not it is listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn fetch_detail(
        &self,
        id: &OrderId,
        currency: CurrencyCode,
    ) -> Result<OrderDetailView, ApiError> {
        let order = self.client.get_order(id).await?;
        Ok(OrderDetailView::new(&order, currency))
    }
}
