//! Cart and checkout screen.
//!
//! The cart endpoint only returns `(productId, quantity)` pairs, so after the
//! cart loads every product is fetched in parallel to price the lines. A
//! product that fails to load is priced at zero and flagged in the view.

use futures::future::join_all;
use shopfront_core::{
    Cart, CartTotal, CurrencyCode, NewOrder, Order, Price, ProductId, ProductLookup, UserId,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::access::AccessDenied;
use crate::api::{ApiClient, ApiError};
use crate::screen::LoadState;
use crate::session::Session;

/// Shown after an order was accepted.
pub const ORDER_PLACED: &str = "Order placed successfully!";

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The address is blank. No request was sent.
    #[error("Please enter a delivery address.")]
    AddressRequired,

    /// Nothing to order. No request was sent.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The backend did not accept the order.
    #[error("{message}")]
    Order {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// The created order, when the backend echoed it.
    pub order: Option<Order>,
    /// Amount that was submitted.
    pub amount: Price,
    /// Items whose removal from the cart failed after the order was placed.
    pub uncleared: Vec<ProductId>,
}

/// One cart line, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub product_id: ProductId,
    /// Product title, or `Product ID: <id>` when the product did not load.
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
    pub priced: bool,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
    /// Set when some lines could not be priced, so the total is understated.
    pub warning: Option<String>,
}

impl CartView {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The signed-in user's cart.
#[derive(Debug)]
pub struct CartScreen {
    client: ApiClient,
    user_id: UserId,
    state: LoadState<Cart>,
    lookup: ProductLookup,
    banner: Option<String>,
    order_placed: bool,
    /// Delivery address typed by the user.
    pub address: String,
}

impl CartScreen {
    /// A cart screen for the session's user.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for anonymous sessions.
    pub fn new(client: &ApiClient, session: &Session) -> Result<Self, AccessDenied> {
        let user = session.user().ok_or(AccessDenied)?;
        Ok(Self {
            client: session.client(client),
            user_id: user.id.clone(),
            state: LoadState::Loading,
            lookup: ProductLookup::new(),
            banner: None,
            order_placed: false,
            address: String::new(),
        })
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Cart> {
        &self.state
    }

    #[must_use]
    pub const fn lookup(&self) -> &ProductLookup {
        &self.lookup
    }

    /// Inline message from the last action.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Whether an order was placed from this screen.
    #[must_use]
    pub const fn order_placed(&self) -> bool {
        self.order_placed
    }

    /// Fetch the cart, then price it.
    ///
    /// A user without a cart gets an empty one.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        self.banner = None;

        let result = self.client.get_cart(&self.user_id).await.map(|cart| {
            cart.unwrap_or_else(|| Cart {
                user_id: Some(self.user_id.clone()),
                products: Vec::new(),
            })
        });
        self.state = LoadState::from_result(result, "Failed to fetch cart");

        if let Some(cart) = self.state.ready() {
            self.lookup = hydrate(&self.client, cart).await;
        }
    }

    /// Total of the loaded cart; zero while loading.
    #[must_use]
    pub fn total(&self) -> CartTotal {
        self.state
            .ready()
            .map(|cart| cart.total(&self.lookup))
            .unwrap_or_default()
    }

    /// Cart view, once loaded.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> Option<CartView> {
        let cart = self.state.ready()?;
        let lines = cart
            .lines(&self.lookup)
            .map(|line| CartLineView {
                product_id: line.item.product_id.clone(),
                title: line.product.map_or_else(
                    || format!("Product ID: {}", line.item.product_id),
                    |p| p.title.clone(),
                ),
                quantity: line.item.quantity,
                unit_price: line.unit_price.display(currency),
                subtotal: line.subtotal.display(currency),
                priced: line.is_priced(),
            })
            .collect();

        let total = cart.total(&self.lookup);
        let warning = (!total.is_complete()).then(|| {
            format!(
                "Prices unavailable for {} item(s); the total may be understated",
                total.unpriced.len()
            )
        });

        Some(CartView {
            lines,
            total: total.amount.display(currency),
            item_count: cart.unit_count(),
            warning,
        })
    }

    /// Change the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns the API error; the banner carries its message.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let result = self
            .client
            .update_cart_item(&self.user_id, product_id, quantity)
            .await;
        match result {
            Ok(()) => {
                self.banner = None;
                if let Some(cart) = self.state.ready_mut() {
                    cart.set_quantity(product_id, quantity);
                }
                Ok(())
            }
            Err(e) => {
                self.banner = Some(e.user_message("Failed to update cart"));
                Err(e)
            }
        }
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns the API error; the banner carries its message.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&mut self, product_id: &ProductId) -> Result<(), ApiError> {
        match self.client.remove_from_cart(&self.user_id, product_id).await {
            Ok(()) => {
                self.banner = None;
                if let Some(cart) = self.state.ready_mut() {
                    cart.remove(product_id);
                }
                Ok(())
            }
            Err(e) => {
                self.banner = Some(e.user_message("Failed to remove item"));
                Err(e)
            }
        }
    }

    /// Place an order for the whole cart, then empty the cart.
    ///
    /// The address must not be blank; otherwise nothing is sent. Once the
    /// order is accepted each item is removed with its own request. Removal
    /// is not atomic: items whose removal failed stay in the local cart and
    /// are listed in the receipt.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AddressRequired` or `CheckoutError::EmptyCart`
    /// without a request, `CheckoutError::Order` if the backend refuses.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn place_order(&mut self) -> Result<CheckoutReceipt, CheckoutError> {
        let result = self.submit_order().await;
        match &result {
            Ok(receipt) if receipt.uncleared.is_empty() => {
                self.banner = Some(ORDER_PLACED.to_string());
            }
            Ok(receipt) => {
                self.banner = Some(format!(
                    "{ORDER_PLACED} {} item(s) could not be removed from your cart.",
                    receipt.uncleared.len()
                ));
            }
            Err(e) => self.banner = Some(e.to_string()),
        }
        result
    }

    async fn submit_order(&mut self) -> Result<CheckoutReceipt, CheckoutError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(CheckoutError::AddressRequired);
        }

        let cart = match self.state.ready() {
            Some(cart) if !cart.is_empty() => cart,
            _ => return Err(CheckoutError::EmptyCart),
        };

        let total = cart.total(&self.lookup);
        if !total.is_complete() {
            warn!(unpriced = ?total.unpriced, "Placing order with unpriced items");
        }
        let order = NewOrder {
            user_id: self.user_id.clone(),
            products: cart.products.clone(),
            amount: total.amount,
            address: address.to_string(),
        };

        let created = self
            .client
            .create_order(&order)
            .await
            .map_err(|source| CheckoutError::Order {
                message: source.user_message("Failed to place order"),
                source,
            })?;
        info!(amount = %order.amount, items = order.products.len(), "Order placed");

        let removals = order
            .products
            .iter()
            .map(|item| self.client.remove_from_cart(&self.user_id, &item.product_id));
        let uncleared: Vec<ProductId> = join_all(removals)
            .await
            .into_iter()
            .zip(&order.products)
            .filter_map(|(result, item)| match result {
                Ok(()) => None,
                Err(e) => {
                    warn!(product_id = %item.product_id, error = %e, "Failed to clear cart item");
                    Some(item.product_id.clone())
                }
            })
            .collect();

        if let Some(cart) = self.state.ready_mut() {
            cart.products.retain(|item| uncleared.contains(&item.product_id));
        }
        self.order_placed = true;
        self.address.clear();

        Ok(CheckoutReceipt {
            order: created,
            amount: order.amount,
            uncleared,
        })
    }
}

/// Fetch every product in the cart concurrently. Failures are skipped.
async fn hydrate(client: &ApiClient, cart: &Cart) -> ProductLookup {
    let fetches = cart
        .products
        .iter()
        .map(|item| async move { (item.product_id.clone(), client.get_product(&item.product_id).await) });

    join_all(fetches)
        .await
        .into_iter()
        .filter_map(|(product_id, result)| match result {
            Ok(product) => Some((product_id, product)),
            Err(e) => {
                warn!(product_id = %product_id, error = %e, "Could not price cart item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use shopfront_core::{CartItem, Product, User};

    use super::*;
    use crate::config::ClientConfig;

    fn session() -> Session {
        Session::authenticated(
            SecretString::from("tok".to_string()),
            User {
                id: UserId::new("u1"),
                username: "alice".to_string(),
                email: String::new(),
                is_admin: false,
                created_at: None,
            },
        )
    }

    fn screen_with(items: &[(&str, u32)], priced: &[(&str, u32)]) -> CartScreen {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let mut screen = CartScreen::new(&client, &session()).unwrap();
        screen.state = LoadState::Ready(Cart {
            user_id: Some(UserId::new("u1")),
            products: items.iter().map(|(id, q)| CartItem::new(*id, *q)).collect(),
        });
        screen.lookup = priced
            .iter()
            .map(|(id, price)| {
                (
                    ProductId::new(*id),
                    Product {
                        id: ProductId::new(*id),
                        title: format!("Item {id}"),
                        desc: String::new(),
                        img: String::new(),
                        price: Price::from(*price),
                        stock: 1,
                        categories: vec![],
                        size: None,
                        color: None,
                        active: true,
                    },
                )
            })
            .collect();
        screen
    }

    #[test]
    fn test_anonymous_cannot_open_cart() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        assert!(CartScreen::new(&client, &Session::anonymous()).is_err());
    }

    #[test]
    fn test_view_prices_lines() {
        let screen = screen_with(&[("A", 2)], &[("A", 50)]);
        let view = screen.view(CurrencyCode::USD).unwrap();
        assert_eq!(view.total, "$100.00");
        assert_eq!(view.lines[0].title, "Item A");
        assert_eq!(view.lines[0].subtotal, "$100.00");
        assert!(view.warning.is_none());
        assert_eq!(screen.total().amount, Price::from(100u32));
    }

    #[test]
    fn test_view_flags_unpriced_lines() {
        let screen = screen_with(&[("A", 2), ("B", 1)], &[("A", 50)]);
        let view = screen.view(CurrencyCode::USD).unwrap();
        assert_eq!(view.total, "$100.00");
        assert_eq!(view.lines[1].title, "Product ID: B");
        assert_eq!(view.lines[1].unit_price, "$0.00");
        assert!(!view.lines[1].priced);
        assert!(view.warning.is_some());
    }

    #[tokio::test]
    async fn test_blank_address_is_rejected_without_request() {
        let mut screen = screen_with(&[("A", 2)], &[("A", 50)]);
        screen.address = "   ".to_string();
        let err = screen.place_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::AddressRequired));
        assert_eq!(screen.banner(), Some("Please enter a delivery address."));
        assert!(!screen.order_placed());
        assert_eq!(screen.state().ready().unwrap().products.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let mut screen = screen_with(&[], &[]);
        screen.address = "221B".to_string();
        assert!(matches!(
            screen.place_order().await,
            Err(CheckoutError::EmptyCart)
        ));
    }
}
