//! Product list and product detail screens.

use shopfront_core::{CurrencyCode, Product, ProductId, UserId};
use tracing::instrument;

use crate::access::{AccessDenied, Capabilities};
use crate::api::{ApiClient, ProductQuery};
use crate::screen::{Applied, ListScreen, LoadState, Mutation};
use crate::session::Session;

/// Shown when an anonymous visitor tries to add to cart.
pub const PLEASE_LOGIN: &str = "Please login to add to cart";

/// Shown when an admin tries to add to cart.
pub const ADMINS_CANNOT_ADD: &str = "Admins cannot add to cart";

/// Shown after an item was added to the cart.
pub const ADDED_TO_CART: &str = "Added to cart!";

const ADD_TO_CART_FAILED: &str = "Failed to add to cart";

/// Description length on product cards.
const CARD_SUMMARY_CHARS: usize = 80;

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub summary: String,
    pub price: String,
    pub categories: Vec<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    /// "Active" or "Inactive"; admins only.
    pub status: Option<&'static str>,
    /// Remaining stock; admins only.
    pub stock: Option<u32>,
    /// "Activate" or "Deactivate"; admins only.
    pub toggle_label: Option<&'static str>,
    /// Whether to offer "Add to Cart" (shoppers and visitors).
    pub can_add_to_cart: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, caps: Capabilities, currency: CurrencyCode) -> Self {
        let admin = caps.is_admin;
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            summary: product.summary(CARD_SUMMARY_CHARS),
            price: product.price.display(currency),
            categories: product.categories.clone(),
            size: product.size.clone(),
            color: product.color.clone(),
            status: admin.then_some(if product.active { "Active" } else { "Inactive" }),
            stock: admin.then(|| product.stock_on_hand()),
            toggle_label: admin.then_some(if product.active {
                "Deactivate"
            } else {
                "Activate"
            }),
            can_add_to_cart: !admin,
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailView {
    pub title: String,
    pub desc: String,
    pub img: String,
    pub price: String,
    pub categories: Vec<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub can_add_to_cart: bool,
}

/// Add one unit to the signed-in user's cart, returning the message to show.
async fn add_one_to_cart(
    client: &ApiClient,
    caps: Capabilities,
    user_id: Option<&UserId>,
    product_id: &ProductId,
) -> String {
    let Some(user_id) = user_id else {
        return PLEASE_LOGIN.to_string();
    };
    if caps.is_admin {
        return ADMINS_CANNOT_ADD.to_string();
    }
    match client.add_to_cart(user_id, product_id, 1).await {
        Ok(()) => ADDED_TO_CART.to_string(),
        Err(e) => e.user_message(ADD_TO_CART_FAILED),
    }
}

/// The product catalog.
#[derive(Debug)]
pub struct ProductListScreen {
    client: ApiClient,
    caps: Capabilities,
    user_id: Option<UserId>,
    query: ProductQuery,
    list: ListScreen<Product>,
    cart_message: Option<String>,
}

impl ProductListScreen {
    /// A catalog screen for `session`. Call [`load`](Self::load) to fetch.
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, query: ProductQuery) -> Self {
        Self {
            client: session.client(client),
            caps: session.capabilities(),
            user_id: session.user().map(|u| u.id.clone()),
            query,
            list: ListScreen::new("Failed to load products"),
            cart_message: None,
        }
    }

    #[must_use]
    pub const fn list(&self) -> &ListScreen<Product> {
        &self.list
    }

    #[must_use]
    pub fn cart_message(&self) -> Option<&str> {
        self.cart_message.as_deref()
    }

    /// Fetch the catalog, entering `Loading` first.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.list.start_loading();
        let result = self.client.get_all_products(&self.query).await;
        self.list.finish_load(result);
    }

    async fn refetch(&mut self) {
        let result = self.client.get_all_products(&self.query).await;
        self.list.finish_refetch(result);
    }

    /// Add one unit of a product to the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&mut self, product_id: &ProductId) -> &str {
        let message =
            add_one_to_cart(&self.client, self.caps, self.user_id.as_ref(), product_id).await;
        self.cart_message.insert(message)
    }

    /// Activate or deactivate a product, then refetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for non-admin sessions; no request is sent.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_active(
        &mut self,
        product_id: &ProductId,
        active: bool,
    ) -> Result<(), AccessDenied> {
        self.caps.admin_access()?;
        let mutation = if active {
            Mutation::ProductActivate
        } else {
            Mutation::ProductDeactivate
        };
        let result = self
            .client
            .update_product_status(product_id, active)
            .await
            .map(|()| Applied::Done);
        if self.list.settle(mutation, result) {
            self.refetch().await;
        }
        Ok(())
    }

    /// Delete a product, then refetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` for non-admin sessions; no request is sent.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete(&mut self, product_id: &ProductId) -> Result<(), AccessDenied> {
        self.caps.admin_access()?;
        let result = self
            .client
            .delete_product(product_id)
            .await
            .map(|()| Applied::Removed(product_id.clone()));
        if self.list.settle(Mutation::ProductDelete, result) {
            self.refetch().await;
        }
        Ok(())
    }

    /// Cards for the loaded products, in list order.
    #[must_use]
    pub fn cards(&self, currency: CurrencyCode) -> Vec<ProductCardView> {
        self.list
            .items()
            .iter()
            .map(|product| ProductCardView::new(product, self.caps, currency))
            .collect()
    }
}

/// A single product.
#[derive(Debug)]
pub struct ProductDetailScreen {
    client: ApiClient,
    caps: Capabilities,
    user_id: Option<UserId>,
    product_id: ProductId,
    state: LoadState<Product>,
    cart_message: Option<String>,
}

impl ProductDetailScreen {
    #[must_use]
    pub fn new(client: &ApiClient, session: &Session, product_id: ProductId) -> Self {
        Self {
            client: session.client(client),
            caps: session.capabilities(),
            user_id: session.user().map(|u| u.id.clone()),
            product_id,
            state: LoadState::Loading,
            cart_message: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<Product> {
        &self.state
    }

    #[must_use]
    pub fn cart_message(&self) -> Option<&str> {
        self.cart_message.as_deref()
    }

    /// Fetch the product.
    #[instrument(skip(self), fields(product_id = %self.product_id))]
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        let result = self.client.get_product(&self.product_id).await;
        self.state = LoadState::from_result(result, "Failed to load product");
    }

    /// Add one unit of this product to the cart.
    #[instrument(skip(self), fields(product_id = %self.product_id))]
    pub async fn add_to_cart(&mut self) -> &str {
        let message = add_one_to_cart(
            &self.client,
            self.caps,
            self.user_id.as_ref(),
            &self.product_id,
        )
        .await;
        self.cart_message.insert(message)
    }

    /// Detail view once loaded.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> Option<ProductDetailView> {
        self.state.ready().map(|product| ProductDetailView {
            title: product.title.clone(),
            desc: product.desc.clone(),
            img: product.img.clone(),
            price: product.price.display(currency),
            categories: product.categories.clone(),
            size: product.size.clone(),
            color: product.color.clone(),
            can_add_to_cart: !self.caps.is_admin,
        })
    }
}
