//! Shopfront Admin library.
//!
//! Screens of the admin console. Every screen constructor takes an
//! [`AdminAccess`](shopfront_storefront::access::AdminAccess) token, so a
//! shopper session cannot build one.
//!
//! # Modules
//!
//! - [`dashboard`] - Store counters and recent orders
//! - [`users`] - User table with edit and delete
//! - [`orders`] - Order table, detail and status updates
//! - [`products`] - Low stock and category statistics
//! - [`filters`] - Date, placeholder and badge formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod filters;
pub mod orders;
pub mod products;
pub mod users;

pub use dashboard::{DashboardScreen, DashboardView};
pub use filters::Badge;
pub use orders::{OrderDetailView, OrderLineView, OrderRowView, OrdersScreen};
pub use products::{CategoryView, LowStockView, ProductStatsScreen, ProductStatsView};
pub use users::{UserRowView, UsersScreen};
