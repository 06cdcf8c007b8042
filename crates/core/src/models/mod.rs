//! Entities exchanged verbatim with the storefront backend.
//!
//! The backend owns and persists every record. The client only holds
//! disposable copies, so these types do no normalization beyond defaulting
//! optional fields. Identifiers arrive as Mongo-style `_id`; `id` is accepted
//! as an alias.

pub mod cart;
pub mod order;
pub mod product;
pub mod stats;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{AdminOrder, AdminOrderLine, CustomerSummary, NewOrder, Order, ProductSummary, Reference};
pub use product::{Product, ProductInput};
pub use stats::{CategoryCount, DashboardStats, LowStockProduct, ProductStats};
pub use user::{Credentials, PasswordReset, Registration, User, UserUpdate};

/// A record that can be located in a list by its identifier.
pub trait Record {
    /// Identifier type.
    type Id: PartialEq + Clone + std::fmt::Debug;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;
}
