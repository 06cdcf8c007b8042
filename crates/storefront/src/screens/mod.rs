//! Shopper-facing screens.
//!
//! Each screen holds the local state of one route, calls the REST client,
//! and exposes view structs for rendering.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod product_form;

pub use auth::{ForgotPasswordScreen, LoginScreen, Notice, RegisterScreen};
pub use cart::{CartLineView, CartScreen, CartView, CheckoutError, CheckoutReceipt};
pub use catalog::{ProductCardView, ProductDetailScreen, ProductDetailView, ProductListScreen};
pub use product_form::{EditorMode, FormError, ProductEditorScreen, ProductForm};
