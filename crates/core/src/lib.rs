//! Shopfront Core - Shared types library.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - REST client, session, catalog and cart screens
//! - `admin` - Admin console screens
//! - `cli` - Terminal front-end driving the screens
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. The one piece of real logic here is the cart total
//! reduction in [`cart`], kept here so it can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and order statuses
//! - [`models`] - Entities exchanged verbatim with the backend
//! - [`cart`] - Cart hydration lookup and total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod models;
pub mod types;

pub use cart::{CartTotal, LineTotal, ProductLookup};
pub use models::*;
pub use types::*;
