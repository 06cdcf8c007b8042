//! Shopfront Storefront library.
//!
//! Client side of the storefront: a REST client for the backend, persisted
//! session handling, access gating, and the shopper-facing screens.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`api`] - REST client and endpoint wrappers
//! - [`session`] - Persisted `token`/`user` keys and the [`Session`](session::Session) value
//! - [`services`] - Authentication flows
//! - [`access`] - Capabilities, admin capability token, route resolution
//! - [`screen`] - Load state and list-mutate-refresh machinery
//! - [`screens`] - Catalog, product form, cart and auth screens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod api;
pub mod config;
pub mod screen;
pub mod screens;
pub mod services;
pub mod session;
