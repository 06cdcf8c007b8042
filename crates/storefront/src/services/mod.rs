//! Services that combine REST calls with local state.
//!
//! - `auth` - login, registration, password reset and logout

pub mod auth;
