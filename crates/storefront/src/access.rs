//! Access gating.
//!
//! Capabilities are derived once from a [`Session`](crate::session::Session)
//! and decide which actions and routes the client offers. The gate is a
//! display convenience: the backend re-checks every admin request.

use std::str::FromStr;

use shopfront_core::{ProductId, User};
use thiserror::Error;

/// What the current session may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl Capabilities {
    /// Capabilities of an anonymous visitor.
    pub const ANONYMOUS: Self = Self {
        is_authenticated: false,
        is_admin: false,
    };

    /// Derive capabilities from the signed-in user, if any.
    #[must_use]
    pub fn for_user(user: Option<&User>) -> Self {
        user.map_or(Self::ANONYMOUS, |user| Self {
            is_authenticated: true,
            is_admin: user.is_admin,
        })
    }

    /// Exchange the admin flag for a capability token.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` when the session is not an admin.
    pub const fn admin_access(&self) -> Result<AdminAccess, AccessDenied> {
        if self.is_admin {
            Ok(AdminAccess { _private: () })
        } else {
            Err(AccessDenied)
        }
    }
}

/// Proof that the session holding it is an admin.
///
/// Admin screens take one in their constructor, so they cannot be built for
/// a shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminAccess {
    _private: (),
}

/// An admin-only action or route was requested without the admin capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Access denied")]
pub struct AccessDenied;

/// Client routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Products,
    ProductDetail(ProductId),
    ProductAdd,
    ProductEdit(ProductId),
    Cart,
    Login,
    Register,
    ForgotPassword,
    AdminDashboard,
    AdminUsers,
    AdminOrders,
    AdminProducts,
}

/// What to do when a route is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show the route.
    Render(Route),
    /// Send the visitor elsewhere.
    Redirect(Route),
    /// Show "Access denied".
    Denied,
}

impl Route {
    /// Whether only admins may open the route.
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::ProductAdd
                | Self::ProductEdit(_)
                | Self::AdminDashboard
                | Self::AdminUsers
                | Self::AdminOrders
                | Self::AdminProducts
        )
    }

    /// URL path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Products => "/".to_string(),
            Self::ProductDetail(id) => format!("/product/{id}"),
            Self::ProductAdd => "/product/add".to_string(),
            Self::ProductEdit(id) => format!("/product/edit/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::AdminDashboard => "/admin/dashboard".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::AdminOrders => "/admin/orders".to_string(),
            Self::AdminProducts => "/admin/products".to_string(),
        }
    }

    /// Decide how to handle this route for the given capabilities.
    #[must_use]
    pub fn resolve(self, caps: Capabilities) -> Resolution {
        if self.requires_admin() && !caps.is_admin {
            return Resolution::Denied;
        }

        match self {
            Self::Cart if !caps.is_authenticated => Resolution::Redirect(Self::Login),
            Self::Cart if caps.is_admin => Resolution::Redirect(Self::Products),
            Self::Login | Self::Register if caps.is_authenticated => {
                Resolution::Redirect(Self::Products)
            }
            route => Resolution::Render(route),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] | ["products"] => Self::Products,
            ["product", "add"] => Self::ProductAdd,
            ["product", "edit", id] => Self::ProductEdit(ProductId::new(*id)),
            ["product", id] => Self::ProductDetail(ProductId::new(*id)),
            ["cart"] => Self::Cart,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["forgot-password"] => Self::ForgotPassword,
            ["admin", "dashboard"] => Self::AdminDashboard,
            ["admin", "users"] => Self::AdminUsers,
            ["admin", "orders"] => Self::AdminOrders,
            ["admin", "products"] => Self::AdminProducts,
            _ => return Err(format!("unknown route: {s}")),
        };
        Ok(route)
    }
}
