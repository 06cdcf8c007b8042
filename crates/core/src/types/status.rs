//! Status enums for orders and the badge colors they render with.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Only administrators can change an order's status. Values the client does
/// not recognize deserialize to [`OrderStatus::Unknown`] so a new server-side
/// status never breaks list rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Statuses an administrator can assign, in workflow order.
    pub const ASSIGNABLE: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalized label for menus (e.g., "Shipped").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Badge color used wherever the status is displayed.
    #[must_use]
    pub const fn color(&self) -> BadgeColor {
        match self {
            Self::Pending => BadgeColor::Warning,
            Self::Processing => BadgeColor::Info,
            Self::Shipped => BadgeColor::Primary,
            Self::Delivered => BadgeColor::Success,
            Self::Cancelled => BadgeColor::Error,
            Self::Unknown => BadgeColor::Default,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ASSIGNABLE
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "invalid order status: {s} (expected one of pending, processing, shipped, delivered, cancelled)"
                )
            })
    }
}

/// Semantic badge color, independent of any rendering toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BadgeColor {
    #[default]
    Default,
    Primary,
    Info,
    Success,
    Warning,
    Error,
}

impl BadgeColor {
    /// Lowercase name of the color.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Primary => "primary",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}
