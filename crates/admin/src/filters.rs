//! Formatting helpers shared by the admin views.

use chrono::{DateTime, Utc};
use shopfront_core::{BadgeColor, OrderStatus};

/// Placeholder for a value the backend did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Calendar date of a timestamp, `N/A` when missing.
#[must_use]
pub fn date(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |ts| ts.format("%Y-%m-%d").to_string(),
    )
}

/// The text, or `N/A` when missing or blank.
#[must_use]
pub fn or_not_available(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// A short label with a semantic color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: BadgeColor,
}

impl Badge {
    #[must_use]
    pub fn new(label: impl Into<String>, color: BadgeColor) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    /// Badge for an order status.
    #[must_use]
    pub fn status(status: OrderStatus) -> Self {
        Self::new(status.label(), status.color())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_date() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        assert_eq!(date(Some(&ts)), "2024-05-01");
        assert_eq!(date(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_or_not_available() {
        assert_eq!(or_not_available(Some("ana")), "ana");
        assert_eq!(or_not_available(Some("  ")), NOT_AVAILABLE);
        assert_eq!(or_not_available(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_status_badge() {
        let badge = Badge::status(OrderStatus::Cancelled);
        assert_eq!(badge.color, BadgeColor::Error);
        assert_eq!(badge.label, OrderStatus::Cancelled.label());
    }
}
