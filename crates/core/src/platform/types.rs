//! Types for the order-management platform.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A comment attached to a platform order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderComment {
    /// Free text, opaque to this system.
    #[serde(default)]
    pub text: String,
}

/// A platform order awaiting tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Platform order number (unique).
    pub order_number: String,
    /// When the order was placed, as the platform sent it.
    ///
    /// Kept raw so one odd timestamp cannot fail the whole listing; it is
    /// parsed only where a ship date is derived from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_placed_date: Option<String>,
    /// Comments in platform order.
    #[serde(default)]
    pub comments: Vec<OrderComment>,
}

/// Result of listing orders awaiting tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwaitingOrders {
    /// Total matching orders reported by the platform.
    #[serde(default)]
    pub count: u64,
    /// Orders in platform order.
    #[serde(default, rename = "order")]
    pub orders: Vec<Order>,
}

/// Shipping information written as an order's official tracking.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShippingMetadata {
    pub tracking_number: String,
    #[serde(serialize_with = "serialize_ship_date")]
    pub ship_date: DateTime<Utc>,
    pub carrier_name: String,
    pub shipping_method: String,
    pub cost: u32,
}

impl ShippingMetadata {
    /// Ship date as sent on the wire, e.g. `2024-03-05T00:00:00.000Z`.
    pub fn ship_date_iso(&self) -> String {
        format_ship_date(&self.ship_date)
    }
}

/// ISO-8601, millisecond precision, UTC designator.
pub fn format_ship_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn serialize_ship_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_ship_date(date))
}

/// Errors that can occur when talking to the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Platform request timed out")]
    Timeout,

    #[error("Platform API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse platform response: {0}")]
    ParseError(String),

    #[error("Platform client not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PlatformError::Timeout
        } else if e.is_connect() {
            PlatformError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            PlatformError::ParseError(e.to_string())
        } else {
            PlatformError::ConnectionFailed(e.to_string())
        }
    }
}

/// Operations the reconciliation engine needs from the platform.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Orders tagged awaiting tracking for one supplier, in platform order.
    async fn awaiting_tracking(&self, supplier_id: u64) -> Result<AwaitingOrders, PlatformError>;

    /// Record the official shipping information for an order.
    async fn post_shipping_metadata(
        &self,
        order_number: &str,
        metadata: &ShippingMetadata,
    ) -> Result<(), PlatformError>;

    /// Remove the awaiting-tracking tag from an order.
    async fn clear_awaiting_tracking(&self, order_number: &str) -> Result<(), PlatformError>;

    /// Append a free-text comment to an order.
    async fn post_comment(&self, order_number: &str, text: &str) -> Result<(), PlatformError>;
}
