//! Types shared by the supplier adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::platform::Order;

use super::SupplierProfile;

/// One shipment unit reported by a supplier for an order.
///
/// Values are whitespace-trimmed. `None` means the supplier payload did not
/// carry the field at all, an empty string means it was present but blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingRecord {
    /// Tracking number; empty when the supplier has no tracking yet.
    pub tracking_number: String,
    /// Carrier name as reported by the supplier.
    pub carrier: Option<String>,
    /// Supplier-side reference (invoice number or supplier order id).
    pub reference: Option<String>,
    /// Order date in the supplier's own format.
    pub order_date: Option<String>,
}

impl TrackingRecord {
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into().trim().to_string(),
            ..Default::default()
        }
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into().trim().to_string());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into().trim().to_string());
        self
    }

    pub fn with_order_date(mut self, order_date: impl Into<String>) -> Self {
        self.order_date = Some(order_date.into().trim().to_string());
        self
    }

    pub fn has_tracking(&self) -> bool {
        !self.tracking_number.is_empty()
    }
}

/// Everything a supplier returned for one platform order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingBatch {
    /// Records in supplier arrival order.
    pub records: Vec<TrackingRecord>,
    /// Number of supplier requests issued for the order.
    pub requests: usize,
    /// Last raw response body, kept for error reports.
    pub last_body: Option<String>,
}

impl TrackingBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Errors that can occur when asking a supplier for tracking.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SupplierError {
    #[error("Supplier connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Supplier request timed out")]
    Timeout,

    #[error("Supplier API error: HTTP {status}")]
    ApiError { status: u16, body: String },

    /// The payload could not be understood; `body` is the raw response.
    #[error("Malformed supplier response: {message}")]
    Malformed { message: String, body: String },

    /// The supplier answered with its own error payload.
    #[error("Supplier reported an error: {0}")]
    VendorError(String),

    #[error("Supplier client not configured: {0}")]
    NotConfigured(String),
}

impl SupplierError {
    /// Raw response body associated with the error, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            SupplierError::ApiError { body, .. } | SupplierError::Malformed { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SupplierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SupplierError::Timeout
        } else {
            SupplierError::ConnectionFailed(e.to_string())
        }
    }
}

/// A supplier backend that can report tracking for platform orders.
#[async_trait]
pub trait TrackingSource: Send + Sync {
    /// Supplier name for logging.
    fn name(&self) -> &str;

    /// Platform supplier id used to list this supplier's orders.
    fn supplier_id(&self) -> u64;

    /// How this supplier's records turn into platform writes.
    fn profile(&self) -> &SupplierProfile;

    /// Fetch every tracking record the supplier has for `order`.
    async fn fetch_tracking(&self, order: &Order) -> Result<TrackingBatch, SupplierError>;
}
