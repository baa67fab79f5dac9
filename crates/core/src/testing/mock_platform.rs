//! Mock platform gateway for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::platform::{AwaitingOrders, Order, PlatformError, PlatformGateway, ShippingMetadata};

/// Kind of platform write, used to inject per-order failures.
///
/// Listing failures are injected with [`MockPlatform::fail_listing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOp {
    PostShipping,
    ClearAwaitingTracking,
    PostComment,
}

/// A platform call that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ListAwaiting {
        supplier_id: u64,
    },
    PostShipping {
        order_number: String,
        metadata: ShippingMetadata,
    },
    ClearAwaitingTracking {
        order_number: String,
    },
    PostComment {
        order_number: String,
        text: String,
    },
}

impl PlatformCall {
    /// Write kind of the call; `None` for listings.
    pub fn op(&self) -> Option<PlatformOp> {
        match self {
            PlatformCall::ListAwaiting { .. } => None,
            PlatformCall::PostShipping { .. } => Some(PlatformOp::PostShipping),
            PlatformCall::ClearAwaitingTracking { .. } => Some(PlatformOp::ClearAwaitingTracking),
            PlatformCall::PostComment { .. } => Some(PlatformOp::PostComment),
        }
    }

    /// Order the call wrote to; `None` for listings.
    pub fn order_number(&self) -> Option<&str> {
        match self {
            PlatformCall::ListAwaiting { .. } => None,
            PlatformCall::PostShipping { order_number, .. }
            | PlatformCall::ClearAwaitingTracking { order_number }
            | PlatformCall::PostComment { order_number, .. } => Some(order_number),
        }
    }
}

/// Mock implementation of the PlatformGateway trait.
///
/// Provides controllable behavior for testing:
/// - Serve configured awaiting orders per supplier
/// - Record every successful call, in order
/// - Fail a given operation for a given order
///
/// Failed calls are not recorded, so `calls()` reflects the platform state
/// the run actually produced.
///
/// # Example
///
/// ```rust,ignore
/// use tracksync_core::testing::{fixtures, MockPlatform, PlatformOp};
///
/// let platform = MockPlatform::new();
/// platform.set_orders(22, vec![fixtures::order("A", &[])]).await;
/// platform.fail_on("A", PlatformOp::PostComment).await;
///
/// // ...run the reconciler...
///
/// assert_eq!(platform.shipping_writes().await.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPlatform {
    /// Awaiting orders per supplier id.
    orders: Arc<RwLock<HashMap<u64, Vec<Order>>>>,
    /// Recorded successful calls.
    calls: Arc<RwLock<Vec<PlatformCall>>>,
    /// (order number, operation) pairs that fail.
    failures: Arc<RwLock<HashSet<(String, PlatformOp)>>>,
    /// Platform-side totals overriding the listed order count.
    reported_totals: Arc<RwLock<HashMap<u64, u64>>>,
    /// If set, listing fails with this message.
    listing_error: Arc<RwLock<Option<String>>>,
}

impl MockPlatform {
    /// Create a new mock platform with no orders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the awaiting orders returned for a supplier.
    pub async fn set_orders(&self, supplier_id: u64, orders: Vec<Order>) {
        self.orders.write().await.insert(supplier_id, orders);
    }

    /// Report `total` matching orders for a supplier, regardless of how
    /// many are listed.
    pub async fn set_reported_total(&self, supplier_id: u64, total: u64) {
        self.reported_totals.write().await.insert(supplier_id, total);
    }

    /// Make the write `op` fail for `order_number`.
    pub async fn fail_on(&self, order_number: &str, op: PlatformOp) {
        self.failures
            .write()
            .await
            .insert((order_number.to_string(), op));
    }

    /// Make every listing fail as if the platform were unreachable.
    pub async fn fail_listing(&self, message: &str) {
        *self.listing_error.write().await = Some(message.to_string());
    }

    /// All recorded calls, in order.
    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.calls.read().await.clone()
    }

    /// Recorded writes for one order, in order.
    pub async fn writes_for(&self, order_number: &str) -> Vec<PlatformCall> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.order_number() == Some(order_number))
            .cloned()
            .collect()
    }

    /// Shipping info writes as (order number, metadata).
    pub async fn shipping_writes(&self) -> Vec<(String, ShippingMetadata)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                PlatformCall::PostShipping {
                    order_number,
                    metadata,
                } => Some((order_number.clone(), metadata.clone())),
                _ => None,
            })
            .collect()
    }

    /// Orders whose awaiting-tracking tag was removed.
    pub async fn cleared_orders(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                PlatformCall::ClearAwaitingTracking { order_number } => Some(order_number.clone()),
                _ => None,
            })
            .collect()
    }

    /// Comments as (order number, text).
    pub async fn comments(&self) -> Vec<(String, String)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                PlatformCall::PostComment { order_number, text } => {
                    Some((order_number.clone(), text.clone()))
                }
                _ => None,
            })
            .collect()
    }

    async fn check(&self, order_number: &str, op: PlatformOp) -> Result<(), PlatformError> {
        if self
            .failures
            .read()
            .await
            .contains(&(order_number.to_string(), op))
        {
            return Err(PlatformError::ApiError {
                status: 500,
                message: format!("mock failure for {:?} on {}", op, order_number),
            });
        }
        Ok(())
    }

    async fn record(&self, call: PlatformCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl PlatformGateway for MockPlatform {
    async fn awaiting_tracking(&self, supplier_id: u64) -> Result<AwaitingOrders, PlatformError> {
        if let Some(message) = self.listing_error.read().await.clone() {
            return Err(PlatformError::ConnectionFailed(message));
        }

        self.record(PlatformCall::ListAwaiting { supplier_id }).await;

        let orders = self
            .orders
            .read()
            .await
            .get(&supplier_id)
            .cloned()
            .unwrap_or_default();

        let count = self
            .reported_totals
            .read()
            .await
            .get(&supplier_id)
            .copied()
            .unwrap_or(orders.len() as u64);

        Ok(AwaitingOrders { count, orders })
    }

    async fn post_shipping_metadata(
        &self,
        order_number: &str,
        metadata: &ShippingMetadata,
    ) -> Result<(), PlatformError> {
        self.check(order_number, PlatformOp::PostShipping).await?;
        self.record(PlatformCall::PostShipping {
            order_number: order_number.to_string(),
            metadata: metadata.clone(),
        })
        .await;
        Ok(())
    }

    async fn clear_awaiting_tracking(&self, order_number: &str) -> Result<(), PlatformError> {
        self.check(order_number, PlatformOp::ClearAwaitingTracking)
            .await?;
        self.record(PlatformCall::ClearAwaitingTracking {
            order_number: order_number.to_string(),
        })
        .await;
        Ok(())
    }

    async fn post_comment(&self, order_number: &str, text: &str) -> Result<(), PlatformError> {
        self.check(order_number, PlatformOp::PostComment).await?;
        self.record(PlatformCall::PostComment {
            order_number: order_number.to_string(),
            text: text.to_string(),
        })
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_serves_orders_per_supplier() {
        let platform = MockPlatform::new();
        platform.set_orders(1, vec![fixtures::order("A", &[])]).await;

        assert_eq!(platform.awaiting_tracking(1).await.unwrap().orders.len(), 1);
        assert!(platform.awaiting_tracking(2).await.unwrap().orders.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_is_not_recorded() {
        let platform = MockPlatform::new();
        platform.set_orders(1, vec![fixtures::order("A", &[])]).await;
        platform.fail_listing("unreachable").await;

        assert!(matches!(
            platform.awaiting_tracking(1).await,
            Err(PlatformError::ConnectionFailed(_))
        ));
        assert!(platform.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_call_has_no_write_op() {
        let platform = MockPlatform::new();
        platform.awaiting_tracking(1).await.unwrap();
        platform.post_comment("A", "x").await.unwrap();

        let ops: Vec<_> = platform.calls().await.iter().map(PlatformCall::op).collect();
        assert_eq!(ops, vec![None, Some(PlatformOp::PostComment)]);
    }

    #[tokio::test]
    async fn test_failures_are_not_recorded() {
        let platform = MockPlatform::new();
        platform.fail_on("A", PlatformOp::PostComment).await;

        assert!(platform.post_comment("A", "x").await.is_err());
        assert!(platform.post_comment("B", "y").await.is_ok());
        assert_eq!(platform.comments().await, vec![("B".to_string(), "y".to_string())]);
    }
}
