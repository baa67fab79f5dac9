//! Mock supplier tracking source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::platform::Order;
use crate::supplier::{
    SupplierError, SupplierProfile, TrackingBatch, TrackingRecord, TrackingSource,
};

/// Mock implementation of the TrackingSource trait.
///
/// Responses are scripted per platform order number. Orders without a
/// script get an empty batch.
#[derive(Debug, Clone)]
pub struct MockTrackingSource {
    supplier_id: u64,
    profile: SupplierProfile,
    responses: Arc<RwLock<HashMap<String, Result<TrackingBatch, SupplierError>>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockTrackingSource {
    /// Create a mock supplier with the given platform id and profile.
    pub fn new(supplier_id: u64, profile: SupplierProfile) -> Self {
        Self {
            supplier_id,
            profile,
            responses: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Return these records for the order.
    pub async fn set_records(&self, order_number: &str, records: Vec<TrackingRecord>) {
        self.set_batch(
            order_number,
            TrackingBatch {
                records,
                requests: 1,
                last_body: Some("<mock/>".to_string()),
            },
        )
        .await;
    }

    /// Return this batch for the order.
    pub async fn set_batch(&self, order_number: &str, batch: TrackingBatch) {
        self.responses
            .write()
            .await
            .insert(order_number.to_string(), Ok(batch));
    }

    /// Fail with this error for the order.
    pub async fn set_error(&self, order_number: &str, error: SupplierError) {
        self.responses
            .write()
            .await
            .insert(order_number.to_string(), Err(error));
    }

    /// Order numbers tracking was requested for, in order.
    pub async fn requested_orders(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl TrackingSource for MockTrackingSource {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn supplier_id(&self) -> u64 {
        self.supplier_id
    }

    fn profile(&self) -> &SupplierProfile {
        &self.profile
    }

    async fn fetch_tracking(&self, order: &Order) -> Result<TrackingBatch, SupplierError> {
        self.requests.write().await.push(order.order_number.clone());

        self.responses
            .read()
            .await
            .get(&order.order_number)
            .cloned()
            .unwrap_or_else(|| {
                Ok(TrackingBatch {
                    records: vec![],
                    requests: 1,
                    last_body: None,
                })
            })
    }
}
