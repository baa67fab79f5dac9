//! Reconciliation engine.
//!
//! Drives one supplier run:
//! list awaiting orders -> per order: skip? -> fetch -> plan -> apply.
//! Everything is sequential; an order's failure never reaches the next one.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::mode::OrderFilter;
use crate::platform::{Order, PlatformError, PlatformGateway};
use crate::supplier::{SupplierError, TrackingSource};

use super::plan::{plan_order, OrderPlan};
use super::types::{FailureStage, OrderOutcome, OrderResult, SyncReport};

/// Writes that reached the platform before an apply step stopped.
#[derive(Debug, Default)]
struct Applied {
    shipping_written: bool,
    comments_written: usize,
}

/// Applies supplier tracking to platform orders.
pub struct Reconciler {
    platform: Arc<dyn PlatformGateway>,
    filter: Arc<dyn OrderFilter>,
}

impl Reconciler {
    pub fn new(platform: Arc<dyn PlatformGateway>, filter: Arc<dyn OrderFilter>) -> Self {
        Self { platform, filter }
    }

    /// Run one supplier.
    ///
    /// Only a failure to list the supplier's orders is returned as an error;
    /// per-order problems end up in the report.
    pub async fn sync_supplier(
        &self,
        source: &dyn TrackingSource,
    ) -> Result<SyncReport, PlatformError> {
        let supplier = source.name().to_string();
        let mut report = SyncReport::new(&supplier);

        info!(
            supplier = %supplier,
            "Requesting all {} orders with 'Awaiting Tracking'", supplier
        );
        let listing = self.platform.awaiting_tracking(source.supplier_id()).await?;

        report.orders_found = listing.orders.len();
        report.orders_not_listed = listing
            .count
            .saturating_sub(listing.orders.len() as u64);
        if report.orders_not_listed > 0 {
            warn!(
                supplier = %supplier,
                count = listing.count,
                listed = listing.orders.len(),
                "Platform reports {} orders awaiting tracking but listed {}; the rest wait for a later run",
                listing.count,
                listing.orders.len()
            );
        }

        if listing.orders.is_empty() {
            info!(supplier = %supplier, "No orders returned. Nothing to do.");
            return Ok(report);
        }

        info!(
            supplier = %supplier,
            count = listing.count,
            "Found {} orders to process", listing.orders.len()
        );

        for order in &listing.orders {
            let outcome = self.process_order(source, order).await;
            report.results.push(OrderResult {
                order_number: order.order_number.clone(),
                outcome,
            });
        }

        info!(
            supplier = %supplier,
            reconciled = report.reconciled(),
            skipped = report.skipped(),
            no_records = report.without_records(),
            failed = report.failed(),
            "Finished getting tracking info from {}", supplier
        );

        Ok(report)
    }

    async fn process_order(&self, source: &dyn TrackingSource, order: &Order) -> OrderOutcome {
        let order_number = order.order_number.as_str();

        if self.filter.should_skip(order_number) {
            info!(order = order_number, policy = self.filter.policy_name(), "Skipping order");
            return OrderOutcome::Skipped;
        }

        info!(order = order_number, "Processing order");

        let batch = match source.fetch_tracking(order).await {
            Ok(batch) => batch,
            Err(e) => return supplier_failure(order_number, e),
        };

        if batch.is_empty() {
            info!(order = order_number, "No records received, skipping");
            return OrderOutcome::NoRecords;
        }

        info!(
            order = order_number,
            records = batch.records.len(),
            "Records received, checking for tracking info"
        );

        let plan = match plan_order(source.profile(), order, &batch.records) {
            Ok(plan) => plan,
            Err(e) => {
                error!(
                    order = order_number,
                    error = %e,
                    "Error parsing tracking info\nLast Response:\n{}",
                    batch.last_body.as_deref().unwrap_or("")
                );
                return OrderOutcome::Failed {
                    stage: FailureStage::Parse,
                    reason: e.to_string(),
                    shipping_written: false,
                    comments_written: 0,
                };
            }
        };

        for skipped in &plan.skipped {
            info!(
                order = order_number,
                record = skipped.position,
                "{}. Skipping.",
                skipped.reason.describe()
            );
        }

        let mut applied = Applied::default();
        if let Err(e) = self.apply_plan(order_number, &plan, &mut applied).await {
            warn!(order = order_number, error = %e, "Platform update failed, abandoning order");
            return OrderOutcome::Failed {
                stage: FailureStage::Platform,
                reason: e.to_string(),
                shipping_written: applied.shipping_written,
                comments_written: applied.comments_written,
            };
        }

        info!(order = order_number, "Finished applying tracking");

        OrderOutcome::Reconciled {
            primary: plan.shipping.as_ref().map(|m| m.tracking_number.clone()),
            comments: applied.comments_written,
            skipped_records: plan.skipped.len(),
        }
    }

    /// Issue the plan's writes: shipping info, tag removal, then comments.
    ///
    /// The tag is removed only after the shipping info was accepted.
    async fn apply_plan(
        &self,
        order_number: &str,
        plan: &OrderPlan,
        applied: &mut Applied,
    ) -> Result<(), PlatformError> {
        if let Some(metadata) = &plan.shipping {
            info!(
                order = order_number,
                tracking = %metadata.tracking_number,
                "Applying {} as official shipping method", metadata.tracking_number
            );
            debug!(order = order_number, metadata = ?metadata, "Shipping info");
            self.platform
                .post_shipping_metadata(order_number, metadata)
                .await?;
            applied.shipping_written = true;

            info!(order = order_number, "Removing 'Awaiting Tracking' tag");
            self.platform.clear_awaiting_tracking(order_number).await?;
        }

        for comment in &plan.comments {
            info!(
                order = order_number,
                tracking = %comment.tracking_number,
                "Applying {} in a comment", comment.tracking_number
            );
            self.platform.post_comment(order_number, &comment.text).await?;
            applied.comments_written += 1;
        }

        Ok(())
    }
}

fn supplier_failure(order_number: &str, e: SupplierError) -> OrderOutcome {
    let stage = match e {
        SupplierError::Malformed { .. } => FailureStage::Parse,
        _ => FailureStage::Supplier,
    };

    match e.raw_body() {
        Some(body) => error!(
            order = order_number,
            error = %e,
            "Error retrieving tracking info\nLast Response:\n{}", body
        ),
        None => error!(
            order = order_number,
            error = %e,
            "Unable to get tracking info from supplier. Skipping order."
        ),
    }

    OrderOutcome::Failed {
        stage,
        reason: e.to_string(),
        shipping_written: false,
        comments_written: 0,
    }
}
