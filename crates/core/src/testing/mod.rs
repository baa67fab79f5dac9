//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the platform and supplier
//! traits, allowing reconciliation runs to be tested without real services.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tracksync_core::testing::{fixtures, MockPlatform, MockTrackingSource};
//! use tracksync_core::{ProductionFilter, Reconciler, SupplierProfile};
//!
//! let platform = Arc::new(MockPlatform::new());
//! platform.set_orders(22, vec![fixtures::order("PO-1", &[])]).await;
//!
//! let taw = MockTrackingSource::new(22, SupplierProfile::taw());
//! taw.set_records("PO-1", vec![fixtures::taw_record("1Z1", "03/05/2024", "UPS", "INV-1")]).await;
//!
//! let engine = Reconciler::new(platform.clone(), Arc::new(ProductionFilter::new(Vec::<String>::new())));
//! let report = engine.sync_supplier(&taw).await?;
//! ```

mod mock_platform;
mod mock_tracking_source;

pub use mock_platform::{MockPlatform, PlatformCall, PlatformOp};
pub use mock_tracking_source::MockTrackingSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::platform::{Order, OrderComment};
    use crate::supplier::{TrackingRecord, MEYER_ORDER_MARKER};

    /// Placed date carried by [`order`].
    pub const PLACED_DATE: &str = "2024-03-05T14:22:01Z";

    /// Create a platform order placed 2024-03-05 14:22:01 UTC.
    pub fn order(order_number: &str, comments: &[&str]) -> Order {
        Order {
            order_number: order_number.to_string(),
            order_placed_date: Some(PLACED_DATE.to_string()),
            comments: comments
                .iter()
                .map(|text| OrderComment {
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    /// Comment text carrying a Meyer order id.
    pub fn marker_comment(meyer_order_id: &str) -> String {
        format!("{}: {}", MEYER_ORDER_MARKER, meyer_order_id)
    }

    /// A TAW-shaped tracking record.
    pub fn taw_record(
        tracking_number: &str,
        order_date: &str,
        carrier: &str,
        invoice_number: &str,
    ) -> TrackingRecord {
        TrackingRecord::new(tracking_number)
            .with_order_date(order_date)
            .with_carrier(carrier)
            .with_reference(invoice_number)
    }

    /// A TAW `GetTrackingInfo` body from
    /// (TrackNum, OrderDate, Type, InvoiceNumber) tuples.
    pub fn taw_response(records: &[(&str, &str, &str, &str)]) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<TrackingInfo>\n");
        for (track_num, order_date, carrier, invoice) in records {
            xml.push_str(&format!(
                "  <Record>\n    <TrackNum>{}</TrackNum>\n    <OrderDate>{}</OrderDate>\n    \
                 <Type>{}</Type>\n    <InvoiceNumber>{}</InvoiceNumber>\n  </Record>\n",
                track_num, order_date, carrier, invoice
            ));
        }
        xml.push_str("</TrackingInfo>\n");
        xml
    }
}
