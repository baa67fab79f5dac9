//! Turning one order's tracking records into platform writes.
//!
//! Planning is pure: it decides which record becomes the official shipping
//! info, which become comments and which are dropped, without touching the
//! platform.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::platform::{Order, ShippingMetadata};
use crate::supplier::{
    PrimarySelection, ShipDateSource, SupplierProfile, TrackingRecord, SHIPPING_METHOD,
};

/// Why a record produced no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTrackingNumber,
    MissingCarrier,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::MissingTrackingNumber => "No tracking number found",
            SkipReason::MissingCarrier => "No vendor found",
        }
    }
}

/// A record that was dropped, 1-indexed in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub position: usize,
    pub reason: SkipReason,
}

/// A supplementary tracking number to post as a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedComment {
    pub position: usize,
    pub tracking_number: String,
    pub text: String,
}

/// Writes decided for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPlan {
    pub shipping: Option<ShippingMetadata>,
    pub comments: Vec<PlannedComment>,
    pub skipped: Vec<SkippedRecord>,
}

impl OrderPlan {
    pub fn has_writes(&self) -> bool {
        self.shipping.is_some() || !self.comments.is_empty()
    }
}

/// The records cannot be trusted; the order is abandoned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("record {position} has no {field}")]
    MissingField {
        position: usize,
        field: &'static str,
    },

    #[error("record {position} has an unreadable order date '{value}'")]
    InvalidOrderDate { position: usize, value: String },

    #[error("order has an unreadable placed date '{value}'")]
    InvalidPlacedDate { value: String },
}

enum PrimaryCandidate {
    Accepted(ShippingMetadata),
    Rejected(SkipReason),
}

/// Plan the writes for `order` from its records, in arrival order.
///
/// The primary slot is order-scoped and strictly first-come: under
/// `FirstValid` it stays open until a usable record arrives, under
/// `FirstRecord` only record 1 may fill it.
pub fn plan_order(
    profile: &SupplierProfile,
    order: &Order,
    records: &[TrackingRecord],
) -> Result<OrderPlan, PlanError> {
    let mut plan = OrderPlan::default();
    let mut primary_open = true;

    for (index, record) in records.iter().enumerate() {
        let position = index + 1;

        if primary_open {
            if profile.primary == PrimarySelection::FirstRecord {
                primary_open = false;
            }
            match primary_candidate(profile, order, record, position)? {
                PrimaryCandidate::Accepted(metadata) => {
                    plan.shipping = Some(metadata);
                    primary_open = false;
                }
                PrimaryCandidate::Rejected(reason) => {
                    plan.skipped.push(SkippedRecord { position, reason });
                }
            }
            continue;
        }

        let reference = record
            .reference
            .as_deref()
            .ok_or(PlanError::MissingField {
                position,
                field: "reference",
            })?;

        if !record.has_tracking() {
            plan.skipped.push(SkippedRecord {
                position,
                reason: SkipReason::MissingTrackingNumber,
            });
            continue;
        }

        plan.comments.push(PlannedComment {
            position,
            tracking_number: record.tracking_number.clone(),
            text: profile.comment_text(reference, &record.tracking_number),
        });
    }

    Ok(plan)
}

fn primary_candidate(
    profile: &SupplierProfile,
    order: &Order,
    record: &TrackingRecord,
    position: usize,
) -> Result<PrimaryCandidate, PlanError> {
    if !record.has_tracking() {
        return Ok(PrimaryCandidate::Rejected(SkipReason::MissingTrackingNumber));
    }

    let ship_date = ship_date(profile, order, record, position)?;

    let carrier = record
        .carrier
        .clone()
        .or_else(|| profile.default_carrier.clone())
        .ok_or(PlanError::MissingField {
            position,
            field: "carrier",
        })?;
    if carrier.trim().is_empty() {
        return Ok(PrimaryCandidate::Rejected(SkipReason::MissingCarrier));
    }

    Ok(PrimaryCandidate::Accepted(ShippingMetadata {
        tracking_number: record.tracking_number.clone(),
        ship_date,
        carrier_name: carrier.trim().to_string(),
        shipping_method: SHIPPING_METHOD.to_string(),
        cost: profile.cost,
    }))
}

fn ship_date(
    profile: &SupplierProfile,
    order: &Order,
    record: &TrackingRecord,
    position: usize,
) -> Result<DateTime<Utc>, PlanError> {
    match &profile.ship_date {
        ShipDateSource::OrderPlaced => {
            let raw = order
                .order_placed_date
                .as_deref()
                .ok_or(PlanError::MissingField {
                    position,
                    field: "order placed date",
                })?;
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| PlanError::InvalidPlacedDate {
                    value: raw.to_string(),
                })
        }
        ShipDateSource::RecordDate { format } => {
            let raw = record.order_date.as_deref().ok_or(PlanError::MissingField {
                position,
                field: "order date",
            })?;
            parse_supplier_date(raw, format).ok_or_else(|| PlanError::InvalidOrderDate {
                position,
                value: raw.to_string(),
            })
        }
    }
}

/// Parse a supplier-local date to UTC midnight.
pub fn parse_supplier_date(raw: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::format_ship_date;
    use crate::supplier::TAW_ORDER_DATE_FORMAT;

    fn order() -> Order {
        Order {
            order_number: "O-1".to_string(),
            order_placed_date: Some("2024-03-05T08:22:01-06:00".to_string()),
            comments: vec![],
        }
    }

    fn meyer(tn: &str, id: &str) -> TrackingRecord {
        TrackingRecord::new(tn).with_reference(id)
    }

    fn taw(tn: &str, date: &str, carrier: &str, invoice: &str) -> TrackingRecord {
        TrackingRecord::new(tn)
            .with_order_date(date)
            .with_carrier(carrier)
            .with_reference(invoice)
    }

    #[test]
    fn test_meyer_first_record_is_primary_rest_are_comments() {
        let profile = SupplierProfile::meyer("UPS");
        let plan = plan_order(
            &profile,
            &order(),
            &[meyer("1Z1", "M-42"), meyer("1Z2", "M-42")],
        )
        .unwrap();

        let shipping = plan.shipping.unwrap();
        assert_eq!(shipping.tracking_number, "1Z1");
        assert_eq!(shipping.carrier_name, "UPS");
        assert_eq!(shipping.shipping_method, "ground");
        assert_eq!(shipping.cost, 13);
        assert_eq!(shipping.ship_date_iso(), "2024-03-05T14:22:01.000Z");

        assert_eq!(plan.comments.len(), 1);
        assert_eq!(plan.comments[0].tracking_number, "1Z2");
        assert!(plan.comments[0].text.contains("M-42"));
        assert!(plan.comments[0].text.contains("1Z2"));
    }

    #[test]
    fn test_meyer_counter_spans_markers() {
        let profile = SupplierProfile::meyer("UPS");
        let records = [meyer("1Z1", "A"), meyer("2Z1", "B"), meyer("2Z2", "B")];
        let plan = plan_order(&profile, &order(), &records).unwrap();

        assert_eq!(plan.shipping.unwrap().tracking_number, "1Z1");
        let comments: Vec<_> = plan.comments.iter().map(|c| c.tracking_number.as_str()).collect();
        assert_eq!(comments, vec!["2Z1", "2Z2"]);
        assert!(plan.comments[0].text.contains("Order ID: B"));
    }

    #[test]
    fn test_meyer_blank_first_record_leaves_primary_open() {
        let profile = SupplierProfile::meyer("UPS");
        let records = [meyer("", "A"), meyer("1Z2", "A"), meyer("1Z3", "A")];
        let plan = plan_order(&profile, &order(), &records).unwrap();

        assert_eq!(plan.shipping.unwrap().tracking_number, "1Z2");
        assert_eq!(plan.comments.len(), 1);
        assert_eq!(
            plan.skipped,
            vec![SkippedRecord {
                position: 1,
                reason: SkipReason::MissingTrackingNumber
            }]
        );
    }

    #[test]
    fn test_meyer_requires_placed_date() {
        let mut order = order();
        order.order_placed_date = None;
        let err = plan_order(&SupplierProfile::meyer("UPS"), &order, &[meyer("1Z1", "A")])
            .unwrap_err();
        assert!(matches!(err, PlanError::MissingField { position: 1, .. }));
    }

    #[test]
    fn test_meyer_unreadable_placed_date_is_plan_error() {
        let mut order = order();
        order.order_placed_date = Some("2024-03-05 14:22:01".to_string());
        let err = plan_order(&SupplierProfile::meyer("UPS"), &order, &[meyer("1Z1", "A")])
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidPlacedDate {
                value: "2024-03-05 14:22:01".to_string()
            }
        );
    }

    #[test]
    fn test_taw_ignores_unreadable_placed_date() {
        let mut order = order();
        order.order_placed_date = Some("not a date".to_string());
        let plan = plan_order(
            &SupplierProfile::taw(),
            &order,
            &[taw("1Z1", "03/05/2024", "UPS", "INV-1")],
        )
        .unwrap();
        assert_eq!(plan.shipping.unwrap().tracking_number, "1Z1");
    }

    #[test]
    fn test_taw_primary_uses_record_date_at_midnight() {
        let plan = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[taw("1Z1", "03/05/2024", "FedEx", "INV-1")],
        )
        .unwrap();

        let shipping = plan.shipping.unwrap();
        assert_eq!(shipping.ship_date_iso(), "2024-03-05T00:00:00.000Z");
        assert_eq!(shipping.carrier_name, "FedEx");
        assert_eq!(shipping.cost, 14);
    }

    #[test]
    fn test_taw_blank_first_record_exhausts_primary() {
        let plan = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[
                taw("", "03/05/2024", "UPS", "INV-1"),
                taw("1Z2", "03/05/2024", "UPS", "INV-2"),
            ],
        )
        .unwrap();

        assert!(plan.shipping.is_none());
        assert_eq!(plan.comments.len(), 1);
        assert_eq!(plan.comments[0].tracking_number, "1Z2");
        assert!(plan.comments[0].text.contains("INV-2"));
    }

    #[test]
    fn test_taw_blank_carrier_exhausts_primary() {
        let plan = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[
                taw("1Z1", "03/05/2024", "  ", "INV-1"),
                taw("1Z2", "03/05/2024", "UPS", "INV-2"),
            ],
        )
        .unwrap();

        assert!(plan.shipping.is_none());
        assert_eq!(plan.skipped[0].reason, SkipReason::MissingCarrier);
        assert_eq!(plan.comments.len(), 1);
    }

    #[test]
    fn test_taw_blank_supplementary_tracking_is_skipped() {
        let plan = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[
                taw("1Z1", "03/05/2024", "UPS", "INV-1"),
                taw(" ", "", "", "INV-2"),
                taw("1Z3", "", "", "INV-3"),
            ],
        )
        .unwrap();

        assert_eq!(plan.shipping.unwrap().tracking_number, "1Z1");
        assert_eq!(plan.comments.len(), 1);
        assert_eq!(plan.comments[0].position, 3);
        assert_eq!(plan.skipped[0].position, 2);
    }

    #[test]
    fn test_taw_bad_date_abandons_order() {
        let err = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[taw("1Z1", "2024-03-05", "UPS", "INV-1")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidOrderDate {
                position: 1,
                value: "2024-03-05".to_string()
            }
        );
    }

    #[test]
    fn test_taw_missing_carrier_element_abandons_order() {
        let record = TrackingRecord::new("1Z1")
            .with_order_date("03/05/2024")
            .with_reference("INV-1");
        let err = plan_order(&SupplierProfile::taw(), &order(), &[record]).unwrap_err();
        assert!(matches!(err, PlanError::MissingField { field: "carrier", .. }));
    }

    #[test]
    fn test_taw_missing_invoice_abandons_order() {
        let second = TrackingRecord::new("1Z2");
        let err = plan_order(
            &SupplierProfile::taw(),
            &order(),
            &[taw("1Z1", "03/05/2024", "UPS", "INV-1"), second],
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::MissingField { position: 2, .. }));
    }

    #[test]
    fn test_no_records_no_writes() {
        let plan = plan_order(&SupplierProfile::taw(), &order(), &[]).unwrap();
        assert!(!plan.has_writes());
    }

    #[test]
    fn test_same_primary_record_same_metadata() {
        let profile = SupplierProfile::taw();
        let records = [taw("1Z1", "03/05/2024", "UPS", "INV-1")];
        let first = plan_order(&profile, &order(), &records).unwrap();
        let second = plan_order(&profile, &order(), &records).unwrap();
        assert_eq!(first.shipping, second.shipping);
    }

    #[test]
    fn test_parse_supplier_date_accepts_unpadded() {
        let date = parse_supplier_date("3/5/2024", TAW_ORDER_DATE_FORMAT).unwrap();
        assert_eq!(format_ship_date(&date), "2024-03-05T00:00:00.000Z");
        assert!(parse_supplier_date("13/45/2024", TAW_ORDER_DATE_FORMAT).is_none());
    }
}
