//! Per-supplier rules for turning tracking records into platform writes.

/// Shipping method recorded for every supplier.
pub const SHIPPING_METHOD: &str = "ground";

/// Shipping cost recorded for Meyer orders.
pub const MEYER_SHIPPING_COST: u32 = 13;

/// Shipping cost recorded for TAW orders.
pub const TAW_SHIPPING_COST: u32 = 14;

/// Date format TAW uses for `OrderDate`.
pub const TAW_ORDER_DATE_FORMAT: &str = "%m/%d/%Y";

/// Which record may become the order's official shipping info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimarySelection {
    /// The first usable record in arrival order.
    FirstValid,
    /// Only the very first record; if it is unusable the order gets no
    /// shipping info this run.
    FirstRecord,
}

/// Where the ship date comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipDateSource {
    /// The platform order's placed date.
    OrderPlaced,
    /// The record's `order_date`, parsed with the given chrono format, at
    /// UTC midnight.
    RecordDate { format: &'static str },
}

/// How supplementary tracking comments are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentLayout {
    SingleLine,
    MultiLine,
}

/// Normalization rules for one supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierProfile {
    pub name: String,
    pub cost: u32,
    pub primary: PrimarySelection,
    pub ship_date: ShipDateSource,
    /// Carrier used when records do not report one.
    pub default_carrier: Option<String>,
    /// Label for the supplier reference in comments.
    pub reference_label: &'static str,
    pub comment_layout: CommentLayout,
}

impl SupplierProfile {
    /// Meyer: JSON records without carrier or dates.
    pub fn meyer(carrier: impl Into<String>) -> Self {
        Self {
            name: "Meyer".to_string(),
            cost: MEYER_SHIPPING_COST,
            primary: PrimarySelection::FirstValid,
            ship_date: ShipDateSource::OrderPlaced,
            default_carrier: Some(carrier.into()),
            reference_label: "Order ID",
            comment_layout: CommentLayout::SingleLine,
        }
    }

    /// TAW: XML records carrying carrier, invoice and order date.
    pub fn taw() -> Self {
        Self {
            name: "TAW".to_string(),
            cost: TAW_SHIPPING_COST,
            primary: PrimarySelection::FirstRecord,
            ship_date: ShipDateSource::RecordDate {
                format: TAW_ORDER_DATE_FORMAT,
            },
            default_carrier: None,
            reference_label: "TAW Order ID",
            comment_layout: CommentLayout::MultiLine,
        }
    }

    /// Comment text for a supplementary tracking number.
    pub fn comment_text(&self, reference: &str, tracking_number: &str) -> String {
        match self.comment_layout {
            CommentLayout::SingleLine => format!(
                "Additional tracking information: {}: {} Tracking Number: {}",
                self.reference_label, reference, tracking_number
            ),
            CommentLayout::MultiLine => format!(
                "Additional tracking information:\n{}: {}\nTracking Number: {}",
                self.reference_label, reference, tracking_number
            ),
        }
    }
}
