//! Supplier tracking adapters.
//!
//! Each supplier implements `TrackingSource`, turning its own wire format
//! into `TrackingRecord`s. How those records become platform writes is
//! described by the supplier's `SupplierProfile`.

mod marker;
mod meyer;
mod profile;
mod taw;
mod taw_parser;
mod types;

pub use marker::{extract_marker_id, marker_ids, MEYER_ORDER_MARKER};
pub use meyer::{MeyerClient, SalesTracking};
pub use profile::*;
pub use taw::TawClient;
pub use taw_parser::{parse_tracking_response, TawParseError};
pub use types::*;
