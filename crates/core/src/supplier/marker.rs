//! Supplier order ids embedded in platform comments.
//!
//! A marker comment contains [`MEYER_ORDER_MARKER`] and carries the Meyer
//! order id after the first `:`, e.g. `[SR-MID]: 778899`.

use crate::platform::OrderComment;

/// Token identifying a comment that carries a Meyer order id.
pub const MEYER_ORDER_MARKER: &str = "[SR-MID]";

/// Extract the supplier order id from one comment.
///
/// Returns `None` when the comment has no marker, no `:` or an empty id.
/// The id ends at the next `:` if there is one.
pub fn extract_marker_id(text: &str, marker: &str) -> Option<String> {
    if !text.contains(marker) {
        return None;
    }
    let id = text.split(':').nth(1)?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// All marker ids on an order, in comment order.
pub fn marker_ids(comments: &[OrderComment], marker: &str) -> Vec<String> {
    comments
        .iter()
        .filter_map(|c| extract_marker_id(&c.text, marker))
        .collect()
}
