/// Decides which awaiting orders a run may touch.
///
/// Consulted before any supplier request is made for an order.
pub trait OrderFilter: Send + Sync {
    /// Returns true when the order must be left alone this run
    fn should_skip(&self, order_number: &str) -> bool;

    /// Name of this policy
    fn policy_name(&self) -> &'static str;
}
