//! Reconciliation of supplier tracking into platform orders.
//!
//! `plan` decides what to write for one order; `Reconciler` fetches,
//! plans and applies, one order at a time.

mod engine;
mod plan;
mod types;

pub use engine::Reconciler;
pub use plan::{
    parse_supplier_date, plan_order, OrderPlan, PlanError, PlannedComment, SkipReason,
    SkippedRecord,
};
pub use types::*;
