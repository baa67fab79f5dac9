//! Outcome types for a reconciliation run.

use serde::Serialize;

/// Where an order's processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The supplier could not be reached or answered with an HTTP error.
    Supplier,
    /// The supplier's answer could not be understood.
    Parse,
    /// A platform write failed.
    Platform,
}

/// What happened to one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OrderOutcome {
    /// Left alone by the run mode; no supplier request was made.
    Skipped,
    /// The supplier had nothing for the order.
    NoRecords,
    /// Records were processed. `primary` is the tracking number written as
    /// shipping info, if any.
    Reconciled {
        primary: Option<String>,
        comments: usize,
        skipped_records: usize,
    },
    /// Processing was abandoned. Writes issued before the failure are kept.
    Failed {
        stage: FailureStage,
        reason: String,
        shipping_written: bool,
        comments_written: usize,
    },
}

impl OrderOutcome {
    fn shipping_writes(&self) -> usize {
        match self {
            OrderOutcome::Reconciled {
                primary: Some(_), ..
            } => 1,
            OrderOutcome::Failed {
                shipping_written: true,
                ..
            } => 1,
            _ => 0,
        }
    }

    fn comment_writes(&self) -> usize {
        match self {
            OrderOutcome::Reconciled { comments, .. } => *comments,
            OrderOutcome::Failed {
                comments_written, ..
            } => *comments_written,
            _ => 0,
        }
    }
}

/// Outcome for one order number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderResult {
    pub order_number: String,
    #[serde(flatten)]
    pub outcome: OrderOutcome,
}

/// Summary of one supplier run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub supplier: String,
    /// Orders returned by the platform for this supplier.
    pub orders_found: usize,
    /// Orders the platform counted but left out of the listing page.
    pub orders_not_listed: u64,
    /// Per-order results, in processing order.
    pub results: Vec<OrderResult>,
}

impl SyncReport {
    pub fn new(supplier: impl Into<String>) -> Self {
        Self {
            supplier: supplier.into(),
            ..Default::default()
        }
    }

    pub fn outcome_for(&self, order_number: &str) -> Option<&OrderOutcome> {
        self.results
            .iter()
            .find(|r| r.order_number == order_number)
            .map(|r| &r.outcome)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, OrderOutcome::Skipped))
    }

    pub fn without_records(&self) -> usize {
        self.count(|o| matches!(o, OrderOutcome::NoRecords))
    }

    pub fn reconciled(&self) -> usize {
        self.count(|o| matches!(o, OrderOutcome::Reconciled { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, OrderOutcome::Failed { .. }))
    }

    /// Shipping info writes that succeeded (each followed by a tag clear
    /// attempt).
    pub fn shipping_writes(&self) -> usize {
        self.results.iter().map(|r| r.outcome.shipping_writes()).sum()
    }

    pub fn comment_writes(&self) -> usize {
        self.results.iter().map(|r| r.outcome.comment_writes()).sum()
    }

    fn count(&self, pred: impl Fn(&OrderOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}
