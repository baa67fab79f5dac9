use std::collections::HashSet;

use super::OrderFilter;

/// Test-mode filter: only allow-listed orders are processed
pub struct TestModeFilter {
    allowed: HashSet<String>,
}

impl TestModeFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl OrderFilter for TestModeFilter {
    fn should_skip(&self, order_number: &str) -> bool {
        !self.allowed.contains(order_number)
    }

    fn policy_name(&self) -> &'static str {
        "test"
    }
}

/// Production filter: everything except the exclusion list
pub struct ProductionFilter {
    excluded: HashSet<String>,
}

impl ProductionFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }
}

impl OrderFilter for ProductionFilter {
    fn should_skip(&self, order_number: &str) -> bool {
        self.excluded.contains(order_number)
    }

    fn policy_name(&self) -> &'static str {
        "production"
    }
}
