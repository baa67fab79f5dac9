//! Run mode selection and the per-order skip policy.

mod policy;
mod traits;
mod types;

pub use policy::*;
pub use traits::*;
pub use types::*;

use crate::config::ModeConfig;

/// Factory function to create the order filter for a run mode
pub fn create_order_filter(mode: RunMode, config: &ModeConfig) -> Box<dyn OrderFilter> {
    match mode {
        RunMode::Test => Box::new(TestModeFilter::new(config.test_orders.iter().cloned())),
        RunMode::Production => {
            Box::new(ProductionFilter::new(config.excluded_orders.iter().cloned()))
        }
    }
}
