pub mod config;
pub mod mode;
pub mod platform;
pub mod reconcile;
pub mod supplier;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LoggingConfig,
    MeyerConfig, ModeConfig, PlatformConfig, SanitizedConfig, TawConfig,
};
pub use mode::{
    create_order_filter, ModeError, OrderFilter, ProductionFilter, RunMode, TestModeFilter,
};
pub use platform::{
    AwaitingOrders, Order, OrderComment, OrdoroClient, PlatformError, PlatformGateway,
    ShippingMetadata,
};
pub use reconcile::{
    plan_order, FailureStage, OrderOutcome, OrderPlan, OrderResult, PlanError, Reconciler,
    SyncReport,
};
pub use supplier::{
    MeyerClient, SupplierError, SupplierProfile, TawClient, TrackingBatch, TrackingRecord,
    TrackingSource,
};
