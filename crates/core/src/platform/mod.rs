//! Order-management platform integration.
//!
//! The reconciliation engine only talks to the platform through the
//! `PlatformGateway` trait; `OrdoroClient` is the HTTP implementation.

mod ordoro;
mod types;

pub use ordoro::OrdoroClient;
pub use types::*;
