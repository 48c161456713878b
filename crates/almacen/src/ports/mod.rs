//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the stock service reaches the
//! outside world: the warehouse backend and the user.
//!
//! Implementations of these traits live in the front-end crates.

mod notifier;
mod stock_api;

// Re-exports
pub use notifier::*;
pub use stock_api::*;
