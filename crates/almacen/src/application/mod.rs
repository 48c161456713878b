//! Application Services (Use Cases)
//!
//! Orchestrate the domain cache, validation and the ports.

mod scheduler;
pub(crate) mod stock_service;

pub use scheduler::*;
pub use stock_service::*;
