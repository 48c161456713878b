//! Domain Services
//!
//! Stateless logic over domain entities: the optimistic position cache,
//! search filters and local validation.

mod search;
mod stock_cache;
mod validation;

pub use search::*;
pub use stock_cache::*;
pub use validation::*;
