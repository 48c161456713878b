//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod placement;
mod supplier_role;

pub use placement::*;
pub use supplier_role::*;
