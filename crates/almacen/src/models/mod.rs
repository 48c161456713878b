//! Wire Models
//!
//! JSON shapes exchanged with the warehouse backend, and their conversion
//! into domain types.
//! - Position records: positions with their stock, overlapping placement fields
//! - Reference records: items, suppliers, consolidated stock
//! - Request bodies: transfers, quick adds, adjustments, remitos
//! - Error body: backend error payload

mod error;
mod position;
mod reference;
mod requests;

pub use error::*;
pub use position::*;
pub use reference::*;
pub use requests::*;
