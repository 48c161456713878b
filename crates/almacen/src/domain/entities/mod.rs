//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Position: storage location with its stock entries
//! - StockEntry: item quantity (kilos/units) of one lot at a position
//! - Item / Supplier: reference data
//! - ConsolidatedStock: per-item totals
//! - InternalTransfer / QuickAdd / StockAdjustment: stock-affecting actions
//! - Remito: goods receipt

mod consolidated;
mod item;
mod movement;
mod position;
mod remito;
mod stock_entry;
mod supplier;

pub use consolidated::*;
pub use item::*;
pub use movement::*;
pub use position::*;
pub use remito::*;
pub use stock_entry::*;
pub use supplier::*;
