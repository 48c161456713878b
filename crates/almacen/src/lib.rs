//! Almacen Domain Library
//!
//! Core types and services for the warehouse stock client: an optimistic
//! cache of positions and their stock, search filters, and the ports through
//! which the client reaches the warehouse backend and the user.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: Position, StockEntry, Item, Supplier, Remito, movements
//!   - `value_objects/`: Placement, Level, SupplierRole
//!   - `services/`: PositionCache, search filters, validation
//!   - `errors/`: DomainError
//!
//! - **Wire Models** (`models/`): backend JSON records and request bodies
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `StockApi`: the warehouse REST backend
//!   - `Notifier`: user-facing outcome messages
//!
//! - **Application** (`application/`): StockService and its refresh scheduler
//!
//! # Usage
//!
//! ```rust,ignore
//! use almacen::{StockService, PlacementCriteria};
//!
//! let mut service = StockService::new(api, notifier, None);
//! service.ensure_fresh().await?;
//! let hits = service.search_positions("nylon negro", &PlacementCriteria::default());
//! ```

pub mod application;
pub mod domain;
pub mod models;
pub mod ports;

// Re-export commonly used types
pub use application::{CacheConfig, RefreshConfig, RefreshScheduler, StockService};
pub use domain::{
    filter_by_placement, filter_by_search, filter_records, AdjustmentDirection,
    ConsolidatedStock, DomainError, InternalTransfer, Item, Level, Placement, PlacementCriteria,
    Position, PositionCache, QuickAdd, Remito, RemitoLine, Searchable, StockAdjustment,
    StockEntry, StockMutation, StockRow, Supplier, SupplierRef, SupplierRole,
    FALLBACK_ERROR_MESSAGE,
};
pub use ports::{Notification, NotificationLevel, Notifier, StockApi};
