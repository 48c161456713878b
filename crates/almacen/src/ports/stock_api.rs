//! Stock API Port
//!
//! Abstract interface for the warehouse backend. The backend owns every
//! stock rule; the client only reads projections and posts user actions.

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::models::{
    AdjustmentBody, ConsolidatedRecord, ItemRecord, PositionRecord, QuickAddBody, RemitoBody,
    SupplierRecord, TransferBody,
};

/// Backend calls used by the stock service
///
/// Implementations map non-success statuses to [`DomainError::Backend`]
/// (with the payload's message when present) and connection failures or
/// timeouts to [`DomainError::Transport`].
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Fetch every position with its stock entries
    async fn fetch_positions(&self) -> Result<Vec<PositionRecord>, DomainError>;

    /// Fetch per-item totals
    async fn fetch_consolidated_stock(&self) -> Result<Vec<ConsolidatedRecord>, DomainError>;

    /// Fetch item reference data
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, DomainError>;

    /// Fetch suppliers and clients
    async fn fetch_suppliers(&self) -> Result<Vec<SupplierRecord>, DomainError>;

    /// Move stock between positions
    async fn post_internal_transfer(&self, body: &TransferBody) -> Result<(), DomainError>;

    /// Add stock straight into a position
    async fn post_quick_add(&self, body: &QuickAddBody) -> Result<(), DomainError>;

    /// Correct the quantity held at a position
    async fn post_stock_adjustment(&self, body: &AdjustmentBody) -> Result<(), DomainError>;

    /// Register a goods receipt
    async fn post_remito(&self, body: &RemitoBody) -> Result<(), DomainError>;
}
