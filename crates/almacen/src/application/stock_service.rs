//! Stock Application Service (Use Case)
//!
//! Owns the position cache and runs every stock-affecting user action as
//! apply → request → confirm-or-rollback.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    filter_by_search, filter_records, validate_adjustment, validate_quick_add, validate_remito,
    validate_transfer, AdjustmentDirection, ConsolidatedStock, DomainError, InternalTransfer,
    Item, PlacementCriteria, Position, PositionCache, QuickAdd, Remito, StockAdjustment,
    StockMutation, StockRow, Supplier,
};
use crate::models::{ingest_positions, AdjustmentBody, QuickAddBody, RemitoBody, TransferBody};
use crate::ports::{Notification, Notifier, StockApi};

/// Cache freshness settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Age after which the position list is refetched
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Application service for positions and stock
pub struct StockService<A: StockApi, N: Notifier> {
    api: Arc<A>,
    notifier: Arc<N>,
    config: CacheConfig,
    cache: PositionCache,
    fetched_at: Option<DateTime<Utc>>,
    consolidated: Option<Vec<ConsolidatedStock>>,
    suppliers: Option<Vec<Supplier>>,
}

impl<A: StockApi, N: Notifier> StockService<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>, config: Option<CacheConfig>) -> Self {
        Self {
            api,
            notifier,
            config: config.unwrap_or_default(),
            cache: PositionCache::default(),
            fetched_at: None,
            consolidated: None,
            suppliers: None,
        }
    }

    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    pub fn positions(&self) -> &[Position] {
        self.cache.positions()
    }

    pub fn position(&self, position_id: &str) -> Option<&Position> {
        self.cache.position(position_id)
    }

    /// One row per cached stock entry
    pub fn stock_rows(&self) -> Vec<StockRow> {
        self.cache.positions().iter().flat_map(Position::rows).collect()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    // ============================================
    // Refresh policy
    // ============================================

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    /// Stale when never fetched or when the TTL has elapsed at `now`
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        let Some(fetched_at) = self.fetched_at else {
            return true;
        };
        let ttl = chrono::Duration::from_std(self.config.ttl).unwrap_or(chrono::Duration::MAX);
        now - fetched_at >= ttl
    }

    /// Mark the position list stale so the next check refetches it
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Refetch every position and replace the cache
    pub async fn refresh(&mut self) -> Result<usize, DomainError> {
        let records = self.api.fetch_positions().await?;
        let received = records.len();
        let positions = ingest_positions(records);

        tracing::info!(
            "Position cache refreshed ({} positions, {} skipped)",
            positions.len(),
            received - positions.len()
        );

        let count = positions.len();
        self.cache.replace_all(positions);
        self.fetched_at = Some(Utc::now());
        Ok(count)
    }

    /// Refetch only when stale; returns whether a fetch happened
    pub async fn ensure_fresh(&mut self) -> Result<bool, DomainError> {
        if !self.is_stale() {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Refetch regardless of age and drop the secondary caches
    pub async fn force_refresh(&mut self) -> Result<usize, DomainError> {
        self.consolidated = None;
        self.suppliers = None;
        self.refresh().await
    }

    // ============================================
    // Queries
    // ============================================

    /// Positions matching a free-text term and placement criteria
    pub fn search_positions(&self, term: &str, criteria: &PlacementCriteria) -> Vec<&Position> {
        filter_records(self.cache.positions(), term, criteria)
    }

    /// Stock rows matching a free-text term and placement criteria
    pub fn search_stock(&self, term: &str, criteria: &PlacementCriteria) -> Vec<StockRow> {
        filter_records(self.stock_rows(), term, criteria)
    }

    /// Per-item totals, fetched once and kept until a write or force refresh
    ///
    /// When the fetch fails and positions are cached, totals are derived from
    /// the cache instead. Derived totals are not kept, so the next call asks
    /// the backend again.
    pub async fn consolidated_stock(&mut self) -> Result<Vec<ConsolidatedStock>, DomainError> {
        if let Some(totals) = &self.consolidated {
            return Ok(totals.clone());
        }

        match self.api.fetch_consolidated_stock().await {
            Ok(records) => {
                let totals: Vec<ConsolidatedStock> =
                    records.into_iter().map(ConsolidatedStock::from).collect();
                self.consolidated = Some(totals.clone());
                Ok(totals)
            }
            Err(e) if self.fetched_at.is_some() => {
                tracing::warn!("Consolidated stock unavailable, deriving from cache: {}", e);
                Ok(ConsolidatedStock::from_positions(self.cache.positions()))
            }
            Err(e) => Err(e),
        }
    }

    /// Suppliers and clients, fetched once and kept until a force refresh
    pub async fn suppliers(&mut self) -> Result<&[Supplier], DomainError> {
        if self.suppliers.is_none() {
            let records = self.api.fetch_suppliers().await?;
            self.suppliers = Some(records.into_iter().map(Supplier::from).collect());
        }
        Ok(self.suppliers.as_deref().unwrap_or_default())
    }

    /// Items matching a free-text term (not cached)
    pub async fn items(&self, term: &str) -> Result<Vec<Item>, DomainError> {
        let records = self.api.fetch_items().await?;
        Ok(filter_by_search(records.into_iter().map(Item::from), term))
    }

    // ============================================
    // Stock-affecting actions
    // ============================================

    pub async fn internal_transfer(
        &mut self,
        transfer: &InternalTransfer,
    ) -> Result<(), DomainError> {
        self.check(validate_transfer(transfer, &self.cache))?;

        let transfer = InternalTransfer {
            partition: self.cache.resolve_partition(
                &transfer.from_position_id,
                &transfer.item_id,
                transfer.partition.as_deref(),
            ),
            ..transfer.clone()
        };
        let mutation = StockMutation::Move {
            from_position_id: transfer.from_position_id.clone(),
            to_position_id: transfer.to_position_id.clone(),
            item_id: transfer.item_id.clone(),
            partition: transfer.partition.clone(),
            kilos: transfer.kilos,
            units: transfer.units,
        };
        let message = format!(
            "Moved {} to {}",
            transfer.item_id,
            self.title_of(&transfer.to_position_id)
        );
        let api = Arc::clone(&self.api);
        let body = TransferBody::from(&transfer);

        self.optimistic(
            mutation,
            async move { api.post_internal_transfer(&body).await },
            false,
            message,
        )
        .await
    }

    /// Quick add; without a partition the item's existing lot at the position is topped up
    pub async fn quick_add(&mut self, add: &QuickAdd) -> Result<(), DomainError> {
        self.check(validate_quick_add(add))?;

        let mut add = add.clone();
        add.entry.partition = self.cache.resolve_partition(
            &add.position_id,
            &add.entry.item_id,
            add.entry.partition.as_deref(),
        );
        let mutation = StockMutation::Add {
            position_id: add.position_id.clone(),
            entry: add.entry.clone(),
        };
        let message = format!(
            "Added {} to {}",
            add.entry.item_id,
            self.title_of(&add.position_id)
        );
        let api = Arc::clone(&self.api);
        let body = QuickAddBody::from(&add);

        self.optimistic(
            mutation,
            async move { api.post_quick_add(&body).await },
            true,
            message,
        )
        .await
    }

    pub async fn adjust_stock(&mut self, adjustment: &StockAdjustment) -> Result<(), DomainError> {
        self.check(validate_adjustment(adjustment, &self.cache))?;

        let adjustment = StockAdjustment {
            partition: self.cache.resolve_partition(
                &adjustment.position_id,
                &adjustment.item_id,
                adjustment.partition.as_deref(),
            ),
            ..adjustment.clone()
        };
        let mutation = match adjustment.direction {
            AdjustmentDirection::Increase => {
                let existing = self
                    .cache
                    .position(&adjustment.position_id)
                    .and_then(|p| {
                        p.entry_for(&adjustment.item_id, adjustment.partition.as_deref())
                    })
                    .ok_or_else(|| DomainError::not_found("Item", &adjustment.item_id))?;
                StockMutation::Add {
                    position_id: adjustment.position_id.clone(),
                    entry: existing.with_amounts(adjustment.kilos, adjustment.units),
                }
            }
            AdjustmentDirection::Decrease => StockMutation::Remove {
                position_id: adjustment.position_id.clone(),
                item_id: adjustment.item_id.clone(),
                partition: adjustment.partition.clone(),
                kilos: adjustment.kilos,
                units: adjustment.units,
            },
        };
        let message = format!(
            "Adjusted {} at {} ({})",
            adjustment.item_id,
            self.title_of(&adjustment.position_id),
            adjustment.direction
        );
        let api = Arc::clone(&self.api);
        let body = AdjustmentBody::from(&adjustment);

        self.optimistic(
            mutation,
            async move { api.post_stock_adjustment(&body).await },
            true,
            message,
        )
        .await
    }

    /// Register a remito
    ///
    /// Not optimistic: where the goods land is decided server-side, so a
    /// successful receipt marks the position list stale instead.
    pub async fn receive_remito(&mut self, remito: &Remito) -> Result<(), DomainError> {
        let suppliers = match self.suppliers().await {
            Ok(suppliers) => suppliers.to_vec(),
            Err(e) => {
                tracing::warn!("Could not load suppliers for remito check: {}", e);
                Vec::new()
            }
        };
        self.check(validate_remito(remito, &suppliers))?;

        match self.api.post_remito(&RemitoBody::from(remito)).await {
            Ok(()) => {
                self.invalidate();
                self.consolidated = None;
                tracing::info!("Remito {} registered", remito.number);
                self.notifier.notify(Notification::success(format!(
                    "Remito {} received ({} lines)",
                    remito.number,
                    remito.lines.len()
                )));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Remito {} rejected: {}", remito.number, e);
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    // ============================================
    // Internals
    // ============================================

    fn title_of(&self, position_id: &str) -> String {
        self.cache
            .position(position_id)
            .map(Position::title)
            .unwrap_or_else(|| position_id.to_string())
    }

    /// Surface a validation failure without touching cache or network
    fn check(&self, result: Result<(), DomainError>) -> Result<(), DomainError> {
        if let Err(e) = &result {
            self.notifier.notify(Notification::error(e.user_message()));
        }
        result
    }

    async fn optimistic<F>(
        &mut self,
        mutation: StockMutation,
        request: F,
        changes_totals: bool,
        success_message: String,
    ) -> Result<(), DomainError>
    where
        F: Future<Output = Result<(), DomainError>>,
    {
        let inverse = self.cache.apply(&mutation);

        match request.await {
            Ok(()) => {
                if changes_totals {
                    self.consolidated = None;
                }
                tracing::debug!("Confirmed {:?}", mutation);
                self.notifier.notify(Notification::success(success_message));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Request failed, rolling back optimistic update: {}", e);
                self.cache.apply(&inverse);
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }
}
