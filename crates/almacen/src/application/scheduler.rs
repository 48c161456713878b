//! Refresh Scheduler - Background staleness check for the position cache
//!
//! Wakes up at a fixed interval and refetches positions when the cache is
//! stale. Fresh caches are left alone.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;

use crate::application::StockService;
use crate::ports::{Notifier, StockApi};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between staleness checks
    pub interval: Duration,
    /// Enable/disable scheduler
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Periodic cache refresher
pub struct RefreshScheduler<A: StockApi, N: Notifier> {
    service: Arc<Mutex<StockService<A, N>>>,
    config: RefreshConfig,
}

impl<A, N> RefreshScheduler<A, N>
where
    A: StockApi + 'static,
    N: Notifier + 'static,
{
    pub fn new(service: Arc<Mutex<StockService<A, N>>>, config: Option<RefreshConfig>) -> Self {
        Self {
            service,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("Cache refresh scheduler disabled");
            return;
        }

        tracing::info!(
            "Cache refresh scheduler started (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        loop {
            ticker.tick().await;

            let mut service = self.service.lock().await;
            match service.ensure_fresh().await {
                Ok(true) => tracing::debug!("Stale position cache refetched"),
                Ok(false) => {}
                Err(e) => tracing::warn!("Background refresh failed: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::stock_service::tests::{warehouse, FakeApi, RecordingNotifier};
    use crate::application::CacheConfig;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_refetches_when_stale() {
        let api = Arc::new(FakeApi::with_positions(warehouse()));
        let service = StockService::new(
            api.clone(),
            Arc::new(RecordingNotifier::default()),
            Some(CacheConfig {
                ttl: Duration::from_secs(600),
            }),
        );
        let service = Arc::new(Mutex::new(service));

        let handle = RefreshScheduler::new(
            service.clone(),
            Some(RefreshConfig {
                interval: Duration::from_millis(5),
                enabled: true,
            }),
        )
        .start();

        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();

        // First tick fills the cache; later ticks find it fresh.
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(service.lock().await.positions().len(), 3);
    }

    #[tokio::test]
    async fn test_disabled_scheduler_exits() {
        let api = Arc::new(FakeApi::with_positions(warehouse()));
        let service = Arc::new(Mutex::new(StockService::new(
            api.clone(),
            Arc::new(RecordingNotifier::default()),
            None,
        )));

        RefreshScheduler::new(
            service,
            Some(RefreshConfig {
                interval: Duration::from_millis(5),
                enabled: false,
            }),
        )
        .start()
        .await
        .unwrap();

        assert_eq!(api.fetches.load(Ordering::SeqCst), 0);
    }
}
