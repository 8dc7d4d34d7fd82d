use crate::dns::cache::coarse_clock;
use dnsrelay_application::ports::ResponseCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 60;
const CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Background jobs keeping the reply cache fresh: a one-second coarse clock
/// ticker and a periodic sweep of expired entries.
pub struct CacheMaintenanceJob {
    cache: Arc<dyn ResponseCache>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheMaintenanceJob {
    pub fn new(cache: Arc<dyn ResponseCache>) -> Self {
        Self {
            cache,
            interval_secs: DEFAULT_MAINTENANCE_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// One maintenance cycle. Returns the number of entries removed.
    pub fn run_cycle(&self) -> usize {
        coarse_clock::tick();
        let removed = self.cache.remove_expired();
        debug!(
            removed,
            cache_size = self.cache.len(),
            "Cache maintenance cycle completed"
        );
        removed
    }

    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            interval_secs = self.interval_secs,
            "Starting cache maintenance background jobs"
        );

        let clock_shutdown = self.shutdown.clone();
        let clock = tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLOCK_TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = clock_shutdown.cancelled() => {
                        debug!("Coarse clock ticker: shutting down");
                        break;
                    }
                    _ = interval.tick() => coarse_clock::tick(),
                }
            }
        });

        let job = Arc::clone(&self);
        let sweep_shutdown = self.shutdown.clone();
        let sweep = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(job.interval_secs));
            loop {
                tokio::select! {
                    _ = sweep_shutdown.cancelled() => {
                        info!("CacheMaintenanceJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        job.run_cycle();
                    }
                }
            }
        });

        vec![clock, sweep]
    }
}
