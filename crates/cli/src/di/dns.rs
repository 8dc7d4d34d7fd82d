use dnsrelay_application::ports::{MessageObserver, ResponseCache, UpstreamTransport};
use dnsrelay_application::use_cases::RelayQueryUseCase;
use dnsrelay_domain::Config;
use dnsrelay_infrastructure::dns::{DnsCache, DnsCacheConfig, FailoverTransport, TracingMessageObserver};
use dnsrelay_infrastructure::jobs::CacheMaintenanceJob;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct DnsServices {
    pub relay: Arc<RelayQueryUseCase>,
    pub cache: Option<Arc<DnsCache>>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let endpoints = config.upstream_endpoints()?;
        let timeout = Duration::from_millis(config.upstream.query_timeout_ms);
        let failover = FailoverTransport::from_endpoints(&endpoints, timeout);

        info!(
            server_count = failover.server_count(),
            servers = ?config.upstream.servers,
            timeout_ms = config.upstream.query_timeout_ms,
            "Upstream transport configured"
        );

        let transport: Arc<dyn UpstreamTransport> = Arc::new(failover);
        let observer: Arc<dyn MessageObserver> =
            Arc::new(TracingMessageObserver::new(config.logging.dump_packets));

        let mut relay = RelayQueryUseCase::new(transport, observer);

        let cache = if config.cache.enabled {
            let cache = Arc::new(DnsCache::new(DnsCacheConfig::from(&config.cache)));
            relay = relay.with_cache(cache.clone());
            Some(cache)
        } else {
            info!("Response cache disabled");
            None
        };

        Ok(Self {
            relay: Arc::new(relay),
            cache,
        })
    }

    pub fn start_maintenance(
        &self,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        let Some(cache) = &self.cache else {
            return Vec::new();
        };
        let job = CacheMaintenanceJob::new(cache.clone())
            .with_interval(config.cache.maintenance_interval_secs)
            .with_cancellation(shutdown);
        Arc::new(job).start()
    }

    pub fn log_cache_stats(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let metrics = cache.metrics();
        info!(
            entries = cache.len(),
            strategy = cache.strategy().as_str(),
            hits = metrics.hits.load(Ordering::Relaxed),
            misses = metrics.misses.load(Ordering::Relaxed),
            evictions = metrics.evictions.load(Ordering::Relaxed),
            expirations = metrics.expirations.load(Ordering::Relaxed),
            hit_rate = format!("{:.1}%", metrics.hit_rate()),
            "Cache statistics"
        );
    }
}
