//! Bitcoin stats service
//!
//! Fetches network stats and the 30 day price history, serving repeat
//! requests from a short-lived cache.

use crate::{
    config::ServiceConfig,
    constants::{CacheKey, PRICE_HISTORY_CACHE, STATS_CACHE},
    decode::{decode_price_history, decode_stats},
    error::ServiceError,
    json::JsonValue,
    metrics::{MetricsCollector, ServiceMetrics},
    store::{CacheStore, InMemoryStore, PersistentStore},
    transport::HttpTransport,
    transports::HttpClientTransport,
    types::{self, MarketSnapshot, PricePoint, Stats},
};
use chrono::{DateTime, Local, TimeZone};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Cached client for the blockchain.info stats and chart endpoints
///
/// Each fetch first consults the cache; only a missing or expired entry
/// triggers a network request, whose decoded result is written back before
/// being returned. Concurrent fetches of the same resource are not
/// deduplicated.
///
/// # Example
/// ```no_run
/// use bitcoin_stats_sdk::{BitcoinService, ServiceConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = BitcoinService::new(ServiceConfig::from_env())?;
/// let stats = service.get_stats().await?;
/// println!("BTC: ${:.2}", stats.market_price_usd);
/// # Ok(())
/// # }
/// ```
pub struct BitcoinService {
    config: ServiceConfig,
    transport: Arc<dyn HttpTransport>,
    cache: CacheStore,
    metrics: Arc<MetricsCollector>,
    latest: RwLock<Option<MarketSnapshot>>,
}

impl BitcoinService {
    /// Creates a service over HTTP with a process-local cache
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let transport = Arc::new(HttpClientTransport::from_config(&config)?);
        Ok(Self::with_parts(
            config,
            transport,
            Arc::new(InMemoryStore::new()),
        ))
    }

    /// Creates a service with a custom transport and persistence backend
    pub fn with_parts(
        config: ServiceConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn PersistentStore>,
    ) -> Self {
        let cache = CacheStore::new(store, config.cache_validity);
        let metrics = Arc::new(MetricsCollector::new(transport.transport_name()));

        Self {
            config,
            transport,
            cache,
            metrics,
            latest: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Gets the current network stats
    pub async fn get_stats(&self) -> Result<Stats, ServiceError> {
        self.fetch_cached(&STATS_CACHE, &self.config.stats_url, decode_stats)
            .await
    }

    /// Gets the daily market price for the past 30 days, oldest first
    pub async fn get_price_history_30d(&self) -> Result<Vec<PricePoint>, ServiceError> {
        let history = self
            .fetch_cached(
                &PRICE_HISTORY_CACHE,
                &self.config.price_history_url,
                decode_price_history,
            )
            .await?;

        tracing::debug!(count = history.len(), "Price history ready");
        Ok(history)
    }

    async fn fetch_cached<T, F>(
        &self,
        key: &CacheKey,
        url: &str,
        decode: F,
    ) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&JsonValue) -> Result<T, ServiceError>,
    {
        if let Some(cached) = self.cache.read_value::<T>(key).await {
            tracing::debug!(key = key.value, "Serving cached response");
            self.metrics.record_cache_hit().await;
            return Ok(cached);
        }
        self.metrics.record_cache_miss().await;

        let start = Instant::now();
        let body = match self.transport.get(url).await {
            Ok(body) => body,
            Err(e) => {
                self.metrics.record_request(start.elapsed(), false).await;
                tracing::warn!(url, error = %e, "Fetch failed");
                return Err(e);
            }
        };
        self.metrics.record_request(start.elapsed(), true).await;

        let json = JsonValue::from_slice(&body);
        let value = decode(&json).inspect_err(|e| {
            tracing::warn!(url, error = %e, "Response could not be decoded");
        })?;

        if let Err(e) = self.cache.write_value(key, &value).await {
            tracing::warn!(key = key.value, error = %e, "Failed to cache response");
        }

        tracing::debug!(
            url,
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched and cached response"
        );

        Ok(value)
    }

    /// Fetches stats and price history concurrently
    pub async fn fetch_snapshot(&self) -> Result<MarketSnapshot, ServiceError> {
        let (stats, price_history) =
            futures::try_join!(self.get_stats(), self.get_price_history_30d())?;
        Ok(MarketSnapshot::new(stats, price_history))
    }

    /// Fetches a snapshot and reports completion
    ///
    /// `on_complete` receives `None` on success, after which
    /// [`latest_snapshot`](Self::latest_snapshot) holds the fresh data. On
    /// failure the previous snapshot is kept.
    pub async fn refresh<F>(&self, on_complete: F)
    where
        F: FnOnce(Option<ServiceError>),
    {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                *self.latest.write().await = Some(snapshot);
                on_complete(None);
            }
            Err(e) => on_complete(Some(e)),
        }
    }

    /// The snapshot stored by the last successful [`refresh`](Self::refresh)
    pub async fn latest_snapshot(&self) -> Option<MarketSnapshot> {
        self.latest.read().await.clone()
    }

    /// Latest price recorded yesterday, in local time
    pub fn yesterdays_price(&self, price_history: &[PricePoint]) -> Option<PricePoint> {
        self.yesterdays_price_at(price_history, &Local::now())
    }

    /// Latest price recorded on the day before `now`
    pub fn yesterdays_price_at<Tz: TimeZone>(
        &self,
        price_history: &[PricePoint],
        now: &DateTime<Tz>,
    ) -> Option<PricePoint> {
        types::yesterdays_price_at(price_history, now)
    }

    /// Drops cached responses so the next fetches hit the network
    pub async fn invalidate_cache(&self) {
        self.cache.invalidate(&STATS_CACHE).await;
        self.cache.invalidate(&PRICE_HISTORY_CACHE).await;
    }

    /// Gets request latency, success rate and cache hit counts
    pub async fn metrics(&self) -> ServiceMetrics {
        self.metrics.get_metrics().await
    }
}
