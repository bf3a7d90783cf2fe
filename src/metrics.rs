//! Fetch metrics collection and reporting
//!
//! Tracks network latency, request success rate and cache hit counts.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of the service's fetch behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMetrics {
    /// Name of the transport
    pub transport_name: String,
    /// 50th percentile latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of network requests
    pub total_requests: u64,
    /// Number of failed network requests
    pub failed_requests: u64,
    /// Fetches answered from the cache
    pub cache_hits: u64,
    /// Fetches that had to go to the network
    pub cache_misses: u64,
}

impl ServiceMetrics {
    /// Creates metrics with no data
    pub fn empty(transport_name: &str) -> Self {
        Self {
            transport_name: transport_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            cache_hits: 0,
            cache_misses: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    failed_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
}

/// Collects and computes metrics for `BitcoinService`
pub struct MetricsCollector {
    transport_name: String,
    /// Rolling window of latency samples
    samples: Arc<RwLock<VecDeque<LatencySample>>>,
    counters: Arc<RwLock<Counters>>,
}

impl MetricsCollector {
    pub fn new(transport_name: &str) -> Self {
        Self {
            transport_name: transport_name.to_string(),
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(MAX_SAMPLES))),
            counters: Arc::new(RwLock::new(Counters::default())),
        }
    }

    /// Records a network request with its duration and success status
    pub async fn record_request(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut counters = self.counters.write().await;
            counters.total_requests += 1;
            if !success {
                counters.failed_requests += 1;
            }
        }

        let mut samples = self.samples.write().await;
        if samples.len() >= MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(LatencySample {
            duration_ms,
            success,
        });
    }

    pub async fn record_cache_hit(&self) {
        self.counters.write().await.cache_hits += 1;
    }

    pub async fn record_cache_miss(&self) {
        self.counters.write().await.cache_misses += 1;
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> ServiceMetrics {
        let samples = self.samples.read().await;
        let counters = self.counters.read().await;

        let mut metrics = ServiceMetrics::empty(&self.transport_name);
        metrics.cache_hits = counters.cache_hits;
        metrics.cache_misses = counters.cache_misses;

        if samples.is_empty() {
            return metrics;
        }

        // Only successful requests count towards latency
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        metrics.latency_p50_ms = percentile(&latencies, 50.0);
        metrics.latency_p99_ms = percentile(&latencies, 99.0);
        metrics.total_requests = counters.total_requests;
        metrics.failed_requests = counters.failed_requests;
        if counters.total_requests > 0 {
            metrics.success_rate = (counters.total_requests - counters.failed_requests) as f64
                / counters.total_requests as f64;
        }

        metrics
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = ((p / 100.0) * sorted_values.len() as f64).ceil() as usize;
    let idx = rank.max(1) - 1;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
