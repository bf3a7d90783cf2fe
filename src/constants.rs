//! Constants for the Bitcoin stats service
//!
//! Defaults for every setting live here. `ServiceConfig::from_env` can
//! override the endpoints and timings at runtime.

/// blockchain.info network stats endpoint
pub const STATS_URL: &str = "https://blockchain.info/stats?format=json";

/// blockchain.info 30 day market price chart endpoint
pub const PRICE_HISTORY_URL: &str =
    "https://blockchain.info/charts/market-price?timespan=30days&format=json";

/// How long a cached response stays valid (in seconds)
pub const CACHE_VALIDITY_SECS: u64 = 300;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "bitcoin-stats-sdk/0.1.0";

/// Key under which the price history array lives in the chart response
pub const PRICE_HISTORY_VALUES_KEY: &str = "values";

/// A cached blob and the key holding its write timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    /// Key of the serialized value
    pub value: &'static str,
    /// Key of the timestamp written alongside the value
    pub cached_at: &'static str,
}

/// Cache slot for the network stats
pub const STATS_CACHE: CacheKey = CacheKey {
    value: "bitcoin_service.stats",
    cached_at: "bitcoin_service.stats.cached_at",
};

/// Cache slot for the 30 day price history
pub const PRICE_HISTORY_CACHE: CacheKey = CacheKey {
    value: "bitcoin_service.price_history",
    cached_at: "bitcoin_service.price_history.cached_at",
};
