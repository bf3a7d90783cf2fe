//! Runtime configuration for `BitcoinService`

use crate::constants::{
    CACHE_VALIDITY_SECS, PRICE_HISTORY_URL, REQUEST_TIMEOUT_SECS, STATS_URL,
};
use std::time::Duration;

/// Endpoint and timing settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Network stats endpoint
    pub stats_url: String,
    /// 30 day price chart endpoint
    pub price_history_url: String,
    /// How long cached responses are served before refetching
    pub cache_validity: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stats_url: STATS_URL.to_string(),
            price_history_url: PRICE_HISTORY_URL.to_string(),
            cache_validity: Duration::from_secs(CACHE_VALIDITY_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Builds a config from the defaults, overridden by environment variables
    ///
    /// - `BITCOIN_STATS_URL`
    /// - `BITCOIN_PRICE_HISTORY_URL`
    /// - `BITCOIN_CACHE_TTL_SECS`
    /// - `BITCOIN_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("BITCOIN_STATS_URL") {
            config.stats_url = url;
        }
        if let Some(url) = lookup("BITCOIN_PRICE_HISTORY_URL") {
            config.price_history_url = url;
        }
        if let Some(secs) = parse_secs(&lookup, "BITCOIN_CACHE_TTL_SECS") {
            config.cache_validity = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(&lookup, "BITCOIN_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!(variable = name, value = %raw, error = %e, "Ignoring invalid setting");
            None
        }
    }
}
