//! # Bitcoin Stats SDK
//!
//! Fetches Bitcoin network stats and the 30 day market price history from
//! blockchain.info, caching each response for five minutes.
//!
//! Responses are parsed into [`JsonValue`], a lenient JSON model whose
//! lookups never fail: a missing key or index produces an `Invalid` value
//! recording the path that was tried, and typed accessors then return
//! `None`. Only transport errors and responses of the wrong overall shape
//! reach the caller as [`ServiceError`]s.
//!
//! ## Usage
//!
//! ```no_run
//! use bitcoin_stats_sdk::{BitcoinService, ServiceConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = BitcoinService::new(ServiceConfig::default())?;
//!
//! let stats = service.get_stats().await?;
//! println!("BTC: ${:.2}", stats.market_price_usd);
//!
//! let history = service.get_price_history_30d().await?;
//! if let Some(yesterday) = service.yesterdays_price(&history) {
//!     println!("Change: ${:+.2}", stats.market_price_usd - yesterday.price_usd);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! BitcoinService::get_stats / get_price_history_30d
//!     ↓
//! CacheStore (fresh entry?) ── yes ──→ decoded value
//!     ↓ no
//! HttpTransport (GET)
//!     ↓
//! JsonValue → decode → CacheStore write-through → decoded value
//! ```

pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod json;
pub mod metrics;
pub mod service;
pub mod store;
pub mod transport;
pub mod transports;
pub mod types;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use error::{CacheError, JsonError, JsonErrorKind, ServiceError};
pub use json::{JsonNumber, JsonValue};
pub use metrics::ServiceMetrics;
pub use service::BitcoinService;
pub use types::{MarketSnapshot, PricePoint, Stats};
