//! Domain types for Bitcoin network stats and prices

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the blockchain.info network stats
///
/// BTC-denominated integer fields are in satoshi, as the endpoint reports them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// When the stats were generated
    pub timestamp: DateTime<Utc>,

    /// Market price in USD
    pub market_price_usd: f64,

    /// Network hash rate (GH/s)
    pub hash_rate: f64,

    pub difficulty: f64,

    pub minutes_between_blocks: f64,

    /// 24h exchange trade volume in BTC
    pub trade_volume_btc: f64,

    /// 24h exchange trade volume in USD
    pub trade_volume_usd: f64,

    pub estimated_transaction_volume_usd: f64,

    pub miners_revenue_usd: f64,

    pub miners_revenue_btc: f64,

    pub total_fees_btc: i64,

    pub n_btc_mined: i64,

    /// Transactions in the last 24h
    pub n_tx: i64,

    pub n_blocks_mined: i64,

    /// Total bitcoins in circulation
    pub total_bc: i64,

    /// Height of the chain
    pub n_blocks_total: i64,

    pub blocks_size: i64,

    /// Block height of the next difficulty retarget
    pub next_retarget: i64,

    pub estimated_btc_sent: i64,

    pub total_btc_sent: i64,
}

/// One point of the market price chart
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricePoint {
    /// Day the price was recorded
    pub time: DateTime<Utc>,

    /// Price in USD
    pub price_usd: f64,
}

impl PricePoint {
    pub fn new(time: DateTime<Utc>, price_usd: f64) -> Self {
        Self { time, price_usd }
    }
}

/// Finds the latest point recorded on the calendar day before `now`
///
/// Days are taken in `now`'s time zone. The history is scanned from its end,
/// so with several points on that day the last one wins.
pub fn yesterdays_price_at<Tz: TimeZone>(
    history: &[PricePoint],
    now: &DateTime<Tz>,
) -> Option<PricePoint> {
    let yesterday = now.date_naive().pred_opt()?;
    let zone = now.timezone();

    history
        .iter()
        .rev()
        .find(|point| point.time.with_timezone(&zone).date_naive() == yesterday)
        .copied()
}

/// Everything the widget shows: current stats plus the 30 day history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub stats: Stats,
    pub price_history: Vec<PricePoint>,
}

impl MarketSnapshot {
    pub fn new(stats: Stats, price_history: Vec<PricePoint>) -> Self {
        Self {
            stats,
            price_history,
        }
    }

    /// Yesterday's price in local time
    pub fn yesterdays_price(&self) -> Option<PricePoint> {
        yesterdays_price_at(&self.price_history, &Local::now())
    }

    /// Current market price minus yesterday's price
    pub fn price_change(&self) -> Option<f64> {
        self.price_change_at(&Local::now())
    }

    pub fn price_change_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<f64> {
        yesterdays_price_at(&self.price_history, now)
            .map(|yesterday| self.stats.market_price_usd - yesterday.price_usd)
    }

    /// Lowest and highest price over the history
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.price_history.iter().map(|point| point.price_usd);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(low, high), price| {
            (low.min(price), high.max(price))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn day(offset_days: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(offset_days)
    }

    fn history(now: DateTime<Utc>) -> Vec<PricePoint> {
        (0..30)
            .rev()
            .map(|back| PricePoint::new(day(back, now), 100.0 + back as f64))
            .collect()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_yesterdays_price_over_thirty_days() {
        let now = fixed_now();
        let found = yesterdays_price_at(&history(now), &now).unwrap();
        assert_eq!(found.price_usd, 101.0);
        assert_eq!(found.time, day(1, now));
    }

    #[test]
    fn test_yesterdays_price_absent_when_day_missing() {
        let now = fixed_now();
        let history: Vec<_> = history(now)
            .into_iter()
            .filter(|point| point.time != day(1, now))
            .collect();
        assert!(yesterdays_price_at(&history, &now).is_none());
        assert!(yesterdays_price_at(&[], &now).is_none());
    }

    #[test]
    fn test_yesterdays_price_prefers_latest_entry() {
        let now = fixed_now();
        let morning = Utc.with_ymd_and_hms(2024, 3, 14, 1, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 14, 23, 0, 0).unwrap();
        let history = vec![PricePoint::new(morning, 1.0), PricePoint::new(evening, 2.0)];
        assert_eq!(yesterdays_price_at(&history, &now).unwrap().price_usd, 2.0);
    }

    #[test]
    fn test_yesterday_follows_the_callers_time_zone() {
        // 2024-03-15 02:00 in UTC+05:00 is still 2024-03-14 in UTC
        let now = FixedOffset::east_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 2, 0, 0)
            .unwrap();
        let late_utc = Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap();
        let history = vec![PricePoint::new(late_utc, 9.0)];
        assert_eq!(yesterdays_price_at(&history, &now).unwrap().price_usd, 9.0);
    }

    #[test]
    fn test_snapshot_change_and_range() {
        let now = fixed_now();
        let stats = Stats {
            market_price_usd: 110.0,
            ..Stats::default()
        };
        let snapshot = MarketSnapshot::new(stats, history(now));

        assert_eq!(snapshot.price_change_at(&now), Some(9.0));
        assert_eq!(snapshot.price_range(), Some((100.0, 129.0)));

        let empty = MarketSnapshot::new(Stats::default(), Vec::new());
        assert_eq!(empty.price_range(), None);
        assert_eq!(empty.price_change_at(&now), None);
    }
}
