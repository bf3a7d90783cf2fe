//! Decoders from `JsonValue` trees into domain types
//!
//! Field decoding never fails: an absent or mistyped field falls back to
//! zero (or the Unix epoch for times). Only the overall response shape can
//! be rejected, via [`decode_price_history`].

use crate::{
    constants::PRICE_HISTORY_VALUES_KEY,
    error::ServiceError,
    json::JsonValue,
    types::{PricePoint, Stats},
};
use chrono::{DateTime, Utc};

/// Types that can be built from a `JsonValue`, degrading to defaults
pub trait FromJson: Sized {
    fn from_json(json: &JsonValue) -> Self;
}

fn f64_field(json: &JsonValue, key: &str) -> f64 {
    // NaN and infinities have no JSON encoding and would not survive the cache
    json.get(key)
        .as_f64()
        .filter(|value| value.is_finite())
        .unwrap_or_default()
}

fn i64_field(json: &JsonValue, key: &str) -> i64 {
    json.get(key).as_i64().unwrap_or_default()
}

impl FromJson for Stats {
    fn from_json(json: &JsonValue) -> Self {
        Self {
            // Reported in milliseconds
            timestamp: DateTime::from_timestamp_millis(i64_field(json, "timestamp"))
                .unwrap_or_default(),
            market_price_usd: f64_field(json, "market_price_usd"),
            hash_rate: f64_field(json, "hash_rate"),
            difficulty: f64_field(json, "difficulty"),
            minutes_between_blocks: f64_field(json, "minutes_between_blocks"),
            trade_volume_btc: f64_field(json, "trade_volume_btc"),
            trade_volume_usd: f64_field(json, "trade_volume_usd"),
            estimated_transaction_volume_usd: f64_field(json, "estimated_transaction_volume_usd"),
            miners_revenue_usd: f64_field(json, "miners_revenue_usd"),
            miners_revenue_btc: f64_field(json, "miners_revenue_btc"),
            total_fees_btc: i64_field(json, "total_fees_btc"),
            n_btc_mined: i64_field(json, "n_btc_mined"),
            n_tx: i64_field(json, "n_tx"),
            n_blocks_mined: i64_field(json, "n_blocks_mined"),
            total_bc: i64_field(json, "totalbc"),
            n_blocks_total: i64_field(json, "n_blocks_total"),
            blocks_size: i64_field(json, "blocks_size"),
            next_retarget: i64_field(json, "nextretarget"),
            estimated_btc_sent: i64_field(json, "estimated_btc_sent"),
            total_btc_sent: i64_field(json, "total_btc_sent"),
        }
    }
}

impl FromJson for PricePoint {
    fn from_json(json: &JsonValue) -> Self {
        // `x` is a unix timestamp in seconds, `y` the price
        let time: DateTime<Utc> =
            DateTime::from_timestamp(i64_field(json, "x"), 0).unwrap_or_default();
        Self::new(time, f64_field(json, "y"))
    }
}

/// Decodes a network stats response
///
/// The body has to be a JSON object; its fields then decode leniently.
pub fn decode_stats(json: &JsonValue) -> Result<Stats, ServiceError> {
    ensure_object(json)?;
    Ok(Stats::from_json(json))
}

/// Decodes the market price chart response, keeping source order
///
/// Fails with `MalformedResponse` when `values` is missing or not an array.
pub fn decode_price_history(json: &JsonValue) -> Result<Vec<PricePoint>, ServiceError> {
    ensure_object(json)?;
    let values = json
        .lookup(PRICE_HISTORY_VALUES_KEY)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| ServiceError::malformed(PRICE_HISTORY_VALUES_KEY))?;

    Ok(values.iter().map(PricePoint::from_json).collect())
}

fn ensure_object(json: &JsonValue) -> Result<(), ServiceError> {
    match json {
        JsonValue::Object(_) => Ok(()),
        JsonValue::Invalid(error) => Err(ServiceError::invalid_response(error.to_string())),
        other => Err(ServiceError::invalid_response(format!(
            "expected a JSON object, got {}",
            other.to_raw_string()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_history_preserves_order() {
        let json = JsonValue::from_slice(
            br#"{"values":[{"x":1000,"y":100.0},{"x":86400,"y":105.0}]}"#,
        );
        let prices = decode_price_history(&json).unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].price_usd, 100.0);
        assert_eq!(prices[1].price_usd, 105.0);
        assert_eq!(prices[0].time.timestamp(), 1000);
        assert_eq!(prices[1].time.timestamp(), 86400);
    }

    #[test]
    fn test_price_history_missing_values_is_malformed() {
        let json = JsonValue::from_slice(br#"{"status":"ok"}"#);
        assert!(matches!(
            decode_price_history(&json),
            Err(ServiceError::MalformedResponse { ref field }) if field == "values"
        ));

        let json = JsonValue::from_slice(br#"{"values":{"x":1}}"#);
        assert!(matches!(
            decode_price_history(&json),
            Err(ServiceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_non_object_bodies_are_invalid_responses() {
        let garbage = JsonValue::from_slice(b"<html>");
        assert!(matches!(
            decode_price_history(&garbage),
            Err(ServiceError::InvalidResponse(_))
        ));
        assert!(matches!(
            decode_stats(&JsonValue::from_slice(b"[1,2]")),
            Err(ServiceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_price_point_defaults() {
        let point = PricePoint::from_json(&JsonValue::from_slice(br#"{"y":"42.5"}"#));
        assert_eq!(point.time.timestamp(), 0);
        assert_eq!(point.price_usd, 42.5);

        let point = PricePoint::from_json(&JsonValue::Null);
        assert_eq!(point, PricePoint::default());
    }

    #[test]
    fn test_non_finite_prices_fall_back_to_zero() {
        for raw in ["NaN", "inf", "-infinity"] {
            let body = format!(r#"{{"x":1000,"y":"{raw}"}}"#);
            let point = PricePoint::from_json(&JsonValue::from_slice(body.as_bytes()));
            assert_eq!(point.price_usd, 0.0, "{raw}");
        }
    }

    #[test]
    fn test_stats_fields() {
        let json = JsonValue::from_slice(
            br#"{
                "timestamp": 1710504000000,
                "market_price_usd": 71234.56,
                "hash_rate": 5.8e8,
                "n_tx": 412345,
                "totalbc": 1966781250000000,
                "nextretarget": 840672,
                "minutes_between_blocks": "9.7",
                "difficulty": null
            }"#,
        );
        let stats = decode_stats(&json).unwrap();

        assert_eq!(stats.timestamp.timestamp(), 1_710_504_000);
        assert_eq!(stats.market_price_usd, 71234.56);
        assert_eq!(stats.hash_rate, 5.8e8);
        assert_eq!(stats.n_tx, 412_345);
        assert_eq!(stats.total_bc, 1_966_781_250_000_000);
        assert_eq!(stats.next_retarget, 840_672);
        assert_eq!(stats.minutes_between_blocks, 9.7);
        assert_eq!(stats.difficulty, 0.0);
        assert_eq!(stats.n_blocks_total, 0);
    }
}
