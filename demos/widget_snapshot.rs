use bitcoin_stats_sdk::{BitcoinService, ServiceConfig};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let service = BitcoinService::new(ServiceConfig::from_env())?;

    println!("Bitcoin Widget Snapshot");
    println!("=======================");

    let start = Instant::now();
    service
        .refresh(|error| {
            if let Some(e) = error {
                eprintln!("Refresh failed: {}", e);
            }
        })
        .await;
    let network_latency = start.elapsed();

    let Some(snapshot) = service.latest_snapshot().await else {
        return Ok(());
    };

    println!("Price:   ${:.2}", snapshot.stats.market_price_usd);
    match snapshot.price_change() {
        Some(change) => println!("Change:  ${:+.2} since yesterday", change),
        None => println!("Change:  --"),
    }
    if let Some((low, high)) = snapshot.price_range() {
        println!("30 days: ${:.2} - ${:.2}", low, high);
    }
    println!("Fetched in {:?}", network_latency);

    // Second fetch is served from the cache
    let start = Instant::now();
    service.fetch_snapshot().await?;
    println!("Cached fetch in {:?}", start.elapsed());

    let metrics = service.metrics().await;
    println!(
        "Requests: {} (cache hits: {}, misses: {})",
        metrics.total_requests, metrics.cache_hits, metrics.cache_misses
    );

    Ok(())
}
