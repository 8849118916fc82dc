// Replays a JSONL file of book snapshots through the quoting engine
// against the simulated venue, draining the echoed notifications after
// every snapshot so the run is deterministic.

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use tokio::sync::mpsc;

use inside_spread_bot::config_loader::AppConfig;
use inside_spread_bot::domain::events::EngineEvent;
use inside_spread_bot::domain::model::book::BookSnapshot;
use inside_spread_bot::infrastructure::exchange::sim::SimSession;
use inside_spread_bot::strategies::inside_spread::QuotingEngine;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/book_feed.jsonl".to_string());

    let config = if Path::new("./config.toml").exists() {
        AppConfig::from_file("./config.toml")?
    } else {
        AppConfig::default()
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let session = SimSession::new(event_tx);
    let mut engine = QuotingEngine::new(session.clone(), &config.instrument);

    let file = File::open(&path).with_context(|| format!("Failed to open book feed '{}'", path))?;
    let mut count = 0usize;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        count += 1;
        let book: BookSnapshot = serde_json::from_str(&line)
            .with_context(|| format!("Bad book snapshot on line {}", count))?;

        engine.handle_event(EngineEvent::Book(book)).await;
        while let Ok(event) = event_rx.try_recv() {
            engine.handle_event(event).await;
        }
    }

    info!(
        "Replayed {} snapshots; {} orders resting on the venue",
        count,
        session.open_order_count().await
    );
    info!(
        "Buy tracker: {:?} at {:?}",
        engine.buy_tracker().state(),
        engine.buy_tracker().quoted_price()
    );
    info!(
        "Sell tracker: {:?} at {:?}",
        engine.sell_tracker().state(),
        engine.sell_tracker().quoted_price()
    );

    Ok(())
}
