// Standard library imports
use std::path::Path;

// External crate imports
use anyhow::{anyhow, Result};
use dotenv::dotenv;
use log::{error, info, warn};
use rand::Rng;
use rust_decimal::Decimal;
use tokio::select;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, Duration};

// Internal crate imports
use inside_spread_bot::config_loader::{AppConfig, FeedConfig};
use inside_spread_bot::domain::events::EngineEvent;
use inside_spread_bot::domain::model::book::{BookSnapshot, PricePoint};
use inside_spread_bot::infrastructure::exchange::sim::SimSession;
use inside_spread_bot::strategies::inside_spread::{QuotingEngine, SpreadQuoter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();
    info!("Logger initialized");

    // Load configuration from TOML file (first try the working directory,
    // then the parent as backup)
    let config_path = Path::new("./config.toml");
    let config = match AppConfig::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config from {}: {}", config_path.display(), e);

            let alt_path = Path::new("../config.toml");
            info!("Attempting to load from alternate path: {}", alt_path.display());
            AppConfig::from_file(alt_path)?
        }
    };

    info!(
        "Configuration loaded, quoting instrument {}",
        config.instrument.instrument_id
    );

    run_bot(config).await
}

/// Main bot run function: wires the simulated session, the engine task and
/// the synthetic book feed together.
async fn run_bot(config: AppConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let session = SimSession::new(event_tx.clone());
    let engine = QuotingEngine::new(session, &config.instrument);
    let quoter = SpreadQuoter::new(engine, event_rx);

    // Create a broadcast channel for shutdown signaling
    let (shutdown_tx, _) = broadcast::channel::<()>(2);

    let mut event_handle = tokio::spawn({
        let shutdown_rx = shutdown_tx.subscribe();
        async move {
            if let Err(e) = quoter.event_task(shutdown_rx).await {
                error!("Event task failed: {:?}", e);
                return Err(e);
            }
            Ok(())
        }
    });

    let mut feed_handle = tokio::spawn({
        let shutdown_rx = shutdown_tx.subscribe();
        let feed = config.feed.clone();
        let tick_size = config.instrument.tick_size;
        async move {
            if let Err(e) = feed_task(event_tx, feed, tick_size, shutdown_rx).await {
                error!("Feed task failed: {:?}", e);
                return Err(e);
            }
            Ok(())
        }
    });

    // Wait for any task to finish or Ctrl+C
    select! {
        res = &mut event_handle => {
            match res {
                Ok(Ok(_)) => info!("Event task completed successfully"),
                Ok(Err(e)) => error!("Event task returned error: {:?}", e),
                Err(e) => error!("Event task panicked: {:?}", e),
            }
        }
        res = &mut feed_handle => {
            match res {
                Ok(Ok(_)) => info!("Feed task completed successfully"),
                Ok(Err(e)) => error!("Feed task returned error: {:?}", e),
                Err(e) => error!("Feed task panicked: {:?}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("SIGINT (Ctrl+C) received. Attempting graceful shutdown...");
        }
    }

    // Signal all tasks to shut down
    if let Err(e) = shutdown_tx.send(()) {
        error!("Failed to send shutdown signal: {}", e);
    } else {
        info!("Shutdown signal sent to all tasks");
    }

    // Give tasks a moment to process the shutdown signal
    sleep(Duration::from_millis(100)).await;

    // Abort the tasks if they're still running
    for (name, handle) in [("event", &mut event_handle), ("feed", &mut feed_handle)] {
        if !handle.is_finished() {
            info!("Aborting {} task", name);
            handle.abort();
        }
    }

    Ok(())
}

/// Synthetic top-of-book feed: a one-tick random walk around the configured
/// start price, published at a fixed interval.
async fn feed_task(
    events: mpsc::UnboundedSender<EngineEvent>,
    feed: FeedConfig,
    tick_size: Decimal,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    info!("Feed task started at {}", feed.start_price);
    let mut mid = feed.start_price;
    let mut interval = tokio::time::interval(Duration::from_millis(feed.update_interval_ms));

    loop {
        select! {
            _ = interval.tick() => {
                let step = if rand::thread_rng().gen_bool(0.5) {
                    tick_size
                } else {
                    -tick_size
                };
                mid += step;

                let book = BookSnapshot {
                    bids: vec![PricePoint::new(mid - tick_size, feed.level_quantity)],
                    asks: vec![PricePoint::new(mid + tick_size, feed.level_quantity)],
                };
                if events.send(EngineEvent::Book(book)).is_err() {
                    return Err(anyhow!("Event channel closed"));
                }
            }
            _ = shutdown.recv() => {
                info!("Feed task received shutdown signal");
                return Ok(());
            }
        }
    }
}
