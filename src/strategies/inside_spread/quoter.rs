// External crate imports
use anyhow::Result;
use log::info;
use tokio::sync::{broadcast, mpsc};

// Internal crate imports
use crate::domain::events::EngineEvent;
use crate::domain::traits::OrderSession;

use super::engine::QuotingEngine;

/// Runs the quoting engine as the single consumer of the inbound event
/// stream, keeping all tracker mutation on one task.
pub struct SpreadQuoter<S: OrderSession> {
    engine: QuotingEngine<S>,
    events: mpsc::UnboundedReceiver<EngineEvent>,
}

impl<S: OrderSession + Send> SpreadQuoter<S> {
    pub fn new(engine: QuotingEngine<S>, events: mpsc::UnboundedReceiver<EngineEvent>) -> Self {
        Self { engine, events }
    }

    /// Consume events until the channel closes or shutdown is signalled.
    pub async fn event_task(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        info!("Event task started");

        loop {
            tokio::select! {
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => self.engine.handle_event(event).await,
                        None => {
                            info!("Event channel closed");
                            return Ok(());
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Event task received shutdown signal");
                    return Ok(());
                }
            }
        }
    }
}
