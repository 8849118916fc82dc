use log::{debug, error, info, warn};
use rust_decimal::Decimal;

use crate::config_loader::InstrumentConfig;
use crate::domain::enums::{Side, TimeInForce};
use crate::domain::events::EngineEvent;
use crate::domain::model::book::BookSnapshot;
use crate::domain::model::exchange::{InstructionId, LimitOrderSpec};
use crate::domain::model::order::{OrderUpdate, RejectNotice};
use crate::domain::traits::OrderSession;

use super::price::quote_price;
use super::tracker::{OrderSideTracker, TrackerState};

/// Orchestrates both side trackers for one instrument.
///
/// Owns the session handle and both trackers; the quoter task feeds every
/// inbound event through `handle_event` one at a time, so no other
/// synchronization is needed around tracker state.
pub struct QuotingEngine<S: OrderSession> {
    session: S,
    instrument_id: u64,
    tick_size: Decimal,
    order_quantity: Decimal,
    buy: OrderSideTracker,
    sell: OrderSideTracker,
}

impl<S: OrderSession + Send> QuotingEngine<S> {
    pub fn new(session: S, instrument: &InstrumentConfig) -> Self {
        Self {
            session,
            instrument_id: instrument.instrument_id,
            tick_size: instrument.tick_size,
            order_quantity: instrument.order_quantity,
            buy: OrderSideTracker::new(Side::Buy),
            sell: OrderSideTracker::new(Side::Sell),
        }
    }

    pub fn buy_tracker(&self) -> &OrderSideTracker {
        &self.buy
    }

    pub fn sell_tracker(&self) -> &OrderSideTracker {
        &self.sell
    }

    /// Apply one inbound event to completion.
    pub async fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Book(book) => self.on_book_update(&book).await,
            EngineEvent::Order(update) => self.on_order_update(&update),
            EngineEvent::Reject(notice) => self.on_reject(&notice),
        }
    }

    async fn on_book_update(&mut self, book: &BookSnapshot) {
        let best_bid = book.best_bid().map(|p| p.price);
        let best_ask = book.best_ask().map(|p| p.price);

        self.quote_side(Side::Buy, best_bid).await;
        self.quote_side(Side::Sell, best_ask).await;
    }

    /// Act on a side only when its touch exists and either nothing has been
    /// quoted there yet, or the touch has caught up with our own resting
    /// quote.
    async fn quote_side(&mut self, side: Side, best_price: Option<Decimal>) {
        let Some(best_price) = best_price else {
            return;
        };

        let tracker = self.tracker(side);
        let quoted = tracker.quoted_price();
        if quoted.is_some() && quoted != Some(best_price) {
            return;
        }

        let state = tracker.state();
        match state {
            TrackerState::None => self.place_quote(side, best_price).await,
            TrackerState::Working { order_id } => self.cancel_quote(side, order_id).await,
            // An instruction is already in flight for this side; wait for
            // it to resolve before acting again.
            TrackerState::Pending { .. } | TrackerState::Cancelling { .. } => {}
        }
    }

    async fn place_quote(&mut self, side: Side, best_price: Decimal) {
        let price = quote_price(best_price, side, self.tick_size);
        let spec = LimitOrderSpec {
            instrument_id: self.instrument_id,
            price,
            signed_quantity: side.signed(self.order_quantity),
            time_in_force: TimeInForce::GoodTillCancelled,
        };

        match self.session.place_limit_order(spec).await {
            Ok(place_id) => {
                info!("Placed {} order {} at {}", side, place_id, price);
                self.tracker_mut(side).place_sent(place_id, price);
            }
            Err(e) => {
                // Non-fatal: the tracker is untouched, so the next eligible
                // book update retries the quote.
                error!("Failed to place {} order at {}: {}", side, price, e);
            }
        }
    }

    async fn cancel_quote(&mut self, side: Side, order_id: InstructionId) {
        match self.session.cancel_order(self.instrument_id, order_id).await {
            Ok(cancel_id) => {
                info!(
                    "Cancelling {} order {} with instruction {}",
                    side, order_id, cancel_id
                );
                self.tracker_mut(side).cancel_sent(cancel_id);
            }
            Err(e) => {
                error!("Failed to cancel {} order {}: {}", side, order_id, e);
            }
        }
    }

    fn on_order_update(&mut self, update: &OrderUpdate) {
        let Some(tracker) = self.tracker_for_order(update.instruction_id) else {
            debug!(
                "Order update for untracked instruction {}",
                update.instruction_id
            );
            return;
        };

        debug!(
            "Order {} on {} side: live={}",
            update.instruction_id,
            tracker.side(),
            update.is_live()
        );
        tracker.apply_order_update(update);
    }

    fn on_reject(&mut self, notice: &RejectNotice) {
        warn!(
            "Instruction {} rejected: {}",
            notice.instruction_id, notice.reason
        );

        let Some(tracker) = self.tracker_for_cancel(notice.instruction_id) else {
            // Not an outstanding cancel of ours; a rejected place never
            // moved its tracker out of `None` in the first place.
            debug!(
                "Reject for instruction {} matches no outstanding cancel",
                notice.instruction_id
            );
            return;
        };
        tracker.apply_reject(notice);
    }

    fn tracker(&self, side: Side) -> &OrderSideTracker {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    fn tracker_mut(&mut self, side: Side) -> &mut OrderSideTracker {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }

    fn tracker_for_order(&mut self, instruction_id: InstructionId) -> Option<&mut OrderSideTracker> {
        if self.buy.instruction_id() == Some(instruction_id) {
            Some(&mut self.buy)
        } else if self.sell.instruction_id() == Some(instruction_id) {
            Some(&mut self.sell)
        } else {
            None
        }
    }

    fn tracker_for_cancel(&mut self, instruction_id: InstructionId) -> Option<&mut OrderSideTracker> {
        if self.buy.cancel_instruction_id() == Some(instruction_id) {
            Some(&mut self.buy)
        } else if self.sell.cancel_instruction_id() == Some(instruction_id) {
            Some(&mut self.sell)
        } else {
            None
        }
    }
}
