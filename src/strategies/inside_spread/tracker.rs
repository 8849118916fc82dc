use log::warn;
use rust_decimal::Decimal;

use crate::domain::enums::Side;
use crate::domain::model::exchange::InstructionId;
use crate::domain::model::order::{OrderUpdate, RejectNotice};

/// Lifecycle of the single resting order a side may own.
///
/// `Cancelling` carries the resting order's id alongside the cancel
/// instruction, so an in-flight cancel can never be mistaken for a live,
/// untouched order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    /// No resting order and nothing in flight.
    None,
    /// Place accepted, waiting for the order notification.
    Pending { place_id: InstructionId },
    /// Order confirmed live on the book, untouched.
    Working { order_id: InstructionId },
    /// Cancel accepted for the resting order, waiting for resolution.
    Cancelling {
        order_id: InstructionId,
        cancel_id: InstructionId,
    },
}

/// Per-side order state machine. One instance per book side, mutated only
/// by the engine that owns it.
#[derive(Clone, Debug)]
pub struct OrderSideTracker {
    side: Side,
    state: TrackerState,
    quoted_price: Option<Decimal>,
}

impl OrderSideTracker {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            state: TrackerState::None,
            quoted_price: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Price of the current quote, or of the last one if that order is
    /// gone. Kept across resets: a touch returning to this price is the
    /// trigger to act on this side again.
    pub fn quoted_price(&self) -> Option<Decimal> {
        self.quoted_price
    }

    /// Place instruction id of the order being tracked, if any.
    pub fn instruction_id(&self) -> Option<InstructionId> {
        match self.state {
            TrackerState::None => None,
            TrackerState::Pending { place_id } => Some(place_id),
            TrackerState::Working { order_id } | TrackerState::Cancelling { order_id, .. } => {
                Some(order_id)
            }
        }
    }

    /// Id of the in-flight cancel instruction, if one is outstanding.
    pub fn cancel_instruction_id(&self) -> Option<InstructionId> {
        match self.state {
            TrackerState::Cancelling { cancel_id, .. } => Some(cancel_id),
            _ => None,
        }
    }

    /// Record an accepted place instruction. Legal only from `None`.
    pub fn place_sent(&mut self, place_id: InstructionId, price: Decimal) {
        if self.state != TrackerState::None {
            warn!(
                "{} tracker got place {} while {:?}",
                self.side, place_id, self.state
            );
            return;
        }
        self.quoted_price = Some(price);
        self.state = TrackerState::Pending { place_id };
    }

    /// Record an accepted cancel instruction. Legal only from `Working`.
    pub fn cancel_sent(&mut self, cancel_id: InstructionId) {
        match self.state {
            TrackerState::Working { order_id } => {
                self.state = TrackerState::Cancelling { order_id, cancel_id };
            }
            _ => warn!(
                "{} tracker got cancel {} while {:?}",
                self.side, cancel_id, self.state
            ),
        }
    }

    /// Fold an order notification into the tracker. Ignored unless it
    /// refers to the tracked instruction.
    pub fn apply_order_update(&mut self, update: &OrderUpdate) {
        if self.instruction_id() != Some(update.instruction_id) {
            return;
        }
        if update.is_live() {
            if let TrackerState::Pending { place_id } = self.state {
                self.state = TrackerState::Working { order_id: place_id };
            }
            // Working stays Working; Cancelling keeps waiting on its cancel.
        } else {
            // Filled or cancelled: the order is off the book.
            self.state = TrackerState::None;
        }
    }

    /// Fold a rejection into the tracker. Only a reject of the outstanding
    /// cancel matters: the resting order's fate is unknown, so the side is
    /// treated as cleared and may quote afresh.
    pub fn apply_reject(&mut self, notice: &RejectNotice) {
        if self.cancel_instruction_id() == Some(notice.instruction_id) {
            self.state = TrackerState::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn update(id: InstructionId, filled: Decimal, cancelled: Decimal) -> OrderUpdate {
        OrderUpdate {
            instruction_id: id,
            filled_quantity: filled,
            cancelled_quantity: cancelled,
        }
    }

    fn reject(id: InstructionId) -> RejectNotice {
        RejectNotice {
            instruction_id: id,
            reason: "validation failed".to_string(),
        }
    }

    fn working_tracker() -> OrderSideTracker {
        let mut tracker = OrderSideTracker::new(Side::Buy);
        tracker.place_sent(7, dec!(100.00001));
        tracker.apply_order_update(&update(7, dec!(0), dec!(0)));
        tracker
    }

    #[test]
    fn starts_with_nothing_tracked() {
        let tracker = OrderSideTracker::new(Side::Sell);
        assert_eq!(tracker.state(), TrackerState::None);
        assert_eq!(tracker.instruction_id(), None);
        assert_eq!(tracker.cancel_instruction_id(), None);
        assert_eq!(tracker.quoted_price(), None);
    }

    #[test]
    fn place_then_confirm_reaches_working() {
        let mut tracker = OrderSideTracker::new(Side::Buy);
        tracker.place_sent(7, dec!(100.00001));
        assert_eq!(tracker.state(), TrackerState::Pending { place_id: 7 });
        assert_eq!(tracker.quoted_price(), Some(dec!(100.00001)));

        tracker.apply_order_update(&update(7, dec!(0), dec!(0)));
        assert_eq!(tracker.state(), TrackerState::Working { order_id: 7 });
    }

    #[test]
    fn update_for_another_instruction_is_ignored() {
        let mut tracker = working_tracker();
        tracker.apply_order_update(&update(99, dec!(5), dec!(0)));
        assert_eq!(tracker.state(), TrackerState::Working { order_id: 7 });
    }

    #[test]
    fn fill_clears_the_tracker_but_keeps_the_price() {
        let mut tracker = working_tracker();
        tracker.apply_order_update(&update(7, dec!(5), dec!(0)));
        assert_eq!(tracker.state(), TrackerState::None);
        assert_eq!(tracker.quoted_price(), Some(dec!(100.00001)));
    }

    #[test]
    fn cancel_moves_working_to_cancelling() {
        let mut tracker = working_tracker();
        tracker.cancel_sent(9);
        assert_eq!(
            tracker.state(),
            TrackerState::Cancelling {
                order_id: 7,
                cancel_id: 9
            }
        );
        assert_eq!(tracker.instruction_id(), Some(7));
        assert_eq!(tracker.cancel_instruction_id(), Some(9));
    }

    #[test]
    fn live_update_while_cancelling_keeps_the_cancel_outstanding() {
        let mut tracker = working_tracker();
        tracker.cancel_sent(9);
        tracker.apply_order_update(&update(7, dec!(0), dec!(0)));
        assert_eq!(
            tracker.state(),
            TrackerState::Cancelling {
                order_id: 7,
                cancel_id: 9
            }
        );
    }

    #[test]
    fn cancelled_update_resolves_the_cancel() {
        let mut tracker = working_tracker();
        tracker.cancel_sent(9);
        tracker.apply_order_update(&update(7, dec!(0), dec!(1)));
        assert_eq!(tracker.state(), TrackerState::None);
    }

    #[test]
    fn reject_of_the_outstanding_cancel_clears_the_tracker() {
        let mut tracker = working_tracker();
        tracker.cancel_sent(9);
        tracker.apply_reject(&reject(9));
        assert_eq!(tracker.state(), TrackerState::None);
        assert_eq!(tracker.quoted_price(), Some(dec!(100.00001)));
    }

    #[test]
    fn unrelated_reject_is_ignored() {
        let mut tracker = working_tracker();
        tracker.cancel_sent(9);
        tracker.apply_reject(&reject(42));
        assert_eq!(
            tracker.state(),
            TrackerState::Cancelling {
                order_id: 7,
                cancel_id: 9
            }
        );
    }

    #[test]
    fn place_while_not_none_is_refused() {
        let mut tracker = working_tracker();
        tracker.place_sent(13, dec!(100.00002));
        assert_eq!(tracker.state(), TrackerState::Working { order_id: 7 });
        assert_eq!(tracker.quoted_price(), Some(dec!(100.00001)));
    }
}
