use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, Mutex};

use crate::domain::events::EngineEvent;
use crate::domain::model::exchange::{InstructionId, LimitOrderSpec, SessionError};
use crate::domain::model::order::{OrderUpdate, RejectNotice};
use crate::domain::traits::OrderSession;

/// A resting order held by the simulated venue
#[derive(Clone, Debug)]
pub struct SimOrder {
    pub spec: LimitOrderSpec,
    pub create_time: DateTime<Utc>,
}

/// In-process stand-in for a live order session.
///
/// Accepts place/cancel requests, assigns sequential instruction ids and
/// echoes the resulting order/reject notifications back onto the engine's
/// event channel, the way a venue confirms over its private feed. Handles
/// are cheap clones sharing one venue state, so a test can keep one to
/// inspect or fill orders while the engine owns another.
#[derive(Clone)]
pub struct SimSession {
    state: Arc<Mutex<SimState>>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

struct SimState {
    next_instruction_id: InstructionId,
    open_orders: HashMap<InstructionId, SimOrder>,
    pending_failure: Option<String>,
}

impl SimSession {
    pub fn new(events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                next_instruction_id: 1,
                open_orders: HashMap::new(),
                pending_failure: None,
            })),
            events,
        }
    }

    /// Make the next place/cancel request fail before an instruction id is
    /// assigned.
    pub async fn fail_next_request(&self, reason: &str) {
        self.state.lock().await.pending_failure = Some(reason.to_string());
    }

    pub async fn open_order_count(&self) -> usize {
        self.state.lock().await.open_orders.len()
    }

    pub async fn resting_order(&self, instruction_id: InstructionId) -> Option<SimOrder> {
        self.state.lock().await.open_orders.get(&instruction_id).cloned()
    }

    /// Fill the resting order completely and notify the engine. Returns
    /// false if no such order rests on the venue.
    pub async fn fill_order(&self, instruction_id: InstructionId) -> bool {
        let order = {
            let mut state = self.state.lock().await;
            state.open_orders.remove(&instruction_id)
        };

        match order {
            Some(order) => {
                let filled = order.spec.signed_quantity.abs();
                info!("sim: filled order {} for {}", instruction_id, filled);
                self.emit(EngineEvent::Order(OrderUpdate {
                    instruction_id,
                    filled_quantity: filled,
                    cancelled_quantity: Decimal::ZERO,
                }));
                true
            }
            None => false,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The engine consumes this channel; if it is gone there is nobody
        // left to notify.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl OrderSession for SimSession {
    async fn place_limit_order(
        &mut self,
        spec: LimitOrderSpec,
    ) -> Result<InstructionId, SessionError> {
        let instruction_id = {
            let mut state = self.state.lock().await;
            if let Some(reason) = state.pending_failure.take() {
                return Err(SessionError::Rejected(reason));
            }
            let instruction_id = state.next_instruction_id;
            state.next_instruction_id += 1;
            state.open_orders.insert(
                instruction_id,
                SimOrder {
                    spec: spec.clone(),
                    create_time: Utc::now(),
                },
            );
            instruction_id
        };

        debug!(
            "sim: accepted order {}: {}@{}",
            instruction_id, spec.signed_quantity, spec.price
        );
        self.emit(EngineEvent::Order(OrderUpdate {
            instruction_id,
            filled_quantity: Decimal::ZERO,
            cancelled_quantity: Decimal::ZERO,
        }));
        Ok(instruction_id)
    }

    async fn cancel_order(
        &mut self,
        _instrument_id: u64,
        instruction_id: InstructionId,
    ) -> Result<InstructionId, SessionError> {
        let (cancel_id, removed) = {
            let mut state = self.state.lock().await;
            if let Some(reason) = state.pending_failure.take() {
                return Err(SessionError::Rejected(reason));
            }
            let cancel_id = state.next_instruction_id;
            state.next_instruction_id += 1;
            (cancel_id, state.open_orders.remove(&instruction_id))
        };

        match removed {
            Some(order) => {
                debug!("sim: cancelled order {} via {}", instruction_id, cancel_id);
                self.emit(EngineEvent::Order(OrderUpdate {
                    instruction_id,
                    filled_quantity: Decimal::ZERO,
                    cancelled_quantity: order.spec.signed_quantity.abs(),
                }));
            }
            None => {
                debug!("sim: rejecting cancel {} of unknown order {}", cancel_id, instruction_id);
                self.emit(EngineEvent::Reject(RejectNotice {
                    instruction_id: cancel_id,
                    reason: format!("no resting order {}", instruction_id),
                }));
            }
        }
        Ok(cancel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::TimeInForce;
    use rust_decimal_macros::dec;

    fn spec(price: Decimal, signed_quantity: Decimal) -> LimitOrderSpec {
        LimitOrderSpec {
            instrument_id: 4012,
            price,
            signed_quantity,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    #[tokio::test]
    async fn place_rests_the_order_and_confirms_it_live() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = SimSession::new(tx);

        let id = session
            .place_limit_order(spec(dec!(100.00001), dec!(1)))
            .await
            .unwrap();

        assert_eq!(session.open_order_count().await, 1);
        assert_eq!(
            session.resting_order(id).await.unwrap().spec.price,
            dec!(100.00001)
        );
        match rx.try_recv().unwrap() {
            EngineEvent::Order(update) => {
                assert_eq!(update.instruction_id, id);
                assert!(update.is_live());
            }
            other => panic!("expected order update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancel_of_unknown_order_rejects_the_cancel_instruction() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = SimSession::new(tx);

        let cancel_id = session.cancel_order(4012, 999).await.unwrap();

        match rx.try_recv().unwrap() {
            EngineEvent::Reject(notice) => assert_eq!(notice.instruction_id, cancel_id),
            other => panic!("expected reject, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn injected_failure_consumes_exactly_one_request() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = SimSession::new(tx);
        session.fail_next_request("gateway unavailable").await;

        let first = session.place_limit_order(spec(dec!(100), dec!(1))).await;
        assert!(first.is_err());

        let second = session.place_limit_order(spec(dec!(100), dec!(1))).await;
        assert!(second.is_ok());
    }
}
