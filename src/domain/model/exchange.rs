use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::enums::TimeInForce;

/// Identifier the venue assigns to an accepted place or cancel request.
pub type InstructionId = u64;

// LimitOrderSpec is a send-side intent
// Therefore separate from the notifications describing its later lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimitOrderSpec {
    pub instrument_id: u64,
    pub price: Decimal,
    /// Positive buys, negative sells.
    pub signed_quantity: Decimal,
    pub time_in_force: TimeInForce,
}

/// Failure raised by a place/cancel call before any instruction existed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("request rejected by venue: {0}")]
    Rejected(String),

    #[error("session not connected")]
    NotConnected,
}
