// Domain model for order lifecycle notifications

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::model::exchange::InstructionId;

/// Order state notification, keyed by the place instruction that created
/// the order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub instruction_id: InstructionId,
    pub filled_quantity: Decimal,
    pub cancelled_quantity: Decimal,
}

impl OrderUpdate {
    /// The order is live and untouched only while both quantities are
    /// exactly zero; anything else means it is off the book.
    pub fn is_live(&self) -> bool {
        self.filled_quantity.is_zero() && self.cancelled_quantity.is_zero()
    }
}

/// Rejection of a previously accepted instruction
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RejectNotice {
    pub instruction_id: InstructionId,
    pub reason: String,
}
