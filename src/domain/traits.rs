use async_trait::async_trait;

use crate::domain::model::exchange::{InstructionId, LimitOrderSpec, SessionError};

/// Order entry boundary to the venue session.
///
/// Both operations are asynchronous: they complete with the instruction id
/// the venue assigned, or with a failure raised before any instruction
/// existed. Everything the order does after acceptance arrives separately
/// as `EngineEvent`s.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSession {
    async fn place_limit_order(
        &mut self,
        spec: LimitOrderSpec,
    ) -> Result<InstructionId, SessionError>;

    async fn cancel_order(
        &mut self,
        instrument_id: u64,
        instruction_id: InstructionId,
    ) -> Result<InstructionId, SessionError>;
}
