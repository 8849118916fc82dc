use serde::{Deserialize, Serialize};

use crate::domain::model::book::BookSnapshot;
use crate::domain::model::order::{OrderUpdate, RejectNotice};

/// The single inbound stream the engine consumes: top-of-book changes,
/// order lifecycle notifications and instruction rejections, delivered one
/// at a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EngineEvent {
    Book(BookSnapshot),
    Order(OrderUpdate),
    Reject(RejectNotice),
}
