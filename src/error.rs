//! Coordinator error types

use thiserror::Error;

use crate::coordinator::SlotId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("timer capacity exceeded: at most {max} timers")]
    CapacityExceeded { max: usize },

    #[error("no timer slot with id {0}")]
    UnknownSlot(SlotId),
}
