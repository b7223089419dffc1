use thiserror::Error;

use crate::editing::BlockKey;

/// Failures of individual document operations.
///
/// These stay inside the engine: the transition and pagination layers turn
/// them into no-ops or a retry on the next pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no block with key {0}")]
    UnknownBlock(BlockKey),

    #[error("spacer block {0} cannot hold text or a selection")]
    SpacerNotEditable(BlockKey),

    #[error("offset {offset} is out of range for block {key} (length {len})")]
    OffsetOutOfRange {
        key: BlockKey,
        offset: usize,
        len: usize,
    },

    #[error("no selection")]
    NoSelection,

    #[error("block {0} reported a height that is negative or not finite")]
    InvalidMeasurement(BlockKey),
}
