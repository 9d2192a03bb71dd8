//! Error type for engine operations.
//!
//! Nothing here is surfaced to the host as a failure: public entry points log
//! the error and leave the model unchanged.

use thiserror::Error;

use crate::drawing::DrawingId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    #[error("sticker tool needs a sticker to be chosen first")]
    MissingStickerPayload,

    #[error("drawing {0} is no longer part of the chart")]
    StaleDrawing(DrawingId),

    #[error("drawing {0} is locked")]
    DrawingLocked(DrawingId),

    #[error("drawing {0} can only be dragged by its border")]
    InteriorGrab(DrawingId),

    #[error("drawing {0} does not hold text or other content")]
    NoContent(DrawingId),

    #[error("no drawing tool is armed")]
    NoToolArmed,

    #[error("invalid drawing record: {0}")]
    InvalidRecord(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
