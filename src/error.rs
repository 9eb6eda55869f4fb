use thiserror::Error;

use crate::segment::Opcode;

#[derive(Error, Debug)]
pub enum CartpackError {
    /// Compression was asked to encode zero bytes.
    #[error("cannot compress an empty input")]
    EmptyInput,

    /// A start offset points past the end of the source buffer.
    #[error("offset {offset:#x} is outside a {len}-byte source")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// A segment count outside `1..=MAX_COUNT`.
    #[error("{opcode:?} segment cannot repeat {count} times")]
    InvalidCount { opcode: Opcode, count: usize },

    /// A hand-built segment whose parameters do not fit the wire format.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
