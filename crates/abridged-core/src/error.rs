//! Error types for abridged-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Identifier counter {requested} exceeds 2-byte capacity (table too large)")]
    IdentifierRange { requested: usize },

    #[error("Identifier allocator already handed out {allocated} identifiers; table builds need a fresh allocator")]
    AllocatorInUse { allocated: usize },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Table size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
