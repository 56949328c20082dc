use thiserror::Error;

use crate::context::Interrupted;

/// Failure values surfaced by the in-memory stores.
///
/// Stores never speak gRPC; the transport layer classifies these into status
/// codes (see `grpc::error`).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("id {id:?} is not a valid UUID: {reason}")]
    InvalidId { id: String, reason: String },

    /// Sentinel for duplicate inserts. Existing records are never merged.
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("request is canceled")]
    Canceled,

    #[error("deadline is exceeded")]
    DeadlineExceeded,

    #[error("cannot write blob: {0}")]
    Blob(#[from] std::io::Error),
}

impl From<Interrupted> for StoreError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::Canceled => StoreError::Canceled,
            Interrupted::DeadlineExceeded => StoreError::DeadlineExceeded,
        }
    }
}
