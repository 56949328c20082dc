//! Store failures → gRPC status codes.

use tonic::Status;

use crate::context::Interrupted;
use crate::error::StoreError;

impl From<StoreError> for Status {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId { .. } => Status::invalid_argument(err.to_string()),
            StoreError::AlreadyExists(_) => Status::already_exists(err.to_string()),
            StoreError::Canceled => Status::cancelled(err.to_string()),
            StoreError::DeadlineExceeded => Status::deadline_exceeded(err.to_string()),
            StoreError::LockPoisoned(_) | StoreError::Blob(_) => Status::internal(err.to_string()),
        }
    }
}

impl From<Interrupted> for Status {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::Canceled => Status::cancelled(interrupted.to_string()),
            Interrupted::DeadlineExceeded => Status::deadline_exceeded(interrupted.to_string()),
        }
    }
}
