//! Error types for the movie-review API client.
//!
//! # Design
//! The taxonomy is flat. Any non-2xx status and any transport failure become
//! `ApiError::Failed(operation)`: the caller learns which operation failed,
//! not why. The status code is logged, never returned. Encoding and decoding
//! problems keep their own variants since they point at a client or schema
//! bug rather than at the server's answer.

use thiserror::Error;

use crate::operation::Operation;

/// Errors returned by `ApiClient` parse methods and the `Api` facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete with a 2xx status.
    #[error("{0}")]
    Failed(Operation),

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The operation a status or transport failure belongs to.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiError::Failed(op) => Some(*op),
            _ => None,
        }
    }
}
