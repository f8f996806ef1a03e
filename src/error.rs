//! Error types for schema sessions and closure resolution.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`SchemaSession`](crate::SchemaSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session could not carry the request (connection refused, I/O, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The device answered with its own error payload.
    #[error("device rejected request ({tag}): {message}")]
    Rpc { tag: String, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The device answered, but the reply could not be decoded.
    #[error("invalid reply: {0}")]
    InvalidReply(String),
}

/// Errors during closure resolution.
///
/// Every variant is fatal: resolution stops at the first failure and no
/// partial fetched-set is returned.
#[derive(Debug, Error)]
pub enum ResolveError {
    // IO errors (exit code 3)
    #[error("failed to list schemas: {source}")]
    CatalogUnavailable {
        #[source]
        source: SessionError,
    },

    #[error("failed to fetch '{identifier}': {source}")]
    FetchFailed {
        identifier: String,
        #[source]
        source: SessionError,
    },

    // Schema errors (exit code 2)
    #[error("schema not supported: {identifier}")]
    SchemaNotSupported { identifier: String },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::CatalogUnavailable { .. } | ResolveError::FetchFailed { .. } => 3,
            ResolveError::SchemaNotSupported { .. } => 2,
        }
    }

    /// True when the underlying session call gave up on a deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ResolveError::CatalogUnavailable {
                source: SessionError::Timeout(_)
            } | ResolveError::FetchFailed {
                source: SessionError::Timeout(_),
                ..
            }
        )
    }
}
