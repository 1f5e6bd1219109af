//! Client error types

use thiserror::Error;

/// Errors surfaced by [`StoreClient`](crate::StoreClient) calls
///
/// A failed request maps to exactly one error; nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, connect, timeout, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error response
    #[error("api error {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// An authenticated endpoint was called without logging in first
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
