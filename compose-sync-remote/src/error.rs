//! Error types for compose-sync-remote.

use thiserror::Error;

/// All errors that can arise from remote API calls.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The API answered with a non-2xx status.
    #[error("API error (status {code}): {body}")]
    Status { code: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A request payload could not be serialized.
    #[error("failed to encode {what} request: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("failed to parse {what} response: {source}; body: {body}")]
    Decode {
        what: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}
