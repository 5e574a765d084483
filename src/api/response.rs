//! Response envelopes for the Tasklane API.
//!
//! Every response carries a fixed JSON envelope:
//! success bodies are `{status_code, message, payload}` and error
//! bodies are `{status_code, message, error}`.

use serde::Deserialize;

/// Success envelope wrapping the payload of interest.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub payload: T,
}

/// Error envelope carrying the server's human-readable error message.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}
