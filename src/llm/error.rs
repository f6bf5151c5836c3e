//! LLM error types.

use thiserror::Error;

/// Errors that can occur when calling a provider's completions endpoint.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request never completed
    #[error("network error: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned an error response
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Success response carried no extractable reply text
    #[error("empty response")]
    EmptyReply,
}
