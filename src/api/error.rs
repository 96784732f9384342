use thiserror::Error;

/// Errors surfaced by the API services.
///
/// The variants are deliberately coarse but distinct: callers need to tell
/// "the server is unreachable" from "the server answered something we don't
/// understand" from "this call was malformed or refused locally", because
/// each drives a different recovery path. None of them is retried
/// automatically by the engine.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A malformed URL, a missing bearer token, a duplicate authorization
    /// code, or a request refused by a single-flight guard.
    #[error("invalid request")]
    InvalidRequest,

    /// Transport-level failure; the underlying error is preserved.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("http status {0}")]
    HttpStatus(u16),

    /// The response body did not match the expected shape.
    #[error("decoding failed: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The API returned its plain-text rate-limit body.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The request was superseded before it completed.
    #[error("request cancelled")]
    Cancelled,
}
