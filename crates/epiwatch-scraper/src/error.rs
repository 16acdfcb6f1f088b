use thiserror::Error;

/// Failures while obtaining the source page.
///
/// All variants are recovered inside [`crate::extract`] — they exist so the
/// log line can say what went wrong, not to propagate upward.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("client init failed: {0}")]
    ClientInit(String),

    /// The request failed in flight (connect error, timeout, TLS, DNS).
    #[error("request failed: {0}")]
    Request(String),

    /// The source answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),
}
