use thiserror::Error;

/// A transport primitive failed for one destination.
///
/// Caught by the delivery engine and recorded in the per-destination
/// report — never propagated past the batch.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The rich (image) primitive was rejected — network, unsupported
    /// media, or transport refusal.
    #[error("image send failed: {0}")]
    Image(String),

    /// The plain-text primitive was rejected.
    #[error("text send failed: {0}")]
    Text(String),
}
