//! Codec error types.

/// Errors that can occur while encoding or decoding a publication payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Failed to encode a value to the binary (MessagePack) wire format.
    #[error("failed to encode binary payload: {0}")]
    Binary(#[from] rmp_serde::encode::Error),

    /// Failed to decode a value from the binary wire format.
    #[error("failed to decode binary payload: {0}")]
    BinaryDecode(#[from] rmp_serde::decode::Error),

    /// Failed to encode or decode a value in the textual (JSON) wire format.
    #[error("failed to encode/decode textual payload: {0}")]
    Textual(#[from] serde_json::Error),
}
