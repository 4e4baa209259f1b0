//! Serialization for typing notifications.
//!
//! Provides postcard encode/decode plus length-prefix framing variants for
//! stream-based transports.

use crate::typing::TypingMessage;

/// Size of the little-endian length prefix in a framed message.
const PREFIX_LEN: usize = 4;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Frame is incomplete or has an invalid length prefix.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

/// Encodes a [`TypingMessage`] into a byte vector using postcard.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the message cannot be serialized.
pub fn encode(message: &TypingMessage) -> Result<Vec<u8>, CodecError> {
    postcard::to_allocvec(message).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a [`TypingMessage`] from a byte slice using postcard.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the bytes cannot be deserialized.
pub fn decode(bytes: &[u8]) -> Result<TypingMessage, CodecError> {
    postcard::from_bytes(bytes).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Encodes a [`TypingMessage`] with a 4-byte little-endian length prefix.
///
/// Wire format: `[u32 length (LE)][payload bytes]`
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the message cannot be serialized,
/// or `CodecError::InvalidFrame` if the payload exceeds `u32::MAX` bytes.
pub fn encode_framed(message: &TypingMessage) -> Result<Vec<u8>, CodecError> {
    let payload = encode(message)?;
    let len = u32::try_from(payload.len()).map_err(|_| {
        CodecError::InvalidFrame(format!(
            "payload too large for framing: {} bytes",
            payload.len()
        ))
    })?;
    let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decodes a length-prefixed frame back into a [`TypingMessage`].
///
/// Returns the decoded message and the total number of bytes consumed from
/// the input, including the length prefix.
///
/// # Errors
///
/// Returns `CodecError::InvalidFrame` if the input is shorter than the
/// prefix or than the length it announces, or `CodecError::Serialization`
/// if the payload cannot be deserialized.
pub fn decode_framed(bytes: &[u8]) -> Result<(TypingMessage, usize), CodecError> {
    let Some((prefix, rest)) = bytes.split_first_chunk::<PREFIX_LEN>() else {
        return Err(CodecError::InvalidFrame(format!(
            "need at least {PREFIX_LEN} bytes for length prefix, got {}",
            bytes.len()
        )));
    };
    let payload_len = u32::from_le_bytes(*prefix) as usize;

    let Some(payload) = rest.get(..payload_len) else {
        return Err(CodecError::InvalidFrame(format!(
            "frame indicates {payload_len} bytes but only {} available",
            rest.len()
        )));
    };

    let message = decode(payload)?;
    Ok((message, PREFIX_LEN + payload_len))
}
