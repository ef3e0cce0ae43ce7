//! Wire Payload Decoding
//!
//! Channel payloads travel as UTF-8 text: numeric values as ASCII decimal
//! strings, metadata as free-form text. Every write funnels through these
//! decoders so a malformed payload is rejected before any state is touched.

use crate::shared::error::AppError;

/// Decode a payload into a non-negative integer.
///
/// Surrounding whitespace is tolerated; signs, fractions, and empty
/// payloads are not.
pub fn decode_uint(payload: &[u8]) -> Result<u64, AppError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| AppError::InvalidInput("payload is not valid UTF-8".into()))?;
    let trimmed = text.trim();

    trimmed.parse::<u64>().map_err(|_| {
        AppError::InvalidInput(format!(
            "expected a non-negative integer, got {:?}",
            trimmed
        ))
    })
}

/// Decode a payload into a bounded UTF-8 string.
///
/// `max_bytes` mirrors the fixed characteristic buffer the physical
/// module exposes for the same value.
pub fn decode_text(payload: &[u8], max_bytes: usize) -> Result<String, AppError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| AppError::InvalidInput("payload is not valid UTF-8".into()))?;

    if text.len() > max_bytes {
        return Err(AppError::InvalidInput(format!(
            "payload exceeds {} bytes",
            max_bytes
        )));
    }

    Ok(text.to_owned())
}
