//! Presence and size checks on user-supplied plaintext.

use common::ValidationError;

/// Exclusive upper bound on plaintext size: 64 KiB, matching the Cloud KMS
/// limit for symmetric encryption.
pub const MAX_PLAINTEXT_BYTES: usize = 64 * 1024;

/// Check that `text` is non-empty and strictly smaller than
/// [`MAX_PLAINTEXT_BYTES`]. The payload is not modified.
///
/// # Errors
///
/// [`ValidationError::MissingField`] for empty input,
/// [`ValidationError::PayloadTooLarge`] at or above the limit.
pub fn check(text: &[u8]) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingField("text"));
    }
    if text.len() >= MAX_PLAINTEXT_BYTES {
        return Err(ValidationError::PayloadTooLarge {
            len: text.len(),
            limit: MAX_PLAINTEXT_BYTES,
        });
    }
    Ok(())
}
