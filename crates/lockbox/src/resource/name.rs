//! [`KeyRingPath`] and [`KeyIdentifier`] value types.

use std::fmt;

use common::ValidationError;

/// Longest short name accepted for a crypto key.
pub const MAX_SHORT_NAME_LEN: usize = 63;

const CRYPTO_KEYS_SEGMENT: &str = "/cryptoKeys/";

/// Resource name of the configured key ring,
/// `projects/{project}/locations/{location}/keyRings/{ring}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRingPath {
    parent: String,
    key_prefix: String,
}

impl KeyRingPath {
    /// Build the key ring path from its three segments.
    pub fn new(project: &str, location: &str, ring: &str) -> Self {
        let parent = format!("projects/{project}/locations/{location}/keyRings/{ring}");
        let key_prefix = format!("{parent}{CRYPTO_KEYS_SEGMENT}");
        Self { parent, key_prefix }
    }

    /// The key ring resource name, used as the parent of list calls.
    pub fn as_str(&self) -> &str {
        &self.parent
    }

    /// Prefix shared by every crypto key in this ring (ends with `/cryptoKeys/`).
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

impl fmt::Display for KeyRingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parent)
    }
}

/// A crypto key resource name that has passed validation against the
/// configured key ring.
///
/// There is no public constructor other than [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdentifier {
    full: String,
    short_start: usize,
}

impl KeyIdentifier {
    /// The full resource name, exactly as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The short name: everything after `/cryptoKeys/`.
    pub fn short_name(&self) -> &str {
        &self.full[self.short_start..]
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Validate a client-supplied key name against the configured key ring.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] if `candidate` is empty.
/// - [`ValidationError::InvalidFormat`] if it is outside the key ring or the
///   short name is empty or contains characters outside `[A-Za-z0-9_-]`.
/// - [`ValidationError::NameTooLong`] if the short name exceeds
///   [`MAX_SHORT_NAME_LEN`] characters.
pub fn validate(candidate: &str, ring: &KeyRingPath) -> Result<KeyIdentifier, ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::MissingField("key"));
    }

    let short_name = candidate
        .strip_prefix(ring.key_prefix())
        .ok_or(ValidationError::InvalidFormat(
            "key must belong to the configured key ring",
        ))?;

    if short_name.is_empty() || !short_name.bytes().all(is_name_byte) {
        return Err(ValidationError::InvalidFormat(
            "key name may only contain letters, digits, '_' and '-'",
        ));
    }

    // ASCII only at this point, so bytes == characters.
    if short_name.len() > MAX_SHORT_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len: short_name.len(),
            max: MAX_SHORT_NAME_LEN,
        });
    }

    Ok(KeyIdentifier {
        full: candidate.to_owned(),
        short_start: ring.key_prefix().len(),
    })
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
