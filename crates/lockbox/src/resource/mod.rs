//! Key resource names: the configured key ring and validated key identifiers.
//!
//! Every key name sent to Cloud KMS for encryption is a [`KeyIdentifier`],
//! which can only be obtained through [`validate`]. The identifier is therefore
//! guaranteed to name a key inside the single configured key ring.
//!
//! ```text
//! projects/{project}/locations/{location}/keyRings/{ring}/cryptoKeys/{short_name}
//! ```

pub mod name;

pub use name::{validate, KeyIdentifier, KeyRingPath};
