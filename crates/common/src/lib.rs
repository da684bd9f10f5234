//! Common types, protocol definitions, and errors shared across `lockbox` crates.

pub mod error;
pub mod protocol;

pub use error::{EncryptError, ServiceError, ValidationError};
