//! Structured logging and optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, ciphertext or credentials** may appear in any span
//!   attribute or log field. Key short names and payload sizes are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
