//! Plaintext checks and the encryption flow.
//!
//! ```text
//! Received ──guard──► key validation ──► Validated ──KMS encrypt──► Completed
//!    │                     │                               │
//!    └──► Rejected ◄───────┘                               └──► Failed
//! ```
//!
//! Validation runs entirely in memory; Cloud KMS is called at most once per
//! request and only after both checks pass.

pub mod guard;
pub mod orchestrator;

pub use orchestrator::EncryptionOrchestrator;
