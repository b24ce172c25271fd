//! Domain models for devsite
//!
//! Pure value types: what was requested, where it lands on disk, and how each
//! step ended. None of them perform I/O.

pub mod outcome;
pub mod paths;
pub mod request;

pub use outcome::StepOutcome;
pub use paths::ResolvedPaths;
pub use request::{DatabaseIdentifier, ProvisioningRequest, host_label};
