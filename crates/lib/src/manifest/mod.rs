//! Rendered resource definitions and the manifest of a realization pass.
//!
//! Definitions are what the provisioning backend consumes: every reference
//! already resolved, every default already applied.

mod types;

pub use types::*;
