//! Shared constants.

/// Number of hex characters kept from a SHA-256 digest for construction ids.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Attribute name backends use for the resource's qualified name.
pub const ARN_ATTRIBUTE: &str = "arn";

/// Prefix of simulated ARNs produced by the in-memory backend.
pub const ARN_PREFIX: &str = "arn:skyform";
