//! Error taxonomy for configuration, resolution, and realization.
//!
//! Every variant is terminal for the current pass: a missing field, an
//! unresolved reference, or a backend failure aborts the whole set of
//! declared resources.

use thiserror::Error;

/// Errors produced while folding, finalizing, resolving, or realizing
/// resources.
#[derive(Debug, Error)]
pub enum Error {
  /// A mandatory field was still absent after merging and defaulting.
  #[error("resource '{resource}' is missing required field '{field}'")]
  MissingRequiredField { resource: String, field: &'static str },

  /// A deferred reference was read before its resource was realized.
  #[error("resource '{resource}' is not yet resolved: {hint}")]
  NotYetResolved { resource: String, hint: String },

  /// A reference cell was filled a second time.
  #[error("resource '{resource}' was already resolved")]
  DoubleResolution { resource: String },

  /// Two declarations share the same kind and name.
  #[error("duplicate {kind} resource '{name}'")]
  DuplicateResource { kind: &'static str, name: String },

  /// The deferred reference graph contains a cycle.
  ///
  /// Specs only reference specs finalized before them, so a stack built
  /// through the public API cannot produce this. The DAG checks anyway.
  #[error("dependency cycle detected")]
  CycleDetected,

  /// The provisioning backend rejected a definition.
  #[error("backend failed to provision '{resource}': {message}")]
  Backend { resource: String, message: String },

  /// Rendering or hashing a definition failed.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Build a `NotYetResolved` error with the standard ordering hint.
  pub fn not_yet_resolved(resource: impl Into<String>) -> Self {
    let resource = resource.into();
    let hint = format!("ensure '{resource}' is realized before others reference it");
    Error::NotYetResolved { resource, hint }
  }

  /// Build a `NotYetResolved` error naming the resource that holds the
  /// reference.
  pub fn not_yet_resolved_for(resource: impl Into<String>, referrer: &str) -> Self {
    let resource = resource.into();
    let hint = format!("declare '{resource}' before '{referrer}' so it is realized before '{referrer}' resolves it");
    Error::NotYetResolved { resource, hint }
  }

  /// Build a `NotYetResolved` error for a reference to a spec that was never
  /// declared in the stack being realized.
  pub fn not_declared(resource: impl Into<String>, referrer: &str) -> Self {
    let resource = resource.into();
    let hint = format!("'{referrer}' references a '{resource}' that was never added to the stack");
    Error::NotYetResolved { resource, hint }
  }

  /// Build a `MissingRequiredField` error.
  pub fn missing(resource: &str, field: &'static str) -> Self {
    Error::MissingRequiredField {
      resource: resource.to_string(),
      field,
    }
  }

  /// Name of the resource the error is about, when there is one.
  pub fn resource(&self) -> Option<&str> {
    match self {
      Error::MissingRequiredField { resource, .. }
      | Error::NotYetResolved { resource, .. }
      | Error::DoubleResolution { resource }
      | Error::Backend { resource, .. } => Some(resource),
      Error::DuplicateResource { name, .. } => Some(name),
      Error::CycleDetected | Error::Serialization(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
