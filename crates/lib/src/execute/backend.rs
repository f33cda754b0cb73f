//! The provisioning backend seam.
//!
//! The orchestrator hands every rendered [`ResourceDefinition`] to a
//! [`Backend`] and records the handle it returns. [`InMemoryBackend`] is a
//! deterministic stand-in used for planning, tests, and dry runs.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::consts::{ARN_ATTRIBUTE, ARN_PREFIX};
use crate::manifest::ResourceDefinition;
use crate::spec::RawHandle;

/// A backend's refusal to provision a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
  pub message: String,
}

impl BackendError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Consumes finished definitions and produces live resource handles.
pub trait Backend {
  fn provision(&mut self, definition: &ResourceDefinition) -> Result<RawHandle, BackendError>;
}

/// Simulated backend that records definitions and fabricates handles.
///
/// Physical ids are `{kind}-{construction id}`; every handle carries an
/// `arn` attribute of the form `arn:skyform:{kind}:::{name}`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
  provisioned: Vec<ResourceDefinition>,
  fail_on: HashSet<String>,
}

impl InMemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reject the resource named `name` when it is provisioned.
  pub fn failing_on(mut self, name: impl Into<String>) -> Self {
    self.fail_on.insert(name.into());
    self
  }

  /// Definitions received so far, in the order they arrived.
  pub fn provisioned(&self) -> &[ResourceDefinition] {
    &self.provisioned
  }

  pub fn definition(&self, name: &str) -> Option<&ResourceDefinition> {
    self.provisioned.iter().find(|d| d.name == name)
  }
}

impl Backend for InMemoryBackend {
  fn provision(&mut self, definition: &ResourceDefinition) -> Result<RawHandle, BackendError> {
    if self.fail_on.contains(&definition.name) {
      return Err(BackendError::new(format!("simulated failure for {}", definition.name)));
    }

    let handle = RawHandle::new(format!("{}-{}", definition.kind, definition.id)).with_attribute(
      ARN_ATTRIBUTE,
      format!("{}:{}:::{}", ARN_PREFIX, definition.kind, definition.name),
    );
    debug!(resource = %definition.name, physical_id = %handle.physical_id, "simulated provision");
    self.provisioned.push(definition.clone());
    Ok(handle)
  }
}
