//! Types for realizing a declared stack.
//!
//! This module defines the orchestrator configuration, the plan produced
//! before any backend contact, and the deployment record produced after.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;
use crate::spec::RawHandle;
use crate::util::hash::ObjectHash;

/// Order in which declared resources are realized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOrder {
  /// Exactly the order resources were added to the stack.
  #[default]
  Declaration,
  /// Dependencies first, ties broken by declaration order.
  Topological,
}

/// Configuration for a realization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
  /// How to order resources.
  pub order: ExecutionOrder,

  /// Check every deferred reference against the chosen order before the
  /// backend is contacted.
  pub preflight: bool,
}

impl Default for OrchestratorConfig {
  fn default() -> Self {
    Self {
      order: ExecutionOrder::Declaration,
      preflight: true,
    }
  }
}

impl OrchestratorConfig {
  pub fn with_order(mut self, order: ExecutionOrder) -> Self {
    self.order = order;
    self
  }

  pub fn with_preflight(mut self, preflight: bool) -> Self {
    self.preflight = preflight;
    self
  }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedResource {
  pub kind: &'static str,
  pub name: String,
  pub id: ObjectHash,
  /// Names of declared resources this one waits on.
  pub depends_on: Vec<String>,
}

/// Result of a successful realization pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Deployment {
  /// Construction ids in the order they were realized.
  pub order: Vec<ObjectHash>,

  /// Every definition handed to the backend.
  pub manifest: Manifest,

  /// Handles returned by the backend, by construction id.
  pub handles: BTreeMap<ObjectHash, RawHandle>,
}

impl Deployment {
  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  /// Resource names in realization order.
  pub fn realized_names(&self) -> Vec<&str> {
    self
      .order
      .iter()
      .filter_map(|id| self.manifest.resources.get(id))
      .map(|d| d.name.as_str())
      .collect()
  }

  /// The handle returned for a resource, by kind and name.
  pub fn handle(&self, kind: &str, name: &str) -> Option<&RawHandle> {
    let definition = self.manifest.get(kind, name)?;
    self.handles.get(&definition.id)
  }
}
