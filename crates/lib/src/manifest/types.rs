//! Manifest types for skyform.
//!
//! A [`ResourceDefinition`] is the fully-formed, backend-facing description
//! of one resource. The [`Manifest`] collects every definition handed to the
//! backend during one pass, keyed by construction id.
//!
//! # Ordering
//!
//! Uses [`BTreeMap`] to ensure deterministic serialization order, which is
//! important for reproducible manifest hashes.
//!
//! # Example
//!
//! ```json
//! {
//!   "resources": {
//!     "a1b2c3d4e5f6789012ab": {
//!       "kind": "queue",
//!       "name": "orders",
//!       "id": "a1b2c3d4e5f6789012ab",
//!       "properties": { "fifo": false, ... },
//!       "hash": "9f86d0..."
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::util::hash::{ContentHash, Hashable, ObjectHash, hash_json};

/// A rendered resource, ready for the provisioning backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
  pub kind: String,
  pub name: String,
  /// Construction id of the spec this was rendered from.
  pub id: ObjectHash,
  pub properties: serde_json::Value,
  /// Hash of the rendered properties.
  pub hash: ContentHash,
}

impl ResourceDefinition {
  pub fn new(kind: &str, name: &str, id: ObjectHash, properties: serde_json::Value) -> Result<Self> {
    let hash = hash_json(&properties)?;
    Ok(Self {
      kind: kind.to_string(),
      name: name.to_string(),
      id,
      properties,
      hash,
    })
  }
}

/// Every definition handed to the backend during one pass.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  pub resources: BTreeMap<ObjectHash, ResourceDefinition>,
}

impl Manifest {
  pub fn insert(&mut self, definition: ResourceDefinition) {
    self.resources.insert(definition.id.clone(), definition);
  }

  /// Find a definition by kind and name.
  pub fn get(&self, kind: &str, name: &str) -> Option<&ResourceDefinition> {
    self.resources.values().find(|d| d.kind == kind && d.name == name)
  }

  pub fn len(&self) -> usize {
    self.resources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.resources.is_empty()
  }
}

impl Hashable for Manifest {}
