//! Hashing utilities for construction ids and definition fingerprints.
//!
//! This module provides:
//! - `ObjectHash`: a truncated 20-character hash used as a construction id
//! - `ContentHash`: a full 64-character hash of a rendered definition
//! - `Hashable`: derive an `ObjectHash` from any serializable value

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A content-addressed hash identifying a unique object.
///
/// The hash is a 20-character truncated SHA-256 of the JSON-serialized value.
/// Identical inputs always produce the same id, so two passes over the same
/// declarations agree on every construction id.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string, e.g., `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    let full = hash_bytes(serialized.as_bytes());
    Ok(ObjectHash(full.0[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

/// A full 64-character SHA256 hash of rendered content.
///
/// Unlike `ObjectHash`, which only identifies a resource, `ContentHash`
/// changes whenever any rendered property changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash a JSON value.
///
/// `serde_json::Value` objects are backed by a sorted map, so the output is
/// independent of the order in which properties were inserted.
pub fn hash_json(value: &serde_json::Value) -> Result<ContentHash, HashError> {
  let serialized = serde_json::to_string(value)?;
  Ok(hash_bytes(serialized.as_bytes()))
}

/// Hash arbitrary bytes.
///
/// Returns the full 64-character SHA256 hash.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[derive(Serialize)]
  struct Identity<'a> {
    kind: &'a str,
    name: &'a str,
  }

  impl Hashable for Identity<'_> {}

  #[test]
  fn object_hash_is_truncated() {
    let hash = Identity { kind: "queue", name: "orders" }.compute_hash().unwrap();
    assert_eq!(hash.0.len(), OBJ_HASH_PREFIX_LEN);
  }

  #[test]
  fn object_hash_is_deterministic() {
    let a = Identity { kind: "queue", name: "orders" }.compute_hash().unwrap();
    let b = Identity { kind: "queue", name: "orders" }.compute_hash().unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn object_hash_differs_by_kind() {
    let queue = Identity { kind: "queue", name: "orders" }.compute_hash().unwrap();
    let bucket = Identity { kind: "bucket", name: "orders" }.compute_hash().unwrap();
    assert_ne!(queue, bucket);
  }

  #[test]
  fn json_hash_ignores_insertion_order() {
    let mut a = serde_json::Map::new();
    a.insert("x".to_string(), json!(1));
    a.insert("y".to_string(), json!(2));

    let mut b = serde_json::Map::new();
    b.insert("y".to_string(), json!(2));
    b.insert("x".to_string(), json!(1));

    assert_eq!(
      hash_json(&serde_json::Value::Object(a)).unwrap(),
      hash_json(&serde_json::Value::Object(b)).unwrap()
    );
  }

  #[test]
  fn hash_bytes_is_full_length() {
    assert_eq!(hash_bytes(b"hello world").0.len(), 64);
  }
}
