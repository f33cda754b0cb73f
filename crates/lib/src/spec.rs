//! Finalized specs, their reference cells, and live handles.
//!
//! A [`Spec`] is created empty by [`Config::finalize`](crate::resource::Config::finalize)
//! and filled exactly once by the orchestrator after the backend realizes
//! the resource. Clones of a spec share the same cell, so every dependent
//! holding a [`Ref::Deferred`](crate::reference::Ref::Deferred) observes the
//! fill.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::ARN_ATTRIBUTE;
use crate::error::{Error, Result};
use crate::resource::ResourceKind;
use crate::util::hash::{Hashable, ObjectHash};

/// Untyped identifier of a live resource, as returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHandle {
  /// Backend-assigned identifier.
  pub physical_id: String,

  /// Extra values the backend reports (qualified name, endpoint, url...).
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub attributes: BTreeMap<String, String>,
}

impl RawHandle {
  pub fn new(physical_id: impl Into<String>) -> Self {
    Self {
      physical_id: physical_id.into(),
      attributes: BTreeMap::new(),
    }
  }

  pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.insert(key.into(), value.into());
    self
  }

  pub fn attribute(&self, key: &str) -> Option<&str> {
    self.attributes.get(key).map(String::as_str)
  }
}

/// A live resource of kind `K`.
pub struct Handle<K> {
  raw: RawHandle,
  _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
  /// A handle to infrastructure that already exists outside this pass.
  pub fn external(physical_id: impl Into<String>) -> Self {
    Self::from_raw(RawHandle::new(physical_id))
  }

  pub fn from_raw(raw: RawHandle) -> Self {
    Self {
      raw,
      _kind: PhantomData,
    }
  }

  pub fn physical_id(&self) -> &str {
    &self.raw.physical_id
  }

  pub fn attribute(&self, key: &str) -> Option<&str> {
    self.raw.attribute(key)
  }

  /// The qualified name if the backend reported one, else the physical id.
  pub fn arn(&self) -> &str {
    self.attribute(ARN_ATTRIBUTE).unwrap_or(&self.raw.physical_id)
  }

  pub fn raw(&self) -> &RawHandle {
    &self.raw
  }

  pub fn into_raw(self) -> RawHandle {
    self.raw
  }
}

impl<K> Clone for Handle<K> {
  fn clone(&self) -> Self {
    Self::from_raw(self.raw.clone())
  }
}

impl<K> PartialEq for Handle<K> {
  fn eq(&self, other: &Self) -> bool {
    self.raw == other.raw
  }
}

impl<K> Eq for Handle<K> {}

impl<K> fmt::Debug for Handle<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Handle").field(&self.raw).finish()
  }
}

/// Single-assignment holder for a realized resource's handle.
///
/// Transitions only from empty to filled. Backed by `OnceLock`, so a
/// concurrent second fill loses deterministically instead of overwriting.
pub struct ReferenceCell<H> {
  resource: String,
  slot: OnceLock<H>,
}

impl<H> ReferenceCell<H> {
  pub fn new(resource: impl Into<String>) -> Self {
    Self {
      resource: resource.into(),
      slot: OnceLock::new(),
    }
  }

  /// Store `handle`.
  ///
  /// # Errors
  ///
  /// Returns `DoubleResolution` if the cell is already filled; the stored
  /// handle is left untouched.
  pub fn fill(&self, handle: H) -> Result<()> {
    self.slot.set(handle).map_err(|_| Error::DoubleResolution {
      resource: self.resource.clone(),
    })
  }

  /// Read the stored handle.
  ///
  /// # Errors
  ///
  /// Returns `NotYetResolved` if the cell is still empty.
  pub fn read(&self) -> Result<&H> {
    self.slot.get().ok_or_else(|| Error::not_yet_resolved(&self.resource))
  }

  pub fn is_filled(&self) -> bool {
    self.slot.get().is_some()
  }

  pub fn resource(&self) -> &str {
    &self.resource
  }
}

impl<H: fmt::Debug> fmt::Debug for ReferenceCell<H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ReferenceCell")
      .field("resource", &self.resource)
      .field("handle", &self.slot.get())
      .finish()
  }
}

#[derive(Serialize)]
struct Identity<'a> {
  kind: &'a str,
  name: &'a str,
}

impl Hashable for Identity<'_> {}

/// Compute the construction id of a resource.
pub fn construction_id(kind: &str, name: &str) -> Result<ObjectHash> {
  Ok(Identity { kind, name }.compute_hash()?)
}

/// Identity of one finalized spec, shared by all of its clones.
///
/// Two specs finalized from configs with the same kind and name share a
/// construction id but never a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecKey(usize);

struct SpecInner<K: ResourceKind> {
  name: String,
  id: ObjectHash,
  properties: K::Properties,
  cell: ReferenceCell<Handle<K>>,
}

/// A named, finalized, construction-ready resource description.
pub struct Spec<K: ResourceKind> {
  inner: Arc<SpecInner<K>>,
}

impl<K: ResourceKind> Spec<K> {
  pub(crate) fn new(name: String, properties: K::Properties) -> Result<Self> {
    let id = construction_id(K::KIND, &name)?;
    let cell = ReferenceCell::new(name.clone());
    Ok(Self {
      inner: Arc::new(SpecInner {
        name,
        id,
        properties,
        cell,
      }),
    })
  }

  pub fn name(&self) -> &str {
    &self.inner.name
  }

  pub fn kind(&self) -> &'static str {
    K::KIND
  }

  /// Construction id: a hash of kind and name.
  pub fn id(&self) -> &ObjectHash {
    &self.inner.id
  }

  pub fn properties(&self) -> &K::Properties {
    &self.inner.properties
  }

  pub fn cell(&self) -> &ReferenceCell<Handle<K>> {
    &self.inner.cell
  }

  /// Record the live handle once the backend has realized this resource.
  ///
  /// # Errors
  ///
  /// Returns `DoubleResolution` if the spec was already filled.
  pub fn fill(&self, handle: Handle<K>) -> Result<()> {
    let physical_id = handle.physical_id().to_string();
    self.inner.cell.fill(handle)?;
    debug!(resource = %self.name(), kind = K::KIND, physical_id = %physical_id, "filled reference cell");
    Ok(())
  }

  /// The live handle.
  ///
  /// # Errors
  ///
  /// Returns `NotYetResolved` if the spec has not been realized.
  pub fn handle(&self) -> Result<Handle<K>> {
    self.inner.cell.read().cloned()
  }

  pub fn is_resolved(&self) -> bool {
    self.inner.cell.is_filled()
  }

  /// Whether both values are clones of the same spec.
  pub fn same_spec(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }

  /// Key identifying this spec. Valid while any clone is alive.
  pub fn key(&self) -> SpecKey {
    SpecKey(Arc::as_ptr(&self.inner) as *const () as usize)
  }
}

impl<K: ResourceKind> Clone for Spec<K> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<K: ResourceKind> fmt::Debug for Spec<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Properties may hold refs back into other specs; keep this shallow.
    f.debug_struct("Spec")
      .field("kind", &K::KIND)
      .field("name", &self.inner.name)
      .field("id", &self.inner.id)
      .field("resolved", &self.is_resolved())
      .finish()
  }
}
