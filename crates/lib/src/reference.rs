//! Forward references between resources.
//!
//! A [`Ref`] lets a dependent accept either a handle that already exists or
//! a spec declared in the same pass. Resolution is the single point where
//! readiness is checked.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::resource::ResourceKind;
use crate::spec::{Handle, Spec, SpecKey};
use crate::util::hash::ObjectHash;

/// A reference to a resource of kind `K`.
pub enum Ref<K: ResourceKind> {
  /// A live resource that exists outside this pass.
  Direct(Handle<K>),
  /// A resource declared in this pass, realized later.
  Deferred(Spec<K>),
}

impl<K: ResourceKind> Ref<K> {
  /// The live handle this reference points at.
  ///
  /// # Errors
  ///
  /// Returns `NotYetResolved` for a deferred reference whose spec has not
  /// been filled.
  pub fn resolve(&self) -> Result<Handle<K>> {
    match self {
      Ref::Direct(handle) => Ok(handle.clone()),
      Ref::Deferred(spec) => spec.handle(),
    }
  }

  /// The declared resource this reference waits on, if any.
  pub fn dependency(&self) -> Option<Dependency> {
    match self {
      Ref::Direct(_) => None,
      Ref::Deferred(spec) => Some(Dependency {
        kind: K::KIND,
        name: spec.name().to_string(),
        id: spec.id().clone(),
        key: spec.key(),
        resolved: spec.is_resolved(),
      }),
    }
  }

  pub fn is_ready(&self) -> bool {
    match self {
      Ref::Direct(_) => true,
      Ref::Deferred(spec) => spec.is_resolved(),
    }
  }
}

/// Resolve a list of references, failing on the first unresolved one.
pub fn resolve_all<K: ResourceKind>(refs: &[Ref<K>]) -> Result<Vec<Handle<K>>> {
  refs.iter().map(Ref::resolve).collect()
}

/// Collect the dependencies of a list of references.
pub fn dependencies_of<'a, K, I>(refs: I) -> Vec<Dependency>
where
  K: ResourceKind,
  I: IntoIterator<Item = &'a Ref<K>>,
{
  refs.into_iter().filter_map(Ref::dependency).collect()
}

impl<K: ResourceKind> Clone for Ref<K> {
  fn clone(&self) -> Self {
    match self {
      Ref::Direct(handle) => Ref::Direct(handle.clone()),
      Ref::Deferred(spec) => Ref::Deferred(spec.clone()),
    }
  }
}

impl<K: ResourceKind> PartialEq for Ref<K> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Ref::Direct(a), Ref::Direct(b)) => a == b,
      (Ref::Deferred(a), Ref::Deferred(b)) => a.same_spec(b),
      _ => false,
    }
  }
}

impl<K: ResourceKind> fmt::Debug for Ref<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Ref::Direct(handle) => f.debug_tuple("Direct").field(handle).finish(),
      Ref::Deferred(spec) => f.debug_tuple("Deferred").field(spec).finish(),
    }
  }
}

impl<K: ResourceKind> From<Handle<K>> for Ref<K> {
  fn from(handle: Handle<K>) -> Self {
    Ref::Direct(handle)
  }
}

impl<K: ResourceKind> From<Spec<K>> for Ref<K> {
  fn from(spec: Spec<K>) -> Self {
    Ref::Deferred(spec)
  }
}

impl<K: ResourceKind> From<&Spec<K>> for Ref<K> {
  fn from(spec: &Spec<K>) -> Self {
    Ref::Deferred(spec.clone())
  }
}

/// A declared resource that a dependent waits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
  pub kind: &'static str,
  pub name: String,
  pub id: ObjectHash,
  /// The exact spec referenced. Matches a declared entry only if that entry
  /// is a clone of it.
  #[serde(skip)]
  pub key: SpecKey,
  /// Whether the dependency was already realized when this was collected.
  pub resolved: bool,
}
