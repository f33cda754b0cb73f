//! Explicit registry of declared resources.
//!
//! Authors add configs to a [`Stack`] in declaration order. Each add
//! finalizes the config and hands back the [`Spec`], which later
//! declarations can reference through [`Ref`](crate::reference::Ref).

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::reference::Dependency;
use crate::resource::{Config, ResourceKind};
use crate::spec::{Handle, RawHandle, Spec, SpecKey};
use crate::util::hash::ObjectHash;

/// A type-erased declared resource, as seen by the orchestrator.
pub trait Declared: fmt::Debug + Send + Sync {
  fn kind(&self) -> &'static str;

  fn name(&self) -> &str;

  fn id(&self) -> &ObjectHash;

  /// Identity of the underlying spec; see [`SpecKey`].
  fn key(&self) -> SpecKey;

  fn dependencies(&self) -> Vec<Dependency>;

  /// Render properties, resolving every reference.
  fn render(&self) -> Result<serde_json::Value>;

  fn is_resolved(&self) -> bool;

  /// Fill the reference cell with a handle returned by the backend.
  fn fill_raw(&self, handle: RawHandle) -> Result<()>;
}

impl<K: ResourceKind> Declared for Spec<K> {
  fn kind(&self) -> &'static str {
    K::KIND
  }

  fn name(&self) -> &str {
    Spec::name(self)
  }

  fn id(&self) -> &ObjectHash {
    Spec::id(self)
  }

  fn key(&self) -> SpecKey {
    Spec::key(self)
  }

  fn dependencies(&self) -> Vec<Dependency> {
    K::dependencies(self.properties())
  }

  fn render(&self) -> Result<serde_json::Value> {
    K::render(self.properties())
  }

  fn is_resolved(&self) -> bool {
    Spec::is_resolved(self)
  }

  fn fill_raw(&self, handle: RawHandle) -> Result<()> {
    self.fill(Handle::from_raw(handle))
  }
}

/// Resources declared for one pass, in declaration order.
#[derive(Debug)]
pub struct Stack {
  name: String,
  entries: Vec<Box<dyn Declared>>,
  /// Declared names, per kind.
  identities: HashMap<&'static str, HashSet<String>>,
}

impl Stack {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      entries: Vec::new(),
      identities: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Finalize `config` and declare the resulting spec.
  ///
  /// # Errors
  ///
  /// Returns `MissingRequiredField` if finalization fails, or
  /// `DuplicateResource` if a resource of the same kind and name was
  /// already declared.
  pub fn add<K: ResourceKind>(&mut self, config: Config<K>) -> Result<Spec<K>> {
    self.check_unique(K::KIND, config.name())?;
    let spec = config.finalize()?;
    self.push(spec.clone());
    Ok(spec)
  }

  /// Declare a spec that was finalized elsewhere.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateResource` if a resource of the same kind and name was
  /// already declared.
  pub fn insert<K: ResourceKind>(&mut self, spec: &Spec<K>) -> Result<()> {
    self.check_unique(K::KIND, spec.name())?;
    self.push(spec.clone());
    Ok(())
  }

  fn check_unique(&self, kind: &'static str, name: &str) -> Result<()> {
    if self.identities.get(kind).is_some_and(|names| names.contains(name)) {
      return Err(Error::DuplicateResource {
        kind,
        name: name.to_string(),
      });
    }
    Ok(())
  }

  fn push<K: ResourceKind>(&mut self, spec: Spec<K>) {
    debug!(stack = %self.name, resource = %spec.name(), kind = K::KIND, position = self.entries.len(), "declared resource");
    self
      .identities
      .entry(K::KIND)
      .or_default()
      .insert(spec.name().to_string());
    self.entries.push(Box::new(spec));
  }

  /// Declared resources, in declaration order.
  pub fn entries(&self) -> impl Iterator<Item = &dyn Declared> {
    self.entries.iter().map(|e| e.as_ref())
  }

  pub fn entry(&self, index: usize) -> Option<&dyn Declared> {
    self.entries.get(index).map(|e| e.as_ref())
  }

  /// Look up a declared resource by kind and name.
  pub fn get_declared(&self, kind: &str, name: &str) -> Option<&dyn Declared> {
    self.position(kind, name).and_then(|i| self.entry(i))
  }

  /// Position of a resource in declaration order.
  pub fn position(&self, kind: &str, name: &str) -> Option<usize> {
    self.entries.iter().position(|e| e.kind() == kind && e.name() == name)
  }

  /// Resource names, in declaration order.
  pub fn names(&self) -> Vec<&str> {
    self.entries.iter().map(|e| e.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
