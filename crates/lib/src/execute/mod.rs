//! Realization of a declared stack.
//!
//! The orchestrator walks the stack in the configured order. For each
//! resource it:
//! 1. Renders the properties, resolving every reference
//! 2. Wraps them in a [`ResourceDefinition`] and hands it to the backend
//! 3. Fills the spec's reference cell with the returned handle
//!
//! Any error aborts the pass. Cells filled before the failure stay filled.

pub mod backend;
pub mod dag;
pub mod types;

use std::collections::HashSet;

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::manifest::ResourceDefinition;
use crate::stack::{Declared, Stack};
use crate::spec::SpecKey;

pub use backend::{Backend, BackendError, InMemoryBackend};
pub use dag::ExecutionDag;
pub use types::{Deployment, ExecutionOrder, OrchestratorConfig, PlannedResource};

/// Drives specs through the provisioning backend and fills their cells.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
  config: OrchestratorConfig,
}

impl Orchestrator {
  pub fn new(config: OrchestratorConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &OrchestratorConfig {
    &self.config
  }

  /// Declared resources in the order they will be realized.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` in topological mode if references form a cycle.
  pub fn ordered<'a>(&self, stack: &'a Stack) -> Result<Vec<&'a dyn Declared>> {
    match self.config.order {
      ExecutionOrder::Declaration => Ok(stack.entries().collect()),
      ExecutionOrder::Topological => {
        let order = ExecutionDag::from_stack(stack)?.topological_order()?;
        Ok(order.into_iter().filter_map(|position| stack.entry(position)).collect())
      }
    }
  }

  /// Compute the realization order without contacting a backend.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected`, or, with preflight enabled, any ordering
  /// violation `realize` would hit.
  pub fn plan(&self, stack: &Stack) -> Result<Vec<PlannedResource>> {
    let ordered = self.ordered(stack)?;
    if self.config.preflight {
      preflight(&ordered)?;
    }

    Ok(
      ordered
        .into_iter()
        .map(|entry| PlannedResource {
          kind: entry.kind(),
          name: entry.name().to_string(),
          id: entry.id().clone(),
          depends_on: entry.dependencies().into_iter().map(|d| d.name).collect(),
        })
        .collect(),
    )
  }

  /// Realize every declared resource against `backend`.
  ///
  /// # Errors
  ///
  /// - `NotYetResolved` if a resource references one that comes later
  /// - `DoubleResolution` if a resource was already realized
  /// - `Backend` if the backend rejects a definition
  /// - `CycleDetected` in topological mode
  pub fn realize<B>(&self, stack: &Stack, backend: &mut B) -> Result<Deployment>
  where
    B: Backend + ?Sized,
  {
    info!(
      stack = %stack.name(),
      resources = stack.len(),
      order = ?self.config.order,
      "starting realization pass"
    );

    let ordered = self.ordered(stack)?;
    if self.config.preflight {
      preflight(&ordered)?;
      debug!(stack = %stack.name(), "preflight passed");
    }

    let mut deployment = Deployment::default();

    for entry in ordered {
      let properties = entry.render()?;
      let definition = ResourceDefinition::new(entry.kind(), entry.name(), entry.id().clone(), properties)?;

      let handle = backend.provision(&definition).map_err(|e| {
        error!(resource = %entry.name(), kind = entry.kind(), error = %e, "backend failed");
        Error::Backend {
          resource: entry.name().to_string(),
          message: e.message,
        }
      })?;

      entry.fill_raw(handle.clone())?;
      info!(
        resource = %entry.name(),
        kind = entry.kind(),
        physical_id = %handle.physical_id,
        "resource realized"
      );

      deployment.order.push(definition.id.clone());
      deployment.handles.insert(definition.id.clone(), handle);
      deployment.manifest.insert(definition);
    }

    info!(stack = %stack.name(), realized = deployment.len(), "realization pass complete");
    Ok(deployment)
  }
}

/// Check that every deferred reference is satisfied by the time its holder
/// comes up in `ordered`, and that nothing was realized already.
///
/// A dependency is satisfied only by the exact spec it references: either
/// already filled, or declared and realized earlier in the pass. A declared
/// namesake does not count.
fn preflight(ordered: &[&dyn Declared]) -> Result<()> {
  let declared: HashSet<SpecKey> = ordered.iter().map(|entry| entry.key()).collect();
  let mut realized: HashSet<SpecKey> = HashSet::new();

  for entry in ordered {
    if entry.is_resolved() {
      return Err(Error::DoubleResolution {
        resource: entry.name().to_string(),
      });
    }

    for dep in entry.dependencies() {
      if dep.resolved || realized.contains(&dep.key) {
        continue;
      }
      if !declared.contains(&dep.key) {
        return Err(Error::not_declared(dep.name, entry.name()));
      }
      return Err(Error::not_yet_resolved_for(dep.name, entry.name()));
    }

    realized.insert(entry.key());
  }

  Ok(())
}
