//! skyform-lib: Core types and logic for Skyform
//!
//! This crate provides the declarative building blocks for cloud stacks:
//! - `Merge`: the Zero/Combine algebra over configuration fragments
//! - `Config`: a named, mergeable configuration that finalizes into a `Spec`
//! - `Spec`: immutable resource properties plus a write-once reference cell
//! - `Ref`: a direct handle or a deferred reference to another spec
//! - `Stack`: resources declared for one realization pass
//! - `Orchestrator`: realizes a stack against a `Backend` and fills cells

pub mod consts;
pub mod error;
pub mod execute;
pub mod manifest;
pub mod merge;
pub mod reference;
pub mod resource;
pub mod resources;
pub mod spec;
pub mod stack;
pub mod util;

pub use error::{Error, Result};
pub use execute::{
  Backend, BackendError, Deployment, ExecutionOrder, InMemoryBackend, Orchestrator, OrchestratorConfig,
  PlannedResource,
};
pub use manifest::{Manifest, ResourceDefinition};
pub use merge::Merge;
pub use reference::{Dependency, Ref};
pub use resource::{Config, ResourceKind};
pub use spec::{Handle, RawHandle, ReferenceCell, Spec, SpecKey};
pub use stack::{Declared, Stack};
