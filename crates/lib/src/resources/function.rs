//! Serverless functions.
//!
//! A function needs a handler, a code location, and an execution role. It
//! may be attached to a network and subscribed to queues; both are
//! references that resolve when the function is rendered.

use std::collections::BTreeMap;

use serde_json::json;

use crate::error::{Error, Result};
use crate::merge_fields;
use crate::reference::{Dependency, Ref, dependencies_of, resolve_all};
use crate::resource::{Config, ResourceKind};

use super::queue::Queue;
use super::role::Role;
use super::vpc::Vpc;

pub const DEFAULT_RUNTIME: &str = "provided.al2023";
pub const DEFAULT_MEMORY_MB: u32 = 128;
pub const DEFAULT_TIMEOUT_SECS: u32 = 3;

pub struct Function;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FunctionFragment {
  pub handler: Option<String>,
  pub code: Option<String>,
  pub role: Option<Ref<Role>>,
  pub runtime: Option<String>,
  pub memory_mb: Option<u32>,
  pub timeout_secs: Option<u32>,
  pub vpc: Option<Ref<Vpc>>,
  pub event_sources: Vec<Ref<Queue>>,
  pub environment: BTreeMap<String, String>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(FunctionFragment {
  handler,
  code,
  role,
  runtime,
  memory_mb,
  timeout_secs,
  vpc,
  event_sources,
  environment,
  tags,
});

impl FunctionFragment {
  pub fn handler(handler: impl Into<String>) -> Self {
    Self {
      handler: Some(handler.into()),
      ..Default::default()
    }
  }

  /// Location of the deployment package.
  pub fn code(location: impl Into<String>) -> Self {
    Self {
      code: Some(location.into()),
      ..Default::default()
    }
  }

  pub fn role(role: impl Into<Ref<Role>>) -> Self {
    Self {
      role: Some(role.into()),
      ..Default::default()
    }
  }

  pub fn runtime(runtime: impl Into<String>) -> Self {
    Self {
      runtime: Some(runtime.into()),
      ..Default::default()
    }
  }

  pub fn memory_mb(mb: u32) -> Self {
    Self {
      memory_mb: Some(mb),
      ..Default::default()
    }
  }

  pub fn timeout_secs(secs: u32) -> Self {
    Self {
      timeout_secs: Some(secs),
      ..Default::default()
    }
  }

  pub fn vpc(vpc: impl Into<Ref<Vpc>>) -> Self {
    Self {
      vpc: Some(vpc.into()),
      ..Default::default()
    }
  }

  /// Invoke the function for messages arriving on `queue`.
  pub fn event_source(queue: impl Into<Ref<Queue>>) -> Self {
    Self {
      event_sources: vec![queue.into()],
      ..Default::default()
    }
  }

  pub fn env(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      environment: super::single_tag(key, value),
      ..Default::default()
    }
  }

  pub fn tag(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      tags: super::single_tag(key, value),
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone)]
pub struct FunctionProperties {
  pub handler: String,
  pub code: String,
  pub role: Ref<Role>,
  pub runtime: String,
  pub memory_mb: u32,
  pub timeout_secs: u32,
  pub vpc: Option<Ref<Vpc>>,
  pub event_sources: Vec<Ref<Queue>>,
  pub environment: BTreeMap<String, String>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Function {
  const KIND: &'static str = "function";
  type Fragment = FunctionFragment;
  type Properties = FunctionProperties;

  fn finalize(name: &str, fragment: FunctionFragment) -> Result<FunctionProperties> {
    Ok(FunctionProperties {
      handler: fragment.handler.ok_or_else(|| Error::missing(name, "handler"))?,
      code: fragment.code.ok_or_else(|| Error::missing(name, "code"))?,
      role: fragment.role.ok_or_else(|| Error::missing(name, "role"))?,
      runtime: fragment.runtime.unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
      memory_mb: fragment.memory_mb.unwrap_or(DEFAULT_MEMORY_MB),
      timeout_secs: fragment.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
      vpc: fragment.vpc,
      event_sources: fragment.event_sources,
      environment: fragment.environment,
      tags: fragment.tags,
    })
  }

  fn render(properties: &FunctionProperties) -> Result<serde_json::Value> {
    let role = properties.role.resolve()?;
    let vpc = properties.vpc.as_ref().map(Ref::resolve).transpose()?;
    let event_sources: Vec<String> = resolve_all(&properties.event_sources)?
      .iter()
      .map(|queue| queue.arn().to_string())
      .collect();

    Ok(json!({
      "handler": properties.handler,
      "code": properties.code,
      "role": role.arn(),
      "runtime": properties.runtime,
      "memory_mb": properties.memory_mb,
      "timeout_secs": properties.timeout_secs,
      "vpc": vpc.as_ref().map(|v| v.physical_id()),
      "event_sources": event_sources,
      "environment": properties.environment,
      "tags": properties.tags,
    }))
  }

  fn dependencies(properties: &FunctionProperties) -> Vec<Dependency> {
    let mut deps: Vec<Dependency> = properties.role.dependency().into_iter().collect();
    deps.extend(properties.vpc.iter().filter_map(Ref::dependency));
    deps.extend(dependencies_of(&properties.event_sources));
    deps
  }
}

/// Start configuring a function named `name`.
pub fn function(name: impl Into<String>) -> Config<Function> {
  Config::zero(name)
}
