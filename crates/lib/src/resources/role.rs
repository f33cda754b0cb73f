//! Execution roles and their policy statements.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::merge_fields;
use crate::resource::{Config, ResourceKind};

pub struct Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
  Allow,
  Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
  pub effect: Effect,
  pub actions: Vec<String>,
  pub resources: Vec<String>,
}

impl PolicyStatement {
  pub fn allow<A, R>(actions: A, resources: R) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    Self::new(Effect::Allow, actions, resources)
  }

  pub fn deny<A, R>(actions: A, resources: R) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    Self::new(Effect::Deny, actions, resources)
  }

  fn new<A, R>(effect: Effect, actions: A, resources: R) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    Self {
      effect,
      actions: actions.into_iter().map(Into::into).collect(),
      resources: resources.into_iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoleFragment {
  pub assumed_by: Option<String>,
  pub description: Option<String>,
  pub managed_policies: Vec<String>,
  pub statements: Vec<PolicyStatement>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(RoleFragment {
  assumed_by,
  description,
  managed_policies,
  statements,
  tags,
});

impl RoleFragment {
  /// The service principal allowed to assume the role.
  pub fn assumed_by(principal: impl Into<String>) -> Self {
    Self {
      assumed_by: Some(principal.into()),
      ..Default::default()
    }
  }

  pub fn description(text: impl Into<String>) -> Self {
    Self {
      description: Some(text.into()),
      ..Default::default()
    }
  }

  pub fn managed_policy(arn: impl Into<String>) -> Self {
    Self {
      managed_policies: vec![arn.into()],
      ..Default::default()
    }
  }

  pub fn statement(statement: PolicyStatement) -> Self {
    Self {
      statements: vec![statement],
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
pub struct RoleProperties {
  pub assumed_by: String,
  pub description: Option<String>,
  pub managed_policies: Vec<String>,
  pub statements: Vec<PolicyStatement>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Role {
  const KIND: &'static str = "role";
  type Fragment = RoleFragment;
  type Properties = RoleProperties;

  fn finalize(name: &str, fragment: RoleFragment) -> Result<RoleProperties> {
    Ok(RoleProperties {
      assumed_by: fragment.assumed_by.ok_or_else(|| Error::missing(name, "assumed_by"))?,
      description: fragment.description,
      managed_policies: fragment.managed_policies,
      statements: fragment.statements,
      tags: fragment.tags,
    })
  }

  fn render(properties: &RoleProperties) -> Result<serde_json::Value> {
    Ok(json!({
      "assumed_by": properties.assumed_by,
      "description": properties.description,
      "managed_policies": properties.managed_policies,
      "policy": { "statements": properties.statements },
      "tags": properties.tags,
    }))
  }
}

/// Start configuring a role named `name`.
pub fn role(name: impl Into<String>) -> Config<Role> {
  Config::zero(name)
}
