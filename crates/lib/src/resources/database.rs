//! Managed relational databases.

use std::collections::BTreeMap;

use serde_json::json;

use crate::error::{Error, Result};
use crate::merge_fields;
use crate::reference::{Dependency, Ref};
use crate::resource::{Config, ResourceKind};

use super::vpc::Vpc;

pub const DEFAULT_ENGINE: &str = "postgres";
pub const DEFAULT_INSTANCE_CLASS: &str = "db.t3.micro";
pub const DEFAULT_ALLOCATED_STORAGE_GB: u32 = 20;

pub struct Database;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DatabaseFragment {
  pub vpc: Option<Ref<Vpc>>,
  pub master_username: Option<String>,
  pub engine: Option<String>,
  pub instance_class: Option<String>,
  pub allocated_storage_gb: Option<u32>,
  pub subnets: Vec<String>,
  pub parameters: BTreeMap<String, String>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(DatabaseFragment {
  vpc,
  master_username,
  engine,
  instance_class,
  allocated_storage_gb,
  subnets,
  parameters,
  tags,
});

impl DatabaseFragment {
  pub fn vpc(vpc: impl Into<Ref<Vpc>>) -> Self {
    Self {
      vpc: Some(vpc.into()),
      ..Default::default()
    }
  }

  pub fn master_username(username: impl Into<String>) -> Self {
    Self {
      master_username: Some(username.into()),
      ..Default::default()
    }
  }

  pub fn engine(engine: impl Into<String>) -> Self {
    Self {
      engine: Some(engine.into()),
      ..Default::default()
    }
  }

  pub fn instance_class(class: impl Into<String>) -> Self {
    Self {
      instance_class: Some(class.into()),
      ..Default::default()
    }
  }

  pub fn allocated_storage_gb(gb: u32) -> Self {
    Self {
      allocated_storage_gb: Some(gb),
      ..Default::default()
    }
  }

  /// Place the database in the named subnet of its network.
  pub fn subnet(name: impl Into<String>) -> Self {
    Self {
      subnets: vec![name.into()],
      ..Default::default()
    }
  }

  /// Engine parameter, e.g. `max_connections`.
  pub fn parameter(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      parameters: super::single_tag(key, value),
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
pub struct DatabaseProperties {
  pub vpc: Ref<Vpc>,
  pub master_username: String,
  pub engine: String,
  pub instance_class: String,
  pub allocated_storage_gb: u32,
  pub subnets: Vec<String>,
  pub parameters: BTreeMap<String, String>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Database {
  const KIND: &'static str = "database";
  type Fragment = DatabaseFragment;
  type Properties = DatabaseProperties;

  fn finalize(name: &str, fragment: DatabaseFragment) -> Result<DatabaseProperties> {
    Ok(DatabaseProperties {
      vpc: fragment.vpc.ok_or_else(|| Error::missing(name, "vpc"))?,
      master_username: fragment
        .master_username
        .ok_or_else(|| Error::missing(name, "master_username"))?,
      engine: fragment.engine.unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
      instance_class: fragment
        .instance_class
        .unwrap_or_else(|| DEFAULT_INSTANCE_CLASS.to_string()),
      allocated_storage_gb: fragment.allocated_storage_gb.unwrap_or(DEFAULT_ALLOCATED_STORAGE_GB),
      subnets: fragment.subnets,
      parameters: fragment.parameters,
      tags: fragment.tags,
    })
  }

  fn render(properties: &DatabaseProperties) -> Result<serde_json::Value> {
    let vpc = properties.vpc.resolve()?;

    Ok(json!({
      "vpc": vpc.physical_id(),
      "master_username": properties.master_username,
      "engine": properties.engine,
      "instance_class": properties.instance_class,
      "allocated_storage_gb": properties.allocated_storage_gb,
      "subnets": properties.subnets,
      "parameters": properties.parameters,
      "tags": properties.tags,
    }))
  }

  fn dependencies(properties: &DatabaseProperties) -> Vec<Dependency> {
    properties.vpc.dependency().into_iter().collect()
  }
}

/// Start configuring a database named `name`.
pub fn database(name: impl Into<String>) -> Config<Database> {
  Config::zero(name)
}
