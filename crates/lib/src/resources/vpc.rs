//! Virtual networks.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::merge_fields;
use crate::resource::{Config, ResourceKind};

pub const DEFAULT_CIDR: &str = "10.0.0.0/16";
pub const DEFAULT_MAX_AZS: u8 = 2;

pub struct Vpc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
  pub name: String,
  pub cidr: String,
  pub public: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct VpcFragment {
  pub cidr: Option<String>,
  pub max_azs: Option<u8>,
  pub subnets: Vec<Subnet>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(VpcFragment {
  cidr,
  max_azs,
  subnets,
  tags,
});

impl VpcFragment {
  pub fn cidr(cidr: impl Into<String>) -> Self {
    Self {
      cidr: Some(cidr.into()),
      ..Default::default()
    }
  }

  pub fn max_azs(count: u8) -> Self {
    Self {
      max_azs: Some(count),
      ..Default::default()
    }
  }

  pub fn public_subnet(name: impl Into<String>, cidr: impl Into<String>) -> Self {
    Self::subnet(name.into(), cidr.into(), true)
  }

  pub fn private_subnet(name: impl Into<String>, cidr: impl Into<String>) -> Self {
    Self::subnet(name.into(), cidr.into(), false)
  }

  fn subnet(name: String, cidr: String, public: bool) -> Self {
    Self {
      subnets: vec![Subnet { name, cidr, public }],
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
pub struct VpcProperties {
  pub cidr: String,
  pub max_azs: u8,
  pub subnets: Vec<Subnet>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Vpc {
  const KIND: &'static str = "vpc";
  type Fragment = VpcFragment;
  type Properties = VpcProperties;

  fn finalize(_name: &str, fragment: VpcFragment) -> Result<VpcProperties> {
    Ok(VpcProperties {
      cidr: fragment.cidr.unwrap_or_else(|| DEFAULT_CIDR.to_string()),
      max_azs: fragment.max_azs.unwrap_or(DEFAULT_MAX_AZS),
      subnets: fragment.subnets,
      tags: fragment.tags,
    })
  }

  fn render(properties: &VpcProperties) -> Result<serde_json::Value> {
    Ok(json!({
      "cidr": properties.cidr,
      "max_azs": properties.max_azs,
      "subnets": properties.subnets,
      "tags": properties.tags,
    }))
  }
}

/// Start configuring a network named `name`.
pub fn vpc(name: impl Into<String>) -> Config<Vpc> {
  Config::zero(name)
}
