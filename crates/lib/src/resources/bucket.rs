//! Object storage buckets.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::merge_fields;
use crate::resource::{Config, ResourceKind};

pub struct Bucket;

/// Expire objects under `prefix` after a number of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleRule {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefix: Option<String>,
  pub expire_after_days: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BucketFragment {
  pub versioned: Option<bool>,
  pub block_public_access: Option<bool>,
  pub lifecycle_rules: Vec<LifecycleRule>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(BucketFragment {
  versioned,
  block_public_access,
  lifecycle_rules,
  tags,
});

impl BucketFragment {
  pub fn versioned(versioned: bool) -> Self {
    Self {
      versioned: Some(versioned),
      ..Default::default()
    }
  }

  pub fn block_public_access(block: bool) -> Self {
    Self {
      block_public_access: Some(block),
      ..Default::default()
    }
  }

  pub fn expire(prefix: Option<&str>, after_days: u32) -> Self {
    Self {
      lifecycle_rules: vec![LifecycleRule {
        prefix: prefix.map(str::to_string),
        expire_after_days: after_days,
      }],
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
pub struct BucketProperties {
  pub versioned: bool,
  pub block_public_access: bool,
  pub lifecycle_rules: Vec<LifecycleRule>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Bucket {
  const KIND: &'static str = "bucket";
  type Fragment = BucketFragment;
  type Properties = BucketProperties;

  fn finalize(_name: &str, fragment: BucketFragment) -> Result<BucketProperties> {
    Ok(BucketProperties {
      versioned: fragment.versioned.unwrap_or(false),
      block_public_access: fragment.block_public_access.unwrap_or(true),
      lifecycle_rules: fragment.lifecycle_rules,
      tags: fragment.tags,
    })
  }

  fn render(properties: &BucketProperties) -> Result<serde_json::Value> {
    Ok(json!({
      "versioned": properties.versioned,
      "block_public_access": properties.block_public_access,
      "lifecycle_rules": properties.lifecycle_rules,
      "tags": properties.tags,
    }))
  }
}

/// Start configuring a bucket named `name`.
pub fn bucket(name: impl Into<String>) -> Config<Bucket> {
  Config::zero(name)
}
