//! Message queues.

use std::collections::BTreeMap;

use serde_json::json;

use crate::error::Result;
use crate::merge_fields;
use crate::reference::{Dependency, Ref};
use crate::resource::{Config, ResourceKind};

pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u32 = 30;
pub const DEFAULT_RETENTION_SECS: u32 = 4 * 24 * 60 * 60;
pub const DEFAULT_MAX_RECEIVE_COUNT: u32 = 3;

pub struct Queue;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueueFragment {
  pub fifo: Option<bool>,
  pub visibility_timeout_secs: Option<u32>,
  pub retention_secs: Option<u32>,
  pub dead_letter: Option<Ref<Queue>>,
  pub max_receive_count: Option<u32>,
  pub tags: BTreeMap<String, String>,
}

merge_fields!(QueueFragment {
  fifo,
  visibility_timeout_secs,
  retention_secs,
  dead_letter,
  max_receive_count,
  tags,
});

impl QueueFragment {
  pub fn fifo(fifo: bool) -> Self {
    Self {
      fifo: Some(fifo),
      ..Default::default()
    }
  }

  pub fn visibility_timeout_secs(secs: u32) -> Self {
    Self {
      visibility_timeout_secs: Some(secs),
      ..Default::default()
    }
  }

  pub fn retention_secs(secs: u32) -> Self {
    Self {
      retention_secs: Some(secs),
      ..Default::default()
    }
  }

  /// Send messages that fail `max_receive_count` times to `queue`.
  pub fn dead_letter(queue: impl Into<Ref<Queue>>, max_receive_count: u32) -> Self {
    Self {
      dead_letter: Some(queue.into()),
      max_receive_count: Some(max_receive_count),
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
pub struct DeadLetter {
  pub queue: Ref<Queue>,
  pub max_receive_count: u32,
}

#[derive(Debug, Clone)]
pub struct QueueProperties {
  pub fifo: bool,
  pub visibility_timeout_secs: u32,
  pub retention_secs: u32,
  pub dead_letter: Option<DeadLetter>,
  pub tags: BTreeMap<String, String>,
}

impl ResourceKind for Queue {
  const KIND: &'static str = "queue";
  type Fragment = QueueFragment;
  type Properties = QueueProperties;

  fn finalize(_name: &str, fragment: QueueFragment) -> Result<QueueProperties> {
    let dead_letter = fragment.dead_letter.map(|queue| DeadLetter {
      queue,
      max_receive_count: fragment.max_receive_count.unwrap_or(DEFAULT_MAX_RECEIVE_COUNT),
    });

    Ok(QueueProperties {
      fifo: fragment.fifo.unwrap_or(false),
      visibility_timeout_secs: fragment
        .visibility_timeout_secs
        .unwrap_or(DEFAULT_VISIBILITY_TIMEOUT_SECS),
      retention_secs: fragment.retention_secs.unwrap_or(DEFAULT_RETENTION_SECS),
      dead_letter,
      tags: fragment.tags,
    })
  }

  fn render(properties: &QueueProperties) -> Result<serde_json::Value> {
    let redrive_policy = match &properties.dead_letter {
      Some(dl) => {
        let target = dl.queue.resolve()?;
        json!({
          "dead_letter_target": target.arn(),
          "max_receive_count": dl.max_receive_count,
        })
      }
      None => serde_json::Value::Null,
    };

    Ok(json!({
      "fifo": properties.fifo,
      "visibility_timeout_secs": properties.visibility_timeout_secs,
      "retention_secs": properties.retention_secs,
      "redrive_policy": redrive_policy,
      "tags": properties.tags,
    }))
  }

  fn dependencies(properties: &QueueProperties) -> Vec<Dependency> {
    properties.dead_letter.iter().filter_map(|dl| dl.queue.dependency()).collect()
  }
}

/// Start configuring a queue named `name`.
pub fn queue(name: impl Into<String>) -> Config<Queue> {
  Config::zero(name)
}
