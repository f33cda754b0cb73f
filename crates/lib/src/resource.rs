//! Resource kinds and accumulated configuration.
//!
//! A [`ResourceKind`] describes one family of resources: the shape of its
//! fragments, the finalized properties, and how those properties render into
//! the backend-facing JSON object. A [`Config`] is the running fold of
//! fragments for one named resource; [`Config::finalize`] turns it into a
//! [`Spec`].

use std::fmt;

use tracing::{debug, warn};

use crate::error::Result;
use crate::merge::Merge;
use crate::reference::Dependency;
use crate::spec::Spec;

/// One family of resources (queues, buckets, functions, ...).
pub trait ResourceKind: Sized + Send + Sync + 'static {
  /// Stable kind name, used in construction ids and definitions.
  const KIND: &'static str;

  /// Partial, mergeable description of the resource.
  type Fragment: Merge + Default + Clone + fmt::Debug + Send + Sync;

  /// Finalized description with defaults applied.
  type Properties: Clone + fmt::Debug + Send + Sync;

  /// Apply defaults to a folded fragment, then check required fields.
  ///
  /// # Errors
  ///
  /// Returns `MissingRequiredField` if a mandatory field is still absent.
  fn finalize(name: &str, fragment: Self::Fragment) -> Result<Self::Properties>;

  /// Render finalized properties into the object handed to the backend.
  ///
  /// Every reference held by the properties is resolved here.
  ///
  /// # Errors
  ///
  /// Returns `NotYetResolved` if a deferred reference points at a resource
  /// that has not been realized.
  fn render(properties: &Self::Properties) -> Result<serde_json::Value>;

  /// Deferred references held by the properties.
  fn dependencies(_properties: &Self::Properties) -> Vec<Dependency> {
    Vec::new()
  }
}

/// The accumulated configuration of one named resource.
///
/// The name is fixed when the config is created and never changes while
/// fragments are folded in.
pub struct Config<K: ResourceKind> {
  name: String,
  fragment: K::Fragment,
}

impl<K: ResourceKind> Config<K> {
  /// The empty configuration for `name`.
  pub fn zero(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fragment: K::Fragment::default(),
    }
  }

  /// Fold `fragments` onto the empty configuration for `name`, in order.
  pub fn fold<I>(name: impl Into<String>, fragments: I) -> Self
  where
    I: IntoIterator<Item = K::Fragment>,
  {
    let mut config = Self::zero(name);
    config.fragment = config.fragment.merge_all(fragments);
    config
  }

  /// Fold one more fragment in, after everything already accumulated.
  pub fn with(mut self, fragment: K::Fragment) -> Self {
    self.fragment = self.fragment.merge(fragment);
    self
  }

  /// Combine two configurations, `self` declared first.
  ///
  /// The identity of `self` is kept.
  pub fn combine(self, other: Config<K>) -> Self {
    if self.name != other.name {
      warn!(
        kind = K::KIND,
        kept = %self.name,
        dropped = %other.name,
        "combining configs with different names, keeping the first"
      );
    }
    Self {
      name: self.name,
      fragment: self.fragment.merge(other.fragment),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn fragment(&self) -> &K::Fragment {
    &self.fragment
  }

  /// Apply defaults, check required fields, and produce a [`Spec`] with an
  /// empty reference cell.
  ///
  /// # Errors
  ///
  /// Returns `MissingRequiredField` naming the first absent mandatory field.
  pub fn finalize(self) -> Result<Spec<K>> {
    let properties = K::finalize(&self.name, self.fragment)?;
    let spec = Spec::new(self.name, properties)?;
    debug!(resource = %spec.name(), kind = K::KIND, id = %spec.id(), "finalized config");
    Ok(spec)
  }
}

impl<K: ResourceKind> Clone for Config<K> {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      fragment: self.fragment.clone(),
    }
  }
}

impl<K: ResourceKind> fmt::Debug for Config<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Config")
      .field("kind", &K::KIND)
      .field("name", &self.name)
      .field("fragment", &self.fragment)
      .finish()
  }
}

impl<K: ResourceKind> PartialEq for Config<K>
where
  K::Fragment: PartialEq,
{
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && self.fragment == other.fragment
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use serde_json::json;
  use tracing_test::traced_test;

  use super::*;
  use crate::error::Error;

  struct Widget;

  #[derive(Debug, Default, Clone, PartialEq)]
  struct WidgetFragment {
    size: Option<u32>,
    color: Option<String>,
    parts: Vec<String>,
    labels: BTreeMap<String, String>,
  }

  crate::merge_fields!(WidgetFragment { size, color, parts, labels });

  #[derive(Debug, Clone)]
  struct WidgetProperties {
    size: u32,
    color: String,
    parts: Vec<String>,
  }

  impl ResourceKind for Widget {
    const KIND: &'static str = "widget";
    type Fragment = WidgetFragment;
    type Properties = WidgetProperties;

    fn finalize(name: &str, fragment: WidgetFragment) -> Result<WidgetProperties> {
      Ok(WidgetProperties {
        size: fragment.size.unwrap_or(1),
        color: fragment.color.ok_or_else(|| Error::missing(name, "color"))?,
        parts: fragment.parts,
      })
    }

    fn render(properties: &WidgetProperties) -> Result<serde_json::Value> {
      Ok(json!({ "size": properties.size, "color": properties.color, "parts": properties.parts }))
    }
  }

  fn size(n: u32) -> WidgetFragment {
    WidgetFragment {
      size: Some(n),
      ..Default::default()
    }
  }

  fn color(c: &str) -> WidgetFragment {
    WidgetFragment {
      color: Some(c.to_string()),
      ..Default::default()
    }
  }

  fn part(p: &str) -> WidgetFragment {
    WidgetFragment {
      parts: vec![p.to_string()],
      ..Default::default()
    }
  }

  #[test]
  fn zero_is_empty() {
    let config = Config::<Widget>::zero("w");
    assert_eq!(config.name(), "w");
    assert_eq!(config.fragment(), &WidgetFragment::default());
  }

  #[test]
  fn fold_matches_chained_with() {
    let folded = Config::<Widget>::fold("w", [size(2), part("a"), part("b")]);
    let chained = Config::<Widget>::zero("w").with(size(2)).with(part("a")).with(part("b"));
    assert_eq!(folded, chained);
  }

  #[test]
  fn combine_with_zero_is_identity() {
    let config = Config::<Widget>::fold("w", [size(2), color("red"), part("a")]);
    assert_eq!(config.clone().combine(Config::zero("w")), config);
  }

  #[test]
  #[traced_test]
  fn combine_keeps_first_identity() {
    let merged = Config::<Widget>::zero("first").combine(Config::fold("second", [size(3)]));
    assert_eq!(merged.name(), "first");
    assert_eq!(merged.fragment().size, Some(3));
    assert!(logs_contain("different names"));
  }

  #[test]
  fn finalize_applies_defaults() {
    let spec = Config::<Widget>::fold("w", [color("blue")]).finalize().unwrap();
    assert_eq!(spec.properties().size, 1);
    assert_eq!(spec.properties().color, "blue");
    assert!(!spec.is_resolved());
  }

  #[test]
  fn finalize_reports_missing_field() {
    let err = Config::<Widget>::fold("w", [size(4)]).finalize().unwrap_err();
    match err {
      Error::MissingRequiredField { resource, field } => {
        assert_eq!(resource, "w");
        assert_eq!(field, "color");
      }
      other => panic!("expected MissingRequiredField, got {other:?}"),
    }
  }
}
