//! Merge algebra for configuration fragments.
//!
//! A fragment is a record whose fields are `Option<T>`, `Vec<T>`, or
//! `BTreeMap<K, V>`. Folding fragments left to right applies one rule per
//! field shape:
//!
//! - `Option<T>`: first writer wins. The earliest fragment that sets a
//!   scalar is authoritative.
//! - `Vec<T>`: concatenation in declaration order. Elements from earlier
//!   fragments come first.
//! - `BTreeMap<K, V>`: right-biased key union. A later fragment overwrites
//!   keys it shares with an earlier one.
//!
//! All three rules are associative and have the empty value as identity, so
//! a fold is independent of how fragments are grouped.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use skyform_lib::merge::Merge;
//! use skyform_lib::merge_fields;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Fragment {
//!   size: Option<u32>,
//!   rules: Vec<String>,
//!   tags: BTreeMap<String, String>,
//! }
//!
//! merge_fields!(Fragment { size, rules, tags });
//!
//! let a = Fragment { size: Some(1), rules: vec!["a".into()], ..Default::default() };
//! let b = Fragment { size: Some(2), rules: vec!["b".into()], ..Default::default() };
//! let merged = a.merge(b);
//! assert_eq!(merged.size, Some(1));
//! assert_eq!(merged.rules, vec!["a".to_string(), "b".to_string()]);
//! ```

use std::collections::BTreeMap;

/// Combine two partial values, `self` declared before `later`.
pub trait Merge: Sized {
  fn merge(self, later: Self) -> Self;

  /// Fold a sequence of values onto `self`, in order.
  fn merge_all<I>(self, items: I) -> Self
  where
    I: IntoIterator<Item = Self>,
  {
    items.into_iter().fold(self, Merge::merge)
  }
}

impl<T> Merge for Option<T> {
  fn merge(self, later: Self) -> Self {
    self.or(later)
  }
}

impl<T> Merge for Vec<T> {
  fn merge(mut self, later: Self) -> Self {
    self.extend(later);
    self
  }
}

impl<K: Ord, V> Merge for BTreeMap<K, V> {
  fn merge(mut self, later: Self) -> Self {
    self.extend(later);
    self
  }
}

/// Implement [`Merge`] for a struct by merging each listed field.
///
/// Every field of the struct must be listed; the struct literal fails to
/// compile otherwise.
#[macro_export]
macro_rules! merge_fields {
  ($ty:ident { $($field:ident),* $(,)? }) => {
    impl $crate::merge::Merge for $ty {
      fn merge(self, later: Self) -> Self {
        Self {
          $($field: $crate::merge::Merge::merge(self.$field, later.$field),)*
        }
      }
    }
  };
}
