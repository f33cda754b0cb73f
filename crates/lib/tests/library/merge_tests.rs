use proptest::prelude::*;
use skyform_lib::resources::bucket::{Bucket, BucketFragment, bucket};
use skyform_lib::{Config, Merge};

use super::common::arb_bucket_fragment;

proptest! {
  #[test]
  fn merge_is_associative(
    a in arb_bucket_fragment(),
    b in arb_bucket_fragment(),
    c in arb_bucket_fragment(),
  ) {
    let left = a.clone().merge(b.clone()).merge(c.clone());
    let right = a.merge(b.merge(c));
    prop_assert_eq!(left, right);
  }

  #[test]
  fn empty_fragment_is_identity(a in arb_bucket_fragment()) {
    prop_assert_eq!(BucketFragment::default().merge(a.clone()), a.clone());
    prop_assert_eq!(a.clone().merge(BucketFragment::default()), a);
  }

  #[test]
  fn earliest_scalar_wins(first: bool, second: bool) {
    let merged = BucketFragment::versioned(first).merge(BucketFragment::versioned(second));
    prop_assert_eq!(merged.versioned, Some(first));
  }

  #[test]
  fn lists_concatenate_in_declaration_order(a in arb_bucket_fragment(), b in arb_bucket_fragment()) {
    let mut expected = a.lifecycle_rules.clone();
    expected.extend(b.lifecycle_rules.clone());
    prop_assert_eq!(a.merge(b).lifecycle_rules, expected);
  }

  #[test]
  fn later_map_entries_overwrite(a in arb_bucket_fragment(), b in arb_bucket_fragment()) {
    let merged = a.clone().merge(b.clone());
    for (key, value) in &b.tags {
      prop_assert_eq!(merged.tags.get(key), Some(value));
    }
    for (key, value) in &a.tags {
      if !b.tags.contains_key(key) {
        prop_assert_eq!(merged.tags.get(key), Some(value));
      }
    }
  }

  #[test]
  fn fold_matches_pairwise_merge(fragments in prop::collection::vec(arb_bucket_fragment(), 0..5)) {
    let folded = Config::<Bucket>::fold("logs", fragments.clone());
    let pairwise = fragments.into_iter().fold(BucketFragment::default(), Merge::merge);
    prop_assert_eq!(folded.fragment(), &pairwise);
  }
}

#[test]
fn unset_fields_take_defaults_at_finalize() {
  let spec = bucket("logs").with(BucketFragment::tag("env", "prod")).finalize().unwrap();

  let properties = spec.properties();
  assert!(!properties.versioned);
  assert!(properties.block_public_access);
  assert_eq!(properties.tags.get("env").map(String::as_str), Some("prod"));
}
