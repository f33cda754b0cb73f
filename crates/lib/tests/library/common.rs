use std::collections::BTreeMap;

use proptest::prelude::*;
use skyform_lib::resources::bucket::{BucketFragment, LifecycleRule};
use skyform_lib::resources::queue::{Queue, queue};
use skyform_lib::{Handle, Spec};

fn arb_tags() -> impl Strategy<Value = BTreeMap<String, String>> {
  prop::collection::btree_map("[a-c]", "[x-z]{1,3}", 0..3)
}

fn arb_rule() -> impl Strategy<Value = LifecycleRule> {
  (prop::option::of("[a-z]{1,4}/"), 1u32..400).prop_map(|(prefix, expire_after_days)| LifecycleRule {
    prefix,
    expire_after_days,
  })
}

pub fn arb_bucket_fragment() -> impl Strategy<Value = BucketFragment> {
  (
    prop::option::of(any::<bool>()),
    prop::option::of(any::<bool>()),
    prop::collection::vec(arb_rule(), 0..3),
    arb_tags(),
  )
    .prop_map(|(versioned, block_public_access, lifecycle_rules, tags)| BucketFragment {
      versioned,
      block_public_access,
      lifecycle_rules,
      tags,
    })
}

/// A finalized queue with no references, not yet realized.
pub fn plain_queue(name: &str) -> Spec<Queue> {
  queue(name).finalize().unwrap()
}

pub fn external_queue(physical_id: &str) -> Handle<Queue> {
  Handle::external(physical_id)
}
