//! Resource builders.
//!
//! Each kind exposes an explicit factory (`queue("orders")`), a fragment type
//! whose constructors each set one field, and the finalized properties.
//!
//! ```
//! use skyform_lib::resources::queue::{QueueFragment, queue};
//!
//! let spec = queue("orders")
//!   .with(QueueFragment::visibility_timeout_secs(60))
//!   .with(QueueFragment::tag("team", "payments"))
//!   .finalize()
//!   .unwrap();
//! assert_eq!(spec.properties().visibility_timeout_secs, 60);
//! ```

pub mod bucket;
pub mod database;
pub mod function;
pub mod queue;
pub mod role;
pub mod vpc;

use std::collections::BTreeMap;

/// Tags as a single-entry map, for fragment constructors.
pub(crate) fn single_tag(key: impl Into<String>, value: impl Into<String>) -> BTreeMap<String, String> {
  BTreeMap::from([(key.into(), value.into())])
}
