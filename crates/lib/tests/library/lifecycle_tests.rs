use std::sync::Arc;
use std::thread;

use skyform_lib::resources::queue::{Queue, QueueFragment, queue};
use skyform_lib::{Error, Handle, Ref, ReferenceCell};

use super::common::{external_queue, plain_queue};

#[test]
fn deferred_reference_resolves_after_fill() {
  let a = plain_queue("A");
  let reference = Ref::from(&a);

  assert!(!reference.is_ready());
  a.fill(Handle::external("queue-a")).unwrap();

  let handle = reference.resolve().unwrap();
  assert_eq!(handle.physical_id(), "queue-a");
  assert!(reference.is_ready());
}

#[test]
fn resolving_before_fill_names_the_target() {
  let a = plain_queue("A");
  let reference: Ref<Queue> = Ref::Deferred(a.clone());

  let err = reference.resolve().unwrap_err();
  assert!(matches!(err, Error::NotYetResolved { ref resource, .. } if resource == "A"));
  assert_eq!(err.resource(), Some("A"));
}

#[test]
fn direct_reference_is_always_ready() {
  let reference = Ref::Direct(external_queue("queue-ext"));
  assert!(reference.is_ready());
  assert!(reference.dependency().is_none());
  assert_eq!(reference.resolve().unwrap().physical_id(), "queue-ext");
}

#[test]
fn second_fill_is_rejected_and_first_value_kept() {
  let a = plain_queue("A");
  a.fill(Handle::external("first")).unwrap();

  let err = a.fill(Handle::external("second")).unwrap_err();
  assert!(matches!(err, Error::DoubleResolution { ref resource } if resource == "A"));
  assert_eq!(a.handle().unwrap().physical_id(), "first");
}

#[test]
fn clones_share_one_cell() {
  let a = plain_queue("A");
  let held_by_b = a.clone();

  a.fill(Handle::external("queue-a")).unwrap();
  assert!(held_by_b.is_resolved());
  assert!(a.same_spec(&held_by_b));
}

#[test]
fn concurrent_fills_have_exactly_one_winner() {
  let cell: Arc<ReferenceCell<String>> = Arc::new(ReferenceCell::new("A"));

  let outcomes: Vec<bool> = (0..8)
    .map(|i| {
      let cell = Arc::clone(&cell);
      thread::spawn(move || cell.fill(format!("writer-{i}")).is_ok())
    })
    .collect::<Vec<_>>()
    .into_iter()
    .map(|h| h.join().unwrap())
    .collect();

  assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
  assert!(cell.read().unwrap().starts_with("writer-"));
}

#[test]
fn missing_required_field_names_resource_and_field() {
  use skyform_lib::resources::role::role;

  let err = role("exec").finalize().unwrap_err();
  match err {
    Error::MissingRequiredField { resource, field } => {
      assert_eq!(resource, "exec");
      assert_eq!(field, "assumed_by");
    }
    other => panic!("expected MissingRequiredField, got {other:?}"),
  }
}

#[test]
fn finalize_does_not_resolve_references() {
  let dlq = plain_queue("dlq");
  let spec = queue("orders").with(QueueFragment::dead_letter(&dlq, 4)).finalize().unwrap();

  let dead_letter = spec.properties().dead_letter.as_ref().unwrap();
  assert_eq!(dead_letter.max_receive_count, 4);
  assert!(!dead_letter.queue.is_ready());
}
