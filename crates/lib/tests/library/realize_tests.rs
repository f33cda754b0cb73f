use skyform_lib::resources::database::{DatabaseFragment, database};
use skyform_lib::resources::function::{FunctionFragment, function};
use skyform_lib::resources::queue::{QueueFragment, queue};
use skyform_lib::resources::role::{PolicyStatement, RoleFragment, role};
use skyform_lib::resources::vpc::{VpcFragment, vpc};
use skyform_lib::{Error, ExecutionOrder, InMemoryBackend, Orchestrator, OrchestratorConfig, Stack};
use tracing_test::traced_test;

use super::common::plain_queue;

fn topological() -> Orchestrator {
  Orchestrator::new(OrchestratorConfig::default().with_order(ExecutionOrder::Topological))
}

/// B holds a deferred reference to A.
fn a_and_b(a_first: bool) -> Stack {
  let a = plain_queue("A");
  let mut stack = Stack::new("scenario");
  if a_first {
    stack.insert(&a).unwrap();
  }
  stack.add(queue("B").with(QueueFragment::dead_letter(&a, 2))).unwrap();
  if !a_first {
    stack.insert(&a).unwrap();
  }
  stack
}

#[test]
fn dependency_declared_first_resolves() {
  let stack = a_and_b(true);
  let mut backend = InMemoryBackend::new();

  let deployment = Orchestrator::default().realize(&stack, &mut backend).unwrap();

  let a = deployment.handle("queue", "A").unwrap();
  let b = backend.definition("B").unwrap();
  assert_eq!(
    b.properties["redrive_policy"]["dead_letter_target"],
    a.attribute("arn").unwrap()
  );
}

#[test]
fn dependency_declared_last_fails_deterministically() {
  for _ in 0..3 {
    let stack = a_and_b(false);
    let mut backend = InMemoryBackend::new();
    let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_preflight(false));

    let err = orchestrator.realize(&stack, &mut backend).unwrap_err();
    assert!(matches!(err, Error::NotYetResolved { ref resource, .. } if resource == "A"));
    assert!(backend.provisioned().is_empty());
  }
}

fn application(stack: &mut Stack) {
  let network = vpc("network")
    .with(VpcFragment::private_subnet("db-a", "10.0.1.0/24"))
    .with(VpcFragment::private_subnet("db-b", "10.0.2.0/24"))
    .finalize()
    .unwrap();
  let exec = role("worker-exec")
    .with(RoleFragment::assumed_by("lambda.amazonaws.com"))
    .with(RoleFragment::statement(PolicyStatement::allow(
      ["sqs:ReceiveMessage"],
      ["*"],
    )))
    .finalize()
    .unwrap();
  let jobs = plain_queue("jobs");

  // Dependents are declared before what they reference.
  stack
    .add(
      function("worker")
        .with(FunctionFragment::handler("bootstrap"))
        .with(FunctionFragment::code("s3://artifacts/worker.zip"))
        .with(FunctionFragment::role(&exec))
        .with(FunctionFragment::vpc(&network))
        .with(FunctionFragment::event_source(&jobs)),
    )
    .unwrap();
  stack
    .add(
      database("orders-db")
        .with(DatabaseFragment::vpc(&network))
        .with(DatabaseFragment::master_username("admin"))
        .with(DatabaseFragment::subnet("db-a"))
        .with(DatabaseFragment::subnet("db-b")),
    )
    .unwrap();
  stack.insert(&jobs).unwrap();
  stack.insert(&exec).unwrap();
  stack.insert(&network).unwrap();
}

#[test]
fn topological_mode_realizes_dependencies_first() {
  let mut stack = Stack::new("app");
  application(&mut stack);
  let mut backend = InMemoryBackend::new();

  let deployment = topological().realize(&stack, &mut backend).unwrap();

  let names = deployment.realized_names();
  let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
  assert!(position("worker-exec") < position("worker"));
  assert!(position("network") < position("worker"));
  assert!(position("jobs") < position("worker"));
  assert!(position("network") < position("orders-db"));

  let worker = backend.definition("worker").unwrap();
  assert_eq!(worker.properties["role"], "arn:skyform:role:::worker-exec");
  assert_eq!(worker.properties["event_sources"][0], "arn:skyform:queue:::jobs");
}

#[test]
fn declaration_mode_preflight_reports_first_violation() {
  let mut stack = Stack::new("app");
  application(&mut stack);
  let mut backend = InMemoryBackend::new();

  let err = Orchestrator::default().realize(&stack, &mut backend).unwrap_err();
  assert!(matches!(err, Error::NotYetResolved { ref resource, .. } if resource == "worker-exec"));
  assert!(backend.provisioned().is_empty());
}

#[test]
fn plan_is_side_effect_free() {
  let mut stack = Stack::new("app");
  application(&mut stack);

  let plan = topological().plan(&stack).unwrap();
  assert_eq!(plan.len(), stack.len());
  assert!(stack.entries().all(|entry| !entry.is_resolved()));
}

#[test]
fn duplicate_declaration_is_rejected() {
  let mut stack = Stack::new("app");
  stack.add(queue("jobs")).unwrap();

  let err = stack.add(queue("jobs")).unwrap_err();
  assert!(matches!(err, Error::DuplicateResource { kind: "queue", ref name } if name == "jobs"));
}

#[test]
fn reference_to_undeclared_namesake_is_not_resolved() {
  let a = plain_queue("A");
  let mut stack = Stack::new("loop");
  stack.add(queue("A").with(QueueFragment::dead_letter(&a, 1))).unwrap();

  for orchestrator in [Orchestrator::default(), topological()] {
    let err = orchestrator.plan(&stack).unwrap_err();
    assert!(matches!(err, Error::NotYetResolved { ref resource, .. } if resource == "A"));
  }
}

#[test]
fn declared_namesake_never_reaches_backend() {
  let shadow_x = plain_queue("x");
  let mut stack = Stack::new("shadow");
  stack.add(queue("x")).unwrap();
  stack.add(queue("y").with(QueueFragment::dead_letter(&shadow_x, 1))).unwrap();

  for orchestrator in [Orchestrator::default(), topological()] {
    let mut backend = InMemoryBackend::new();

    assert!(orchestrator.plan(&stack).is_err());
    let err = orchestrator.realize(&stack, &mut backend).unwrap_err();
    assert!(matches!(err, Error::NotYetResolved { ref resource, .. } if resource == "x"));
    assert!(backend.provisioned().is_empty());
    assert!(stack.entries().all(|entry| !entry.is_resolved()));
  }
}

#[test]
#[traced_test]
fn realization_is_logged_per_resource() {
  let stack = a_and_b(true);
  let mut backend = InMemoryBackend::new();

  Orchestrator::default().realize(&stack, &mut backend).unwrap();

  assert!(logs_contain("starting realization pass"));
  assert!(logs_contain("resource realized"));
  assert!(logs_contain("resource=B"));
}
