//! Dispatcher tests with in-memory devices

use std::sync::Arc;

use recuair::dispatch::command::Command;
use recuair::dispatch::dispatcher::{run_on_device, Dispatcher, Outcome};
use recuair::dispatch::retry::RetryPolicy;
use recuair::errors::RecuairError;

use crate::support::{fields, holly, FakeDevices};

fn devices(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn test_failure_does_not_affect_other_devices() {
    let fake = Arc::new(FakeDevices::default());
    let dispatcher = Dispatcher::new(fake.clone(), RetryPolicy::immediate(3));

    let report = dispatcher
        .dispatch(&Command::Status, &devices(&["broken-a", "b"]))
        .await;

    assert_eq!(report.outcomes.len(), 2);
    match &report.outcomes[0] {
        Outcome::Failure { device, error } => {
            assert_eq!(device, "broken-a");
            assert_eq!(
                error.to_string(),
                "Error fetching status of device broken-a: Gazpacho! attempt 3"
            );
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    match &report.outcomes[1] {
        Outcome::Status(status) => assert_eq!(status, &holly("b")),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(report.has_failures());
    assert_eq!(fake.attempts_for("broken-a"), 3);
    assert_eq!(fake.attempts_for("b"), 1);
}

#[tokio::test]
async fn test_command_on_many_devices() {
    let fake = Arc::new(FakeDevices::default());
    let dispatcher = Dispatcher::new(fake.clone(), RetryPolicy::immediate(3));

    let report = dispatcher
        .dispatch(&Command::STOP, &devices(&["a", "b", "c"]))
        .await;

    assert!(!report.has_failures());
    let acknowledged: Vec<&str> = report.outcomes.iter().map(Outcome::device).collect();
    assert_eq!(acknowledged, ["a", "b", "c"]);
    assert!(report
        .outcomes
        .iter()
        .all(|outcome| matches!(outcome, Outcome::Acknowledged { .. })));

    let mut requests = fake.requests.lock().unwrap().clone();
    requests.sort_by(|x, y| x.device.cmp(&y.device));
    assert_eq!(requests.len(), 3);
    for request in requests {
        assert_eq!(request.parameters, fields(&[("mode", "off")]));
    }
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let fake = FakeDevices::default();

    let outcome = run_on_device(&fake, &RetryPolicy::immediate(5), &Command::Status, "flaky-3").await;

    assert!(matches!(outcome, Outcome::Status(_)));
    assert_eq!(fake.attempts_for("flaky-3"), 4);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let fake = FakeDevices::default();

    let outcome = run_on_device(
        &fake,
        &RetryPolicy::immediate(3),
        &Command::ResetFilters,
        "flaky-10",
    )
    .await;

    match outcome {
        Outcome::Failure { error: RecuairError::Fetch { cause, .. }, .. } => {
            assert_eq!(cause, "Gazpacho! attempt 3")
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(fake.attempts_for("flaky-10"), 3);
    assert!(fake.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_outcomes_follow_input_order() {
    let fake = Arc::new(FakeDevices::default());
    let dispatcher = Dispatcher::new(fake, RetryPolicy::immediate(1));
    let names = devices(&["slow-200", "slow-0", "slow-100"]);

    let report = dispatcher.dispatch(&Command::Status, &names).await;

    let order: Vec<&str> = report.outcomes.iter().map(Outcome::device).collect();
    assert_eq!(order, ["slow-200", "slow-0", "slow-100"]);
}

#[tokio::test]
async fn test_light_off_request() {
    let fake = FakeDevices::default();

    let outcome = run_on_device(&fake, &RetryPolicy::immediate(1), &Command::light_off(), "a").await;

    assert!(matches!(outcome, Outcome::Acknowledged { .. }));
    let requests = fake.requests.lock().unwrap();
    assert_eq!(
        requests[0].parameters,
        fields(&[("r", "0"), ("g", "0"), ("b", "0"), ("intensity", "0")])
    );
}
