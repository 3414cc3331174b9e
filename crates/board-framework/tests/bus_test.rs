use board_framework::{BusError, BusEvent, EventBus};
use std::sync::{Arc, Mutex};

// --- Test Event ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TestKind {
    Ping,
    Note,
    Unwired,
}

#[derive(Debug, Clone)]
enum TestEvent {
    Ping(u32),
    Note(String),
    #[allow(dead_code)]
    Unwired,
}

impl BusEvent for TestEvent {
    type Kind = TestKind;

    fn kind(&self) -> TestKind {
        match self {
            TestEvent::Ping(_) => TestKind::Ping,
            TestEvent::Note(_) => TestKind::Note,
            TestEvent::Unwired => TestKind::Unwired,
        }
    }
}

fn supported_bus() -> EventBus<TestEvent> {
    EventBus::new([TestKind::Ping, TestKind::Note])
}

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, tag: &str) -> impl Fn(TestEvent) -> std::future::Ready<Result<(), board_framework::HandlerError>> {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    move |event| {
        log.lock().unwrap().push(format!("{tag}:{event:?}"));
        std::future::ready(Ok(()))
    }
}

/// Lets the dispatcher drain the publishes issued so far. The tests use the
/// default current-thread runtime, so the dispatcher only progresses while
/// the test task is yielding.
async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn publish_is_deferred_until_the_publisher_yields() {
    let bus = supported_bus();
    let log: Log = Arc::default();
    bus.subscribe(TestKind::Ping, recorder(&log, "h"))
        .expect("Ping is supported");

    bus.publish(TestEvent::Ping(7)).expect("publish succeeds");

    // Publish has returned, but nothing has run yet on this turn.
    assert!(log.lock().unwrap().is_empty(), "handler ran synchronously");

    settle().await;
    assert_eq!(*log.lock().unwrap(), vec!["h:Ping(7)".to_string()]);
}

#[tokio::test]
async fn handlers_run_in_subscription_order() {
    let bus = supported_bus();
    let log: Log = Arc::default();
    for tag in ["first", "second", "third"] {
        bus.subscribe(TestKind::Note, recorder(&log, tag))
            .expect("Note is supported");
    }

    bus.publish(TestEvent::Note("x".into())).unwrap();
    settle().await;

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            "first:Note(\"x\")".to_string(),
            "second:Note(\"x\")".to_string(),
            "third:Note(\"x\")".to_string(),
        ]
    );
}

#[tokio::test]
async fn publish_snapshots_subscribers_at_publish_time() {
    let bus = supported_bus();
    let log: Log = Arc::default();
    bus.subscribe(TestKind::Ping, recorder(&log, "early")).unwrap();

    bus.publish(TestEvent::Ping(1)).unwrap();
    // Subscribed after the publish was issued: must not see it.
    bus.subscribe(TestKind::Ping, recorder(&log, "late")).unwrap();

    settle().await;
    assert_eq!(*log.lock().unwrap(), vec!["early:Ping(1)".to_string()]);
}

#[tokio::test]
async fn revocation_removes_by_identity_not_position() {
    let bus = supported_bus();
    let log: Log = Arc::default();
    let sub_a = bus.subscribe(TestKind::Ping, recorder(&log, "a")).unwrap();
    let _sub_b = bus.subscribe(TestKind::Ping, recorder(&log, "b")).unwrap();
    let sub_c = bus.subscribe(TestKind::Ping, recorder(&log, "c")).unwrap();

    // Removing the head shifts positions; the handle for "c" must stay valid.
    sub_a.revoke();
    assert_eq!(bus.subscriber_count(TestKind::Ping), Some(2));

    bus.publish(TestEvent::Ping(1)).unwrap();
    settle().await;
    assert_eq!(
        *log.lock().unwrap(),
        vec!["b:Ping(1)".to_string(), "c:Ping(1)".to_string()]
    );

    sub_c.revoke();
    assert_eq!(bus.subscriber_count(TestKind::Ping), Some(1));

    log.lock().unwrap().clear();
    bus.publish(TestEvent::Ping(2)).unwrap();
    settle().await;
    assert_eq!(*log.lock().unwrap(), vec!["b:Ping(2)".to_string()]);
}

#[tokio::test]
async fn revocation_does_not_cancel_already_issued_invocations() {
    let bus = supported_bus();
    let log: Log = Arc::default();
    let sub = bus.subscribe(TestKind::Ping, recorder(&log, "h")).unwrap();

    bus.publish(TestEvent::Ping(9)).unwrap();
    // Too late for this publish: the invocation has been issued.
    sub.revoke();

    settle().await;
    assert_eq!(*log.lock().unwrap(), vec!["h:Ping(9)".to_string()]);

    // But future publishes no longer reach it.
    bus.publish(TestEvent::Ping(10)).unwrap();
    settle().await;
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unsupported_kind_is_rejected_for_subscribe_and_publish() {
    let bus = supported_bus();
    let log: Log = Arc::default();

    let err = bus
        .subscribe(TestKind::Unwired, recorder(&log, "h"))
        .unwrap_err();
    assert!(matches!(err, BusError::UnsupportedKind(TestKind::Unwired)));

    let err = bus.publish(TestEvent::Unwired).unwrap_err();
    assert!(matches!(err, BusError::UnsupportedKind(TestKind::Unwired)));
    assert_eq!(bus.subscriber_count(TestKind::Unwired), None);
}

#[tokio::test]
async fn failing_handler_does_not_block_other_subscribers() {
    let bus = supported_bus();
    let log: Log = Arc::default();

    bus.subscribe(TestKind::Note, |_event: TestEvent| async {
        Err("deliberate failure".into())
    })
    .unwrap();
    bus.subscribe(TestKind::Note, recorder(&log, "survivor")).unwrap();

    bus.publish(TestEvent::Note("still delivered".into())).unwrap();
    settle().await;

    assert_eq!(
        *log.lock().unwrap(),
        vec!["survivor:Note(\"still delivered\")".to_string()]
    );

    // The bus itself is unaffected: the failing subscriber is still wired for
    // the next publish, and publishing keeps working.
    assert_eq!(bus.subscriber_count(TestKind::Note), Some(2));
    bus.publish(TestEvent::Note("again".into())).unwrap();
    settle().await;
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn publishes_apply_in_issue_order_across_runtime_threads() {
    let bus = supported_bus();
    let seen: Arc<Mutex<Vec<u32>>> = Arc::default();
    {
        let seen = Arc::clone(&seen);
        bus.subscribe(TestKind::Ping, move |event: TestEvent| {
            let seen = Arc::clone(&seen);
            async move {
                if let TestEvent::Ping(n) = event {
                    seen.lock().unwrap().push(n);
                }
                Ok(())
            }
        })
        .unwrap();
    }

    for n in 0..100 {
        bus.publish(TestEvent::Ping(n)).unwrap();
    }

    // On the multi-thread runtime yielding proves nothing; wait for the
    // dispatcher to drain the queue.
    for _ in 0..400 {
        if seen.lock().unwrap().len() == 100 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let applied = seen.lock().unwrap().clone();
    assert_eq!(applied, (0..100).collect::<Vec<u32>>());
}

#[tokio::test]
async fn nested_publish_runs_after_the_outer_handler_finishes() {
    let bus = supported_bus();
    let log: Log = Arc::default();

    bus.subscribe(TestKind::Note, recorder(&log, "inner")).unwrap();
    {
        let log = Arc::clone(&log);
        let nested_bus = bus.clone();
        bus.subscribe(TestKind::Ping, move |event: TestEvent| {
            let log = Arc::clone(&log);
            let nested_bus = nested_bus.clone();
            async move {
                nested_bus.publish(TestEvent::Note("from outer".into()))?;
                // The nested subscriber must not have run inside this handler.
                log.lock().unwrap().push(format!("outer-done:{event:?}"));
                Ok(())
            }
        })
        .unwrap();
    }

    bus.publish(TestEvent::Ping(1)).unwrap();
    settle().await;

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            "outer-done:Ping(1)".to_string(),
            "inner:Note(\"from outer\")".to_string(),
        ]
    );
}
