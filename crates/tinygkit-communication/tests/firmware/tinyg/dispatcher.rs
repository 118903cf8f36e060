use tinygkit_communication::firmware::tinyg::*;
use tinygkit_core::EventDispatcher;

#[tokio::test]
async fn test_notifications_fan_out() {
    let dispatcher = EventDispatcher::new(16);
    let mut rx1 = dispatcher.subscribe();
    let mut rx2 = dispatcher.subscribe();

    let mut controller = TinyGController::new().with_dispatcher(dispatcher);
    let returned = controller.ingest(r#"{"r":{"qr":28},"f":[1,0,8]}"#);
    assert_eq!(returned.len(), 3);

    for rx in [&mut rx1, &mut rx2] {
        for expected in &returned {
            assert_eq!(&rx.recv().await.unwrap(), expected);
        }
    }
}

#[tokio::test]
async fn test_filtered_subscriber() {
    let dispatcher = EventDispatcher::new(16);
    let mut rx = dispatcher.subscribe();
    let filter = NotificationFilter::Kinds(vec![ReportKind::StatusReport]);

    let mut controller = TinyGController::new().with_dispatcher(dispatcher);
    controller.ingest(r#"{"qr":4}"#);
    controller.ingest(r#"{"sr":{"stat":5}}"#);

    let mut matched = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        if filter.matches(&notification) {
            matched.push(notification);
        }
    }

    assert_eq!(matched.len(), 1);
    let Notification::StatusReport(sr) = &matched[0] else {
        panic!("expected status report");
    };
    assert_eq!(sr.machine_state, Some(MachineState::Run));
}
