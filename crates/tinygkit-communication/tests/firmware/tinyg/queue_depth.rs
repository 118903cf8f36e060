use proptest::prelude::*;
use tinygkit_communication::firmware::tinyg::*;

#[test]
fn test_high_water_mark() {
    let mut controller = TinyGController::new();
    for qr in [4, 9, 3, 12, 2] {
        controller.ingest(&format!(r#"{{"qr":{qr}}}"#));
    }
    assert_eq!(controller.planner_buffer_pool_size(), 12);
    assert_eq!(controller.live_status().queue.qr, 2);
}

#[test]
fn test_queue_counters() {
    let mut controller = TinyGController::new();
    let out = controller.ingest(r#"{"r":{"qr":28,"qi":1,"qo":0},"f":[1,0,8]}"#);

    assert!(matches!(
        out.get(1),
        Some(Notification::QueueReport(QueueReport { qr: 28, qi: 1, qo: 0 }))
    ));
    assert_eq!(controller.planner_buffer_pool_size(), 28);
}

#[test]
fn test_zero_is_reported() {
    let mut controller = TinyGController::new();
    controller.ingest(r#"{"qr":5}"#);
    let out = controller.ingest(r#"{"qr":0}"#);

    assert_eq!(out.len(), 2);
    assert_eq!(controller.live_status().queue.qr, 0);
    assert_eq!(controller.planner_buffer_pool_size(), 5);
}

proptest! {
    #[test]
    fn prop_high_water_mark_is_running_max(depths in prop::collection::vec(0u32..1024, 1..64)) {
        let mut controller = TinyGController::new();
        let mut previous = 0;

        for qr in &depths {
            controller.ingest(&format!(r#"{{"qr":{qr}}}"#));
            let size = controller.planner_buffer_pool_size();
            prop_assert!(size >= previous);
            prop_assert!(size >= *qr);
            previous = size;
        }

        prop_assert_eq!(previous, depths.iter().copied().max().unwrap_or(0));
    }
}
