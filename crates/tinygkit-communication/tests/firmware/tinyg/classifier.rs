use serde_json::json;
use tinygkit_communication::firmware::tinyg::*;

#[test]
fn test_priority_order() {
    let frame = json!({
        "r": {"qr": 10, "sr": {"stat": 1}, "sys": {"fv": 0.97}, "mfo": 1.2},
        "f": [1, 0, 8]
    });
    assert_eq!(classify(&frame).kind(), Some(ReportKind::QueueReport));

    let frame = json!({"r": {"sr": {"stat": 1}, "sys": {"fv": 0.97}}});
    assert_eq!(classify(&frame).kind(), Some(ReportKind::StatusReport));

    let frame = json!({"r": {"pwr": {"1": 0}, "qr": 3}});
    assert_eq!(classify(&frame).kind(), Some(ReportKind::PowerManagement));
}

#[test]
fn test_nested_key_wins_over_flat() {
    let frame = json!({"r": {"qr": 5}, "qr": 30});
    let TinyGReport::QueueDepth(qr) = classify(&frame) else {
        panic!("expected queue report");
    };
    assert_eq!(qr.qr, 5);
}

#[test]
fn test_plain_acknowledgement_is_receive_echo() {
    let frame = json!({"r": {"fv": 0.97, "fb": 440.20}, "f": [1, 0, 8]});
    assert_eq!(classify(&frame).kind(), Some(ReportKind::ReceiveEcho));
}

#[test]
fn test_non_object_payloads_are_empty() {
    let TinyGReport::SystemSettings(values) = classify(&json!({"sys": 7})) else {
        panic!("expected system settings");
    };
    assert!(values.is_empty());

    let TinyGReport::StatusReport(fields) = classify(&json!({"sr": "x"})) else {
        panic!("expected status report");
    };
    assert_eq!(*fields, StatusFields::default());
}

#[test]
fn test_error_frame_is_unrecognized() {
    let frame = json!({"er": {"fb": 440.20, "st": 29, "msg": "Generic EEPROM error"}});
    assert!(!classify(&frame).is_recognized());
}

#[test]
fn test_footer_status_extraction() {
    let frame = decode_frame(r#"{"r":{"mt":2},"f":[1,0,255]}"#).unwrap();
    assert_eq!(parse_footer(&frame), Some(vec![Some(1), Some(0), Some(255)]));

    let frame = decode_frame(r#"{"r":{"mt":2},"f":"bad"}"#).unwrap();
    assert_eq!(parse_footer(&frame), None);
}
