use tinygkit_communication::firmware::tinyg::*;
use tinygkit_core::FooterPolicy;

fn kinds(notifications: &[Notification]) -> Vec<ReportKind> {
    notifications.iter().map(Notification::kind).collect()
}

#[test]
fn test_idempotent_ingest() {
    let line = r#"{"sr":{"stat":5,"posx":1.0,"posy":2.0,"momo":1,"unit":1}}"#;
    let mut controller = TinyGController::new();

    let first = controller.ingest(line);
    assert_eq!(kinds(&first), vec![ReportKind::Raw, ReportKind::StatusReport]);
    let after_first = controller.snapshot().clone();

    let second = controller.ingest(line);
    assert_eq!(kinds(&second), vec![ReportKind::Raw]);
    assert_eq!(controller.snapshot(), &after_first);
}

#[test]
fn test_absent_fields_are_preserved() {
    let mut controller = TinyGController::new();
    controller.ingest(r#"{"sr":{"posx":1.0,"posy":2.0,"posz":3.0,"coor":2,"dist":0}}"#);
    controller.ingest(r#"{"sr":{"posy":"7.500"}}"#);

    let wpos = controller.work_position();
    assert_eq!((wpos.x, wpos.y, wpos.z), (1.0, 7.5, 3.0));
    assert_eq!(controller.modal_group().wcs, "G55");
    assert_eq!(controller.modal_group().distance, "G90");
}

#[test]
fn test_status_code_gating() {
    let mut controller = TinyGController::new();

    let rejected = controller.ingest(r#"{"r":{"mt":2},"f":[1,108,8]}"#);
    assert_eq!(kinds(&rejected), vec![ReportKind::Raw, ReportKind::Footer]);
    assert_eq!(controller.live_status().motor_timeout, 0.0);

    let accepted = controller.ingest(r#"{"r":{"mt":2},"f":[1,0,8]}"#);
    assert_eq!(
        kinds(&accepted),
        vec![ReportKind::Raw, ReportKind::MotorTimeout, ReportKind::Footer]
    );
    assert_eq!(controller.live_status().motor_timeout, 2.0);

    // No footer means the value is not trusted.
    controller.ingest(r#"{"mfo":1.5}"#);
    assert_eq!(controller.overrides().feed, 1.0);

    controller.ingest(r#"{"r":{"mfo":1.5},"f":[1,0,8]}"#);
    assert_eq!(controller.overrides().feed, 1.5);
    assert_eq!(controller.settings().mfo, 1.5);
}

#[test]
fn test_zero_motor_timeout_accepted() {
    let mut controller = TinyGController::new();
    controller.ingest(r#"{"r":{"mt":2},"f":[1,0,8]}"#);
    controller.ingest(r#"{"r":{"mt":0},"f":[1,0,8]}"#);
    assert_eq!(controller.live_status().motor_timeout, 0.0);
}

#[test]
fn test_coolant_additivity() {
    let mut controller = TinyGController::new();
    let coolant = |c: &TinyGController| c.modal_group().coolant.clone();

    controller.ingest(r#"{"sr":{"com":1}}"#);
    assert_eq!(coolant(&controller), vec!["M7"]);

    controller.ingest(r#"{"sr":{"cof":1}}"#);
    assert_eq!(coolant(&controller), vec!["M7", "M8"]);

    controller.ingest(r#"{"sr":{"com":0}}"#);
    assert_eq!(coolant(&controller), vec!["M8"]);

    controller.ingest(r#"{"sr":{"cof":0}}"#);
    assert_eq!(coolant(&controller), vec!["M9"]);
}

#[test]
fn test_spindle_derivation() {
    let mut controller = TinyGController::new();

    controller.ingest(r#"{"sr":{"spe":1,"spd":0}}"#);
    assert_eq!(controller.modal_group().spindle, "M3");

    controller.ingest(r#"{"sr":{"spd":1}}"#);
    assert_eq!(controller.modal_group().spindle, "M4");

    controller.ingest(r#"{"sr":{"spe":0}}"#);
    assert_eq!(controller.modal_group().spindle, "M5");

    controller.ingest(r#"{"sr":{"sps":12000}}"#);
    assert_eq!(controller.modal_group().spindle, "M5");
    assert_eq!(controller.status_report().spindle_speed, 12000.0);
}

#[test]
fn test_unknown_settings_filtered() {
    let mut controller = TinyGController::new();

    let out = controller.ingest(r#"{"r":{"sys":{"fv":0.97,"fb":440.2,"xvm":16000}},"f":[1,0,8]}"#);
    let Some(Notification::SystemSettings(accepted)) = out.get(1) else {
        panic!("expected system settings notification");
    };
    assert!(accepted.contains_key("fv"));
    assert!(!accepted.contains_key("xvm"));
    assert_eq!(controller.settings().fv, 0.97);

    let out = controller.ingest(r#"{"r":{"xvm":16000},"f":[1,0,8]}"#);
    assert_eq!(kinds(&out), vec![ReportKind::Raw, ReportKind::Footer]);
}

#[test]
fn test_malformed_lines_keep_state() {
    let mut controller = TinyGController::new();
    controller.ingest(r#"{"sr":{"stat":1,"posx":4.0}}"#);
    let before = controller.snapshot().clone();

    for line in [r#"{"sr":{"stat":"#, "tinyg [mm] ok>", "{}", "[1,2,3]"] {
        let out = controller.ingest(line);
        assert_eq!(kinds(&out), vec![ReportKind::Raw], "line: {line}");
    }
    assert_eq!(controller.snapshot(), &before);
    assert!(controller.is_idle());
}

#[test]
fn test_override_frame_with_error_status() {
    let mut controller = TinyGController::new();

    let out = controller.ingest(r#"{"r":{"mfo":1.5},"f":[1,108,8]}"#);
    assert_eq!(kinds(&out), vec![ReportKind::Raw, ReportKind::Footer]);
    assert_eq!(controller.settings().mfo, 1.0);
}

#[test]
fn test_nested_overrides_need_success_status() {
    let mut controller = TinyGController::new();

    controller.ingest(r#"{"r":{"sys":{"mfo":0.5}},"f":[1,40,8]}"#);
    assert_eq!(controller.settings().mfo, 1.0);

    controller.ingest(r#"{"r":{"r":{"sso":0.25}},"f":[1,40,8]}"#);
    assert_eq!(controller.settings().sso, 1.0);

    controller.ingest(r#"{"r":{"sys":{"mfo":0.5}},"f":[1,0,8]}"#);
    controller.ingest(r#"{"r":{"r":{"sso":0.25}},"f":[1,0,8]}"#);
    assert_eq!(controller.overrides().feed, 0.5);
    assert_eq!(controller.overrides().spindle, 0.25);
}

#[test]
fn test_footer_with_unreadable_status_still_ticks() {
    let mut controller = TinyGController::new();

    let out = controller.ingest(r#"{"r":{"mt":2},"f":[1,"x",8]}"#);
    assert_eq!(kinds(&out), vec![ReportKind::Raw, ReportKind::Footer]);
    assert_eq!(controller.live_status().motor_timeout, 0.0);
    assert_eq!(controller.footer().rx_buffer_info, 8);
    assert_eq!(controller.footer().status_code, 0);
}

#[test]
fn test_machine_state_transitions() {
    let mut controller = TinyGController::new();
    controller.ingest(r#"{"sr":{"stat":9}}"#);
    assert_eq!(controller.machine_state(), Some(MachineState::Homing));

    controller.ingest(r#"{"sr":{"stat":2}}"#);
    assert!(controller.is_alarm());

    controller.ingest(r#"{"sr":{"stat":1}}"#);
    assert!(!controller.is_alarm());
    assert!(controller.is_idle());
}

#[test]
fn test_footer_every_frame() {
    let mut controller = TinyGController::with_footer_policy(FooterPolicy::EveryFrame);
    let line = r#"{"r":{"fv":0.97},"f":[1,0,8]}"#;

    assert_eq!(
        kinds(&controller.ingest(line)),
        vec![ReportKind::Raw, ReportKind::ReceiveEcho, ReportKind::Footer]
    );
    assert_eq!(
        kinds(&controller.ingest(line)),
        vec![ReportKind::Raw, ReportKind::Footer]
    );
    assert!(controller.footer().is_success());
}
