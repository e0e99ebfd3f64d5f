//! Tests for SwitchController
//!
//! These tests verify:
//! - Request handling and reply tokens
//! - State updates for On/Off and read-only Status
//! - Transmissions reaching the driver
//! - Failure handling without transmission
//! - Deferred scheduling from the timeout field

use std::time::Duration;

use rf433d::address::{classic_address, Address};
use rf433d::config::{Config, GroupValidation, ZapTransmitMode};
use rf433d::protocol::{Action, Command, Protocol, Reply};
use rf433d::transmit::{Device, RecordingTransmitter, TransmitEvent, TransmitLine};
use rf433d::{SwitchController, SwitchError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_controller_with(config: Config) -> (RecordingTransmitter, SwitchController) {
    let recorder = RecordingTransmitter::new();
    let controller = SwitchController::new(config, TransmitLine::new(recorder.clone())).unwrap();
    recorder.clear();
    (recorder, controller)
}

fn setup_controller() -> (RecordingTransmitter, SwitchController) {
    setup_controller_with(Config::builder().deferred_enabled(false).build())
}

fn classic(group: &str, switch: u8) -> Address {
    classic_address(group, switch).unwrap()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_new_enables_configured_pin() {
    let recorder = RecordingTransmitter::new();
    let config = Config::builder().transmit_pin(17).build();

    let _controller = SwitchController::new(config, TransmitLine::new(recorder.clone())).unwrap();

    assert_eq!(recorder.events(), vec![TransmitEvent::Enabled { pin: 17 }]);
}

#[test]
fn test_new_rejects_small_state_table() {
    let config = Config::builder().state_capacity(2048).build();
    let result = SwitchController::new(config, TransmitLine::new(RecordingTransmitter::new()));

    assert!(matches!(result, Err(SwitchError::Config(_))));
}

#[test]
fn test_fresh_state_is_all_off() {
    let (_recorder, controller) = setup_controller();

    assert_eq!(controller.state().capacity(), 3328);
    assert_eq!(controller.state().count_on(), 0);
}

// =============================================================================
// On/Off/Status Tests
// =============================================================================

#[test]
fn test_on_then_off() {
    let (_recorder, mut controller) = setup_controller();

    assert_eq!(controller.handle(b"100001161"), Reply::State(true));
    assert!(controller.state().get(classic("00001", 16)));

    assert_eq!(controller.handle(b"100001160"), Reply::State(false));
    assert!(!controller.state().get(classic("00001", 16)));
}

#[test]
fn test_repeated_on_is_idempotent() {
    let (recorder, mut controller) = setup_controller();

    assert_eq!(controller.handle(b"100001161"), Reply::State(true));
    assert_eq!(controller.handle(b"100001161"), Reply::State(true));
    assert_eq!(controller.state().count_on(), 1);

    let frames_before = recorder.frames().len();
    assert_eq!(controller.handle(b"100001162"), Reply::State(true));
    assert_eq!(recorder.frames().len(), frames_before);
    assert_eq!(controller.state().count_on(), 1);
}

#[test]
fn test_status_of_untouched_switch_is_off() {
    let (recorder, mut controller) = setup_controller();

    assert_eq!(controller.handle(b"110101042"), Reply::State(false));
    assert_eq!(controller.handle(b"202032"), Reply::State(false));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_protocols_do_not_share_state() {
    let (_recorder, mut controller) = setup_controller();

    controller.handle(b"100001051");

    assert_eq!(controller.handle(b"300001052"), Reply::State(false));
    assert_eq!(controller.handle(b"100001052"), Reply::State(true));
}

// =============================================================================
// Transmission Tests
// =============================================================================

#[test]
fn test_classic_transmission_settings() {
    let (recorder, mut controller) = setup_controller();

    controller.handle(b"100001080");

    assert_eq!(
        recorder.events(),
        vec![
            TransmitEvent::Configured {
                protocol_id: 1,
                pulse_length_us: 350
            },
            TransmitEvent::Named {
                protocol: Protocol::Classic,
                group: "00001".to_string(),
                device: Device::Channel(8),
                on: false,
            },
        ]
    );
}

#[test]
fn test_intertechno_transmission() {
    let (recorder, mut controller) = setup_controller();

    controller.handle(b"202020");

    assert_eq!(
        recorder.frames(),
        vec![TransmitEvent::TriState("F000F0000FF0".to_string())]
    );
}

#[test]
fn test_zap_rev_numeric_transmission() {
    let config = Config::builder()
        .deferred_enabled(false)
        .zap_transmit(ZapTransmitMode::Numeric)
        .build();
    let (recorder, mut controller) = setup_controller_with(config);

    assert_eq!(controller.handle(b"311000051"), Reply::State(true));

    assert_eq!(
        recorder.events(),
        vec![
            TransmitEvent::Configured {
                protocol_id: 1,
                pulse_length_us: 188
            },
            TransmitEvent::Numeric {
                code: 357635,
                bit_length: 24
            },
        ]
    );
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_failures_reply_two_without_transmitting() {
    let (recorder, mut controller) = setup_controller();

    for request in [
        &b"900001161"[..], // unknown protocol
        b"100",            // incomplete
        b"217011",         // unsupported house code
        b"201171",         // unsupported unit code
        b"100001165",      // unsupported action
        b"311111001",      // zap code below window
    ] {
        assert_eq!(controller.handle(request), Reply::Failure, "{:?}", request);
    }

    assert!(recorder.events().is_empty());
    assert_eq!(controller.state().count_on(), 0);
}

#[test]
fn test_zap_rev_status_fails_when_on_would() {
    let (_recorder, mut controller) = setup_controller();

    assert_eq!(controller.handle(b"311111002"), Reply::Failure);
    assert_eq!(controller.handle(b"311000052"), Reply::State(false));
}

#[test]
fn test_strict_groups_reject_malformed_group() {
    let config = Config::builder()
        .deferred_enabled(false)
        .group_validation(GroupValidation::Strict)
        .build();
    let (recorder, mut controller) = setup_controller_with(config);

    let cmd = Command::classic("0a001", 1, Action::On);
    assert!(matches!(
        controller.execute(&cmd),
        Err(SwitchError::MalformedGroup(_))
    ));
    assert!(recorder.events().is_empty());

    assert_eq!(controller.handle(b"300FFF051"), Reply::State(true));
}

#[test]
fn test_legacy_groups_accept_malformed_group() {
    let (_recorder, mut controller) = setup_controller();

    let cmd = Command::classic("0a001", 1, Action::On);
    assert!(controller.execute(&cmd).unwrap());
}

// =============================================================================
// Deferred Scheduling Tests
// =============================================================================

#[test]
fn test_timeout_schedules_deferred_job() {
    let config = Config::builder()
        .deferred_unit(Duration::from_secs(3600))
        .build();
    let (_recorder, mut controller) = setup_controller_with(config);

    assert_eq!(controller.handle(b"1000011615"), Reply::State(true));

    let scheduler = controller.scheduler().unwrap();
    assert_eq!(scheduler.pending(), 1);
    assert!(scheduler.cancel(classic("00001", 16)));
}

#[test]
fn test_zero_timeout_and_status_schedule_nothing() {
    let config = Config::builder()
        .deferred_unit(Duration::from_secs(3600))
        .build();
    let (_recorder, mut controller) = setup_controller_with(config);

    controller.handle(b"1000011610");
    controller.handle(b"1000011625");

    assert_eq!(controller.scheduler().unwrap().pending(), 0);
}

#[test]
fn test_disabled_scheduler_ignores_timeout() {
    let (_recorder, mut controller) = setup_controller();

    assert_eq!(controller.handle(b"1000011615"), Reply::State(true));
    assert!(controller.scheduler().is_none());
}
