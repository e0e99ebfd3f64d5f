//! Tests for the one-shot sender
//!
//! These tests verify:
//! - Argument layout parsing
//! - Each send mode's transmission
//! - Multi mode skipping failing targets

use rf433d::config::ZapTransmitMode;
use rf433d::oneshot::{Batch, OneShot, SendMode, Target};
use rf433d::protocol::Protocol;
use rf433d::transmit::{Device, Payload, RecordingTransmitter, TransmitEvent, TransmitLine};
use rf433d::SwitchError;

// =============================================================================
// Helper Functions
// =============================================================================

fn target(system: &str, unit: &str) -> Target {
    Target {
        system_code: system.to_string(),
        unit_code: unit.to_string(),
    }
}

fn oneshot(mode: SendMode) -> OneShot {
    OneShot::new(mode, ZapTransmitMode::Named)
}

// =============================================================================
// Batch Parsing Tests
// =============================================================================

#[test]
fn test_parse_single_target() {
    let batch = Batch::parse(&["00001", "2", "1"]).unwrap();

    assert_eq!(batch.targets, vec![target("00001", "2")]);
    assert_eq!(batch.command, 1);
    assert!(!batch.is_multi());
}

#[test]
fn test_parse_multiple_targets() {
    let batch = Batch::parse(&["00001", "1", "00001", "2", "00010", "3", "0"]).unwrap();

    assert_eq!(batch.targets.len(), 3);
    assert_eq!(batch.targets[2], target("00010", "3"));
    assert_eq!(batch.command, 0);
    assert!(batch.is_multi());
}

#[test]
fn test_parse_rejects_bad_layouts() {
    assert!(Batch::parse(&["00001", "1"]).is_err());
    assert!(Batch::parse(&["00001", "1", "00010", "1"]).is_err());
    assert!(Batch::parse(&["00001", "1", "on"]).is_err());
}

// =============================================================================
// Mode Tests
// =============================================================================

#[test]
fn test_classic_mode() {
    let tx = oneshot(SendMode::Classic)
        .transmission(&target("00001", "2"), 1)
        .unwrap();

    assert_eq!(tx.pulse_length_us, 350);
    assert_eq!(
        tx.payload,
        Payload::Named {
            protocol: Protocol::Classic,
            group: "00001".to_string(),
            device: Device::Channel(2),
            on: true,
        }
    );
}

#[test]
fn test_binary_mode_reformats_unit_code() {
    let tx = oneshot(SendMode::Binary)
        .transmission(&target("00001", "10"), 0)
        .unwrap();

    match tx.payload {
        Payload::Named { device, on, .. } => {
            assert_eq!(device, Device::Binary("00010".to_string()));
            assert!(!on);
        }
        other => panic!("Expected named payload, got {:?}", other),
    }
}

#[test]
fn test_intertechno_mode() {
    let tx = oneshot(SendMode::Intertechno)
        .transmission(&target("2", "2"), 1)
        .unwrap();

    assert_eq!(tx.payload, Payload::TriState("F000F0000FFF".to_string()));
}

#[test]
fn test_zap_rev_mode_numeric() {
    let tx = OneShot::new(SendMode::ZapRev, ZapTransmitMode::Numeric)
        .transmission(&target("11000", "5"), 1)
        .unwrap();

    assert_eq!(
        tx.payload,
        Payload::Numeric {
            code: 357635,
            bit_length: 24
        }
    );
}

#[test]
fn test_decimal_mode_sends_raw_code() {
    let tx = oneshot(SendMode::Decimal)
        .transmission(&target("357635", "188"), 1)
        .unwrap();

    assert_eq!(tx.protocol_id, 1);
    assert_eq!(tx.pulse_length_us, 188);
    assert_eq!(
        tx.payload,
        Payload::Numeric {
            code: 357635,
            bit_length: 24
        }
    );
}

#[test]
fn test_status_command_is_unsupported() {
    let result = oneshot(SendMode::Classic).transmission(&target("00001", "2"), 2);
    assert!(matches!(result, Err(SwitchError::UnsupportedAction(2))));
}

// =============================================================================
// Run Tests
// =============================================================================

#[test]
fn test_run_multi_mode_skips_failures() {
    let recorder = RecordingTransmitter::new();
    let line = TransmitLine::new(recorder.clone());
    let batch = Batch::parse(&["1", "1", "17", "1", "3", "4", "1"]).unwrap();

    let sent = oneshot(SendMode::Intertechno).run(&batch, &line).unwrap();

    assert_eq!(sent, 2);
    assert_eq!(
        recorder.frames(),
        vec![
            TransmitEvent::TriState("000000000FFF".to_string()),
            TransmitEvent::TriState("0F00FF000FFF".to_string()),
        ]
    );
}

#[test]
fn test_run_single_mode_returns_failure() {
    let line = TransmitLine::new(RecordingTransmitter::new());
    let batch = Batch::parse(&["17", "1", "1"]).unwrap();

    let result = oneshot(SendMode::Intertechno).run(&batch, &line);
    assert!(matches!(result, Err(SwitchError::UnsupportedCode(_))));
}
