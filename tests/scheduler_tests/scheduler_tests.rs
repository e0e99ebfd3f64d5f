//! Tests for DeferredScheduler
//!
//! These tests verify:
//! - A job re-transmits once after its delay
//! - Rescheduling an address replaces the pending job
//! - Cancellation
//! - End-to-end timeout handling through the controller

use std::thread;
use std::time::{Duration, Instant};

use rf433d::address::{classic_address, Address};
use rf433d::config::Config;
use rf433d::encoder::EncoderSet;
use rf433d::protocol::{Action, Command, Protocol, Reply};
use rf433d::scheduler::{DeferredJob, DeferredScheduler};
use rf433d::transmit::{Device, RecordingTransmitter, TransmitEvent, TransmitLine};
use rf433d::SwitchController;

// =============================================================================
// Helper Functions
// =============================================================================

const UNIT: Duration = Duration::from_millis(20);

fn setup_scheduler() -> (RecordingTransmitter, DeferredScheduler) {
    let recorder = RecordingTransmitter::new();
    let scheduler = DeferredScheduler::new(TransmitLine::new(recorder.clone()), UNIT);
    (recorder, scheduler)
}

fn job(switch: u8, on: bool) -> DeferredJob {
    DeferredJob {
        command: Command::classic("00001", switch, if on { Action::On } else { Action::Off }),
        encoders: EncoderSet::default(),
        on,
    }
}

fn address(switch: u8) -> Address {
    classic_address("00001", switch).unwrap()
}

fn wait_for<F: Fn() -> bool>(condition: F, limit: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < limit {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn named(switch: u8, on: bool) -> TransmitEvent {
    TransmitEvent::Named {
        protocol: Protocol::Classic,
        group: "00001".to_string(),
        device: Device::Channel(switch),
        on,
    }
}

// =============================================================================
// Scheduler Tests
// =============================================================================

#[test]
fn test_job_fires_once_after_delay() {
    let (recorder, scheduler) = setup_scheduler();

    scheduler.schedule(address(16), 2, job(16, true)).unwrap();
    assert_eq!(scheduler.pending(), 1);
    assert!(recorder.frames().is_empty());

    assert!(wait_for(|| recorder.frames().len() == 1, Duration::from_secs(5)));
    assert_eq!(recorder.frames(), vec![named(16, true)]);
    assert!(wait_for(|| scheduler.pending() == 0, Duration::from_secs(1)));

    thread::sleep(UNIT * 4);
    assert_eq!(recorder.frames().len(), 1);
}

#[test]
fn test_reschedule_replaces_pending_job() {
    let (recorder, scheduler) = setup_scheduler();

    scheduler.schedule(address(8), 50, job(8, true)).unwrap();
    scheduler.schedule(address(8), 1, job(8, false)).unwrap();
    assert_eq!(scheduler.pending(), 1);

    assert!(wait_for(|| !recorder.frames().is_empty(), Duration::from_secs(5)));
    thread::sleep(UNIT * 4);
    assert_eq!(recorder.frames(), vec![named(8, false)]);
}

#[test]
fn test_jobs_for_different_addresses_run_independently() {
    let (recorder, scheduler) = setup_scheduler();

    scheduler.schedule(address(1), 1, job(1, true)).unwrap();
    scheduler.schedule(address(2), 1, job(2, true)).unwrap();
    assert_eq!(scheduler.pending(), 2);

    assert!(wait_for(|| recorder.frames().len() == 2, Duration::from_secs(5)));
}

#[test]
fn test_cancel_prevents_transmission() {
    let (recorder, scheduler) = setup_scheduler();

    scheduler.schedule(address(4), 3, job(4, true)).unwrap();
    assert!(scheduler.cancel(address(4)));
    assert!(!scheduler.cancel(address(4)));
    assert_eq!(scheduler.pending(), 0);

    thread::sleep(UNIT * 6);
    assert!(recorder.frames().is_empty());
}

// =============================================================================
// Controller Integration Tests
// =============================================================================

#[test]
fn test_controller_resends_after_timeout() {
    let recorder = RecordingTransmitter::new();
    let config = Config::builder().deferred_unit(UNIT).build();
    let mut controller = SwitchController::new(config, TransmitLine::new(recorder.clone())).unwrap();

    assert_eq!(controller.handle(b"1000011612"), Reply::State(true));
    assert_eq!(recorder.frames(), vec![named(16, true)]);

    assert!(wait_for(|| recorder.frames().len() == 2, Duration::from_secs(5)));
    assert_eq!(recorder.frames()[1], named(16, true));

    // The re-send leaves the table alone
    assert!(controller.state().get(address(16)));
    assert_eq!(controller.state().count_on(), 1);
}
