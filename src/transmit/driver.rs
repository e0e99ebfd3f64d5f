//! Transmitter implementations
//!
//! Drivers that do not touch hardware.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Device, Transmitter};
use crate::error::Result;
use crate::protocol::Protocol;

/// Logs every call instead of pulsing a pin
#[derive(Debug, Default)]
pub struct DryRunTransmitter {
    pin: Option<u8>,
}

impl DryRunTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin claimed by `enable_transmit`
    pub fn pin(&self) -> Option<u8> {
        self.pin
    }
}

impl Transmitter for DryRunTransmitter {
    fn enable_transmit(&mut self, pin: u8) -> Result<()> {
        tracing::info!("Dry-run transmitter on pin {}", pin);
        self.pin = Some(pin);
        Ok(())
    }

    fn configure(&mut self, protocol_id: u8, pulse_length_us: u32) -> Result<()> {
        tracing::debug!("protocol {} pulse {}us", protocol_id, pulse_length_us);
        Ok(())
    }

    fn transmit_named(&mut self, protocol: Protocol, group: &str, device: &Device, on: bool) -> Result<()> {
        tracing::info!(
            "[dry-run] {} switch{} group={} device={}",
            protocol,
            if on { "On" } else { "Off" },
            group,
            device
        );
        Ok(())
    }

    fn transmit_tri_state(&mut self, code: &str) -> Result<()> {
        tracing::info!("[dry-run] sendTriState {}", code);
        Ok(())
    }

    fn transmit_numeric(&mut self, code: u64, bit_length: u8) -> Result<()> {
        tracing::info!("[dry-run] send {} ({} bits)", code, bit_length);
        Ok(())
    }
}

/// A driver call captured by `RecordingTransmitter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmitEvent {
    Enabled { pin: u8 },
    Configured { protocol_id: u8, pulse_length_us: u32 },
    Named { protocol: Protocol, group: String, device: Device, on: bool },
    TriState(String),
    Numeric { code: u64, bit_length: u8 },
}

/// Records driver calls; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingTransmitter {
    events: Arc<Mutex<Vec<TransmitEvent>>>,
}

impl RecordingTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded call
    pub fn events(&self) -> Vec<TransmitEvent> {
        self.events.lock().clone()
    }

    /// Recorded calls that put a frame on air
    pub fn frames(&self) -> Vec<TransmitEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| {
                !matches!(
                    event,
                    TransmitEvent::Enabled { .. } | TransmitEvent::Configured { .. }
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn record(&self, event: TransmitEvent) {
        self.events.lock().push(event);
    }
}

impl Transmitter for RecordingTransmitter {
    fn enable_transmit(&mut self, pin: u8) -> Result<()> {
        self.record(TransmitEvent::Enabled { pin });
        Ok(())
    }

    fn configure(&mut self, protocol_id: u8, pulse_length_us: u32) -> Result<()> {
        self.record(TransmitEvent::Configured {
            protocol_id,
            pulse_length_us,
        });
        Ok(())
    }

    fn transmit_named(&mut self, protocol: Protocol, group: &str, device: &Device, on: bool) -> Result<()> {
        self.record(TransmitEvent::Named {
            protocol,
            group: group.to_string(),
            device: device.clone(),
            on,
        });
        Ok(())
    }

    fn transmit_tri_state(&mut self, code: &str) -> Result<()> {
        self.record(TransmitEvent::TriState(code.to_string()));
        Ok(())
    }

    fn transmit_numeric(&mut self, code: u64, bit_length: u8) -> Result<()> {
        self.record(TransmitEvent::Numeric { code, bit_length });
        Ok(())
    }
}
