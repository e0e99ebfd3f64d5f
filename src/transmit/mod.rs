//! Transmit Module
//!
//! Contract with the RF transmit driver and the serialized line shared by
//! live requests and deferred re-sends.
//!
//! ## Responsibilities
//! - Describe one transmission (protocol id, pulse length, payload)
//! - Serialize driver access: one transmission at a time
//! - Provide a dry-run driver that only logs, and a recording driver for tests

mod driver;

pub use driver::{DryRunTransmitter, RecordingTransmitter, TransmitEvent};

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::protocol::Protocol;

/// Driver contract for a 433MHz transmitter
///
/// Calls are blocking and not reentrant; `TransmitLine` guarantees that.
pub trait Transmitter: Send {
    /// Claim the output pin
    fn enable_transmit(&mut self, pin: u8) -> Result<()>;

    /// Select the pulse protocol and bit-cell length
    fn configure(&mut self, protocol_id: u8, pulse_length_us: u32) -> Result<()>;

    /// Group/device switch call; the driver builds the frame
    fn transmit_named(&mut self, protocol: Protocol, group: &str, device: &Device, on: bool) -> Result<()>;

    /// Send a tri-state (`0`/`1`/`F`) code word
    fn transmit_tri_state(&mut self, code: &str) -> Result<()>;

    /// Send the low `bit_length` bits of `code`
    fn transmit_numeric(&mut self, code: u64, bit_length: u8) -> Result<()>;
}

/// Device argument of a named call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// Raw channel number
    Channel(u8),

    /// Channel as binary digits, most significant first
    Binary(String),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Channel(channel) => write!(f, "{}", channel),
            Device::Binary(digits) => f.write_str(digits),
        }
    }
}

/// Frame content handed to the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Named group/device on/off call
    Named {
        protocol: Protocol,
        group: String,
        device: Device,
        on: bool,
    },

    /// Tri-state code word
    TriState(String),

    /// Raw numeric code
    Numeric { code: u64, bit_length: u8 },
}

/// One complete transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// Driver protocol id
    pub protocol_id: u8,

    /// Bit-cell length in microseconds
    pub pulse_length_us: u32,

    pub payload: Payload,
}

/// Shared, serialized handle to one transmitter
#[derive(Clone)]
pub struct TransmitLine {
    driver: Arc<Mutex<Box<dyn Transmitter>>>,
}

impl TransmitLine {
    /// Wrap a driver
    pub fn new<T: Transmitter + 'static>(driver: T) -> Self {
        Self {
            driver: Arc::new(Mutex::new(Box::new(driver))),
        }
    }

    /// Claim the output pin
    pub fn enable(&self, pin: u8) -> Result<()> {
        self.driver.lock().enable_transmit(pin)
    }

    /// Configure the driver and send one transmission
    ///
    /// The lock is held across configure and send so a concurrent
    /// transmission cannot change the pulse settings in between.
    pub fn send(&self, transmission: &Transmission) -> Result<()> {
        let mut driver = self.driver.lock();
        driver.configure(transmission.protocol_id, transmission.pulse_length_us)?;

        match &transmission.payload {
            Payload::Named {
                protocol,
                group,
                device,
                on,
            } => driver.transmit_named(*protocol, group, device, *on)?,
            Payload::TriState(code) => driver.transmit_tri_state(code)?,
            Payload::Numeric { code, bit_length } => driver.transmit_numeric(*code, *bit_length)?,
        }

        tracing::trace!("Transmitted {:?}", transmission.payload);
        Ok(())
    }
}
