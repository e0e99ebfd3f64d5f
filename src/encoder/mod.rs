//! Encoder Module
//!
//! Builds the transmit payload for each protocol family.
//!
//! ## Families
//! - Classic:     named group/device call, 350µs pulses
//! - Intertechno: 12-symbol tri-state word from lookup tables, 300µs pulses
//! - Zap/REV:     24-bit code from group/switch bit fields, 188µs pulses
//!
//! Every family uses driver protocol id 1.

pub mod binary;
mod classic;
mod intertechno;
mod zaprev;

pub use binary::to_binary_digits;
pub use classic::ClassicEncoder;
pub use intertechno::{tri_state_code, IntertechnoEncoder, TRI_STATE_NIBBLES};
pub use zaprev::{zap_code, ZapRevEncoder, ZAP_CODE_BITS, ZAP_CODE_RANGE};

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Command, Protocol};
use crate::transmit::{Payload, Transmission};

/// Driver protocol id shared by all families
pub const DEFAULT_PROTOCOL_ID: u8 = 1;

/// Turns a command into the frame its protocol expects
pub trait ProtocolEncoder: Send + Sync {
    /// Family handled by this encoder
    fn protocol(&self) -> Protocol;

    /// Bit-cell length in microseconds
    fn pulse_length_us(&self) -> u32;

    /// Driver protocol id
    fn protocol_id(&self) -> u8 {
        DEFAULT_PROTOCOL_ID
    }

    /// Frame content for switching on or off
    fn payload(&self, command: &Command, on: bool) -> Result<Payload>;

    /// Complete transmission for switching on or off
    fn encode(&self, command: &Command, on: bool) -> Result<Transmission> {
        Ok(Transmission {
            protocol_id: self.protocol_id(),
            pulse_length_us: self.pulse_length_us(),
            payload: self.payload(command, on)?,
        })
    }

    /// Check that the command could be transmitted, without transmitting
    ///
    /// Status queries run this so they fail exactly when On would.
    fn validate(&self, command: &Command) -> Result<()> {
        self.payload(command, true).map(|_| ())
    }
}

/// One encoder per family
#[derive(Debug, Clone, Copy, Default)]
pub struct EncoderSet {
    pub classic: ClassicEncoder,
    pub intertechno: IntertechnoEncoder,
    pub zap_rev: ZapRevEncoder,
}

impl EncoderSet {
    /// Encoders configured from the transmitter settings
    pub fn from_config(config: &Config) -> Self {
        Self {
            classic: ClassicEncoder::new(config.classic_device),
            intertechno: IntertechnoEncoder,
            zap_rev: ZapRevEncoder::new(config.zap_transmit),
        }
    }

    /// Encoder for a protocol family
    pub fn for_protocol(&self, protocol: Protocol) -> &dyn ProtocolEncoder {
        match protocol {
            Protocol::Classic => &self.classic,
            Protocol::Intertechno => &self.intertechno,
            Protocol::ZapRev => &self.zap_rev,
        }
    }

    /// Encode a command with its family's encoder
    pub fn encode(&self, command: &Command, on: bool) -> Result<Transmission> {
        self.for_protocol(command.protocol).encode(command, on)
    }
}
