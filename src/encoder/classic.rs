//! Classic (Elro-style) encoder
//!
//! The driver builds the frame from the DIP switch group and the device,
//! so this encoder only selects the device argument form.

use super::binary::{to_binary_digits, DEFAULT_WIDTH};
use super::ProtocolEncoder;
use crate::config::DeviceMode;
use crate::error::Result;
use crate::protocol::{Command, Protocol};
use crate::transmit::{Device, Payload};

const PULSE_LENGTH_US: u32 = 350;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicEncoder {
    device_mode: DeviceMode,
}

impl ClassicEncoder {
    pub fn new(device_mode: DeviceMode) -> Self {
        Self { device_mode }
    }

    fn device(&self, switch_number: u8) -> Device {
        match self.device_mode {
            DeviceMode::Channel => Device::Channel(switch_number),
            DeviceMode::Binary => {
                Device::Binary(to_binary_digits(u32::from(switch_number), DEFAULT_WIDTH))
            }
        }
    }
}

impl ProtocolEncoder for ClassicEncoder {
    fn protocol(&self) -> Protocol {
        Protocol::Classic
    }

    fn pulse_length_us(&self) -> u32 {
        PULSE_LENGTH_US
    }

    fn payload(&self, command: &Command, on: bool) -> Result<Payload> {
        Ok(Payload::Named {
            protocol: Protocol::Classic,
            group: command.group.clone(),
            device: self.device(command.switch_number),
            on,
        })
    }
}
