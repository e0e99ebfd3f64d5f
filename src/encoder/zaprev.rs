//! Zap/REV encoder
//!
//! ## 24-bit Code
//! ```text
//!            Group (F=open)      | Switch 5..1         | On=01 Off=10
//! tri-state  0   0   F   F   F   | 1   F   F   0   0   | 1   0
//! binary     00  00  01  01  01  | 11  01  01  00  00  | 00  11
//! ```
//! Each group position contributes two bits: `00` when closed ('1'),
//! `01` when open. The selected switch gets `11` in its 2-bit slot of the
//! 14-bit switch field, the other slots come from the action template.

use std::ops::RangeInclusive;

use super::ProtocolEncoder;
use crate::config::ZapTransmitMode;
use crate::error::{Result, SwitchError};
use crate::protocol::{Command, Protocol};
use crate::transmit::{Device, Payload};

const PULSE_LENGTH_US: u32 = 188;

/// Valid transmit codes
pub const ZAP_CODE_RANGE: RangeInclusive<u64> = 5424..=5600524;

/// Length of a numeric Zap/REV send
pub const ZAP_CODE_BITS: u8 = 24;

const GROUP_POSITIONS: usize = 5;
const SWITCH_FIELD_BITS: u32 = 14;
const TEMPLATE_OFF: u64 = 0b01010100001100;
const TEMPLATE_ON: u64 = 0b01010100000011;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZapRevEncoder {
    mode: ZapTransmitMode,
}

impl ZapRevEncoder {
    pub fn new(mode: ZapTransmitMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ZapTransmitMode {
        self.mode
    }
}

fn is_closed(ch: char) -> bool {
    ch == '1'
}

/// Compute the 24-bit code for a group, switch and action
pub fn zap_code(group: &str, switch_number: u8, on: bool) -> Result<u64> {
    let group_value = group
        .chars()
        .take(GROUP_POSITIONS)
        .fold(0u64, |value, ch| {
            if is_closed(ch) {
                value << 2
            } else {
                (value << 2) | 1
            }
        });

    let out_of_range = || {
        SwitchError::OutOfRange(format!("zap code for {}:{}", group, switch_number))
    };

    let shift = 2 * (u32::from(switch_number) + 1);
    let template = if on { TEMPLATE_ON } else { TEMPLATE_OFF };
    let switch_field = 0b11u64.checked_shl(shift).ok_or_else(out_of_range)? | template;

    let code = (group_value << SWITCH_FIELD_BITS) | switch_field;
    if !ZAP_CODE_RANGE.contains(&code) {
        return Err(out_of_range());
    }
    Ok(code)
}

impl ProtocolEncoder for ZapRevEncoder {
    fn protocol(&self) -> Protocol {
        Protocol::ZapRev
    }

    fn pulse_length_us(&self) -> u32 {
        PULSE_LENGTH_US
    }

    fn payload(&self, command: &Command, on: bool) -> Result<Payload> {
        let code = zap_code(&command.group, command.switch_number, on)?;
        tracing::debug!(
            "Zap/REV group={} switch={} -> {}",
            command.group,
            command.switch_number,
            code
        );

        Ok(match self.mode {
            ZapTransmitMode::Named => Payload::Named {
                protocol: Protocol::ZapRev,
                group: command.group.clone(),
                device: Device::Channel(command.switch_number),
                on,
            },
            ZapTransmitMode::Numeric => Payload::Numeric {
                code,
                bit_length: ZAP_CODE_BITS,
            },
        })
    }
}
