//! Intertechno type B encoder
//!
//! ## Code Word
//! ```text
//! ┌────────────┬───────────┬──────────┬────────────┐
//! │ House (4)  │ Unit (4)  │ "0F" (2) │ Action (2) │
//! └────────────┴───────────┴──────────┴────────────┘
//! ```
//! House and unit codes 1..=16 map to 4-symbol nibbles; the action is
//! `F0` for off and `FF` for on.

use super::ProtocolEncoder;
use crate::address::INTERTECHNO_CODES;
use crate::error::{Result, SwitchError};
use crate::protocol::{Command, Protocol};
use crate::transmit::Payload;

const PULSE_LENGTH_US: u32 = 300;

/// Tri-state nibble for each code, index = code - 1
pub const TRI_STATE_NIBBLES: [&str; 16] = [
    "0000", "F000", "0F00", "FF00", "00F0", "F0F0", "0FF0", "FFF0",
    "000F", "F00F", "0F0F", "FF0F", "00FF", "F0FF", "0FFF", "FFFF",
];

/// House codes A..P
const HOUSE_CODES: [&str; 16] = TRI_STATE_NIBBLES;

/// Unit codes 1..16
const UNIT_CODES: [&str; 16] = TRI_STATE_NIBBLES;

/// Fixed symbols between the unit nibble and the action
const MANDATORY_SYMBOLS: &str = "0F";

const ACTION_OFF: &str = "F0";
const ACTION_ON: &str = "FF";

#[derive(Debug, Clone, Copy, Default)]
pub struct IntertechnoEncoder;

/// Build the 12-symbol tri-state word
pub fn tri_state_code(house: u32, unit: u32, on: bool) -> Result<String> {
    let house_nibble = lookup(&HOUSE_CODES, house, "house")?;
    let unit_nibble = lookup(&UNIT_CODES, unit, "unit")?;

    let mut code = String::with_capacity(12);
    code.push_str(house_nibble);
    code.push_str(unit_nibble);
    code.push_str(MANDATORY_SYMBOLS);
    code.push_str(if on { ACTION_ON } else { ACTION_OFF });
    Ok(code)
}

fn lookup(table: &[&'static str; 16], code: u32, kind: &str) -> Result<&'static str> {
    if !INTERTECHNO_CODES.contains(&code) {
        return Err(SwitchError::UnsupportedCode(format!("{} code {}", kind, code)));
    }
    Ok(table[(code - 1) as usize])
}

impl ProtocolEncoder for IntertechnoEncoder {
    fn protocol(&self) -> Protocol {
        Protocol::Intertechno
    }

    fn pulse_length_us(&self) -> u32 {
        PULSE_LENGTH_US
    }

    fn payload(&self, command: &Command, on: bool) -> Result<Payload> {
        let code = tri_state_code(command.house_code(), u32::from(command.switch_number), on)?;
        tracing::debug!(
            "Intertechno house={} unit={} -> {}",
            command.house_code(),
            command.switch_number,
            code
        );
        Ok(Payload::TriState(code))
    }
}
