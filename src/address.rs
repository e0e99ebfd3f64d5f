//! Address Module
//!
//! Maps commands onto the shared state table.
//!
//! ## Address Space
//! ```text
//!     0 ..= 1023   Classic      (group mask << 5 | channel)
//!  1024 ..= 1279   Intertechno  ((house-1) * 16 + (unit-1) + 1024)
//!  2048 ..= 3071   Zap/REV      (classic formula + 2048)
//! ```
//! The ranges never overlap, so a single table tracks every protocol.

use std::fmt;
use std::ops::RangeInclusive;

use crate::config::GroupValidation;
use crate::error::{Result, SwitchError};
use crate::protocol::{leading_number, Command, Protocol};

/// Classic address window
pub const CLASSIC_RANGE: RangeInclusive<u16> = 0..=1023;

/// Intertechno address window
pub const INTERTECHNO_RANGE: RangeInclusive<u16> = 1024..=1279;

/// Zap/REV address window
pub const ZAP_REV_RANGE: RangeInclusive<u16> = 2048..=3071;

/// Smallest state table holding every address window
pub const MIN_STATE_CAPACITY: usize = 3072;

/// Valid Intertechno house and unit codes
pub const INTERTECHNO_CODES: RangeInclusive<u32> = 1..=16;

const INTERTECHNO_BASE: u32 = 1024;
const ZAP_REV_OFFSET: u16 = 2048;
const GROUP_DIGITS: usize = 5;

/// Index of one switch slot in the state table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(u16);

impl Address {
    /// Slot index
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a command onto its protocol's address window
pub fn map(command: &Command) -> Result<Address> {
    match command.protocol {
        Protocol::Classic => classic_address(&command.group, command.switch_number),
        Protocol::Intertechno => intertechno_address(command.house_code(), command.switch_number),
        Protocol::ZapRev => zap_rev_address(&command.group, command.switch_number),
    }
}

/// Classic address: 5-bit group mask above a 5-bit channel
///
/// The group is read as a decimal number and each of its five lowest
/// decimal digits that equals 1 sets the matching mask bit.
pub fn classic_address(group: &str, switch_number: u8) -> Result<Address> {
    let mut remaining = leading_number(group);
    let mut mask = 0u16;
    for bit in 0..GROUP_DIGITS {
        if remaining % 10 == 1 {
            mask |= 1 << bit;
        }
        remaining /= 10;
    }

    let address = (mask << 5) | (u16::from(switch_number) & 0x1F);
    if !CLASSIC_RANGE.contains(&address) {
        return Err(SwitchError::OutOfRange(format!(
            "classic address {} for {}:{}",
            address, group, switch_number
        )));
    }
    Ok(Address(address))
}

/// Intertechno address: one slot per house/unit pair
pub fn intertechno_address(house: u32, unit: u8) -> Result<Address> {
    let unit = u32::from(unit);
    if !INTERTECHNO_CODES.contains(&house) {
        return Err(SwitchError::UnsupportedCode(format!("house code {}", house)));
    }
    if !INTERTECHNO_CODES.contains(&unit) {
        return Err(SwitchError::UnsupportedCode(format!("unit code {}", unit)));
    }

    // Both codes are at most 16, so the result fits in u16
    let address = ((house - 1) * 16 + (unit - 1) + INTERTECHNO_BASE) as u16;
    Ok(Address(address))
}

/// Zap/REV address: the Classic formula shifted past the other windows
pub fn zap_rev_address(group: &str, switch_number: u8) -> Result<Address> {
    let classic = classic_address(group, switch_number)?;
    Ok(Address(classic.0 + ZAP_REV_OFFSET))
}

/// Apply the group character policy to a command
///
/// Intertechno house codes are digits checked by the parser, so only the
/// 5-character groups are inspected.
pub fn validate_group(command: &Command, policy: GroupValidation) -> Result<()> {
    if policy == GroupValidation::Legacy || command.protocol == Protocol::Intertechno {
        return Ok(());
    }

    let allowed = |ch: char| match command.protocol {
        Protocol::ZapRev => matches!(ch, '0' | '1' | 'F'),
        _ => matches!(ch, '0' | '1'),
    };

    if command.group.chars().count() != GROUP_DIGITS || !command.group.chars().all(allowed) {
        return Err(SwitchError::MalformedGroup(command.group.clone()));
    }
    Ok(())
}
