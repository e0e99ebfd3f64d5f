//! Command definitions
//!
//! Represents switch commands from clients.

use std::fmt;

use crate::error::{Result, SwitchError};

/// Protocol families, keyed by the first request digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol {
    /// Elro-style DIP switch sockets
    Classic = 1,
    /// Intertechno type B (house/unit)
    Intertechno = 2,
    /// Zap/REV sockets
    ZapRev = 3,
}

impl Protocol {
    /// Resolve the protocol from its wire byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            b'1' => Ok(Protocol::Classic),
            b'2' => Ok(Protocol::Intertechno),
            b'3' => Ok(Protocol::ZapRev),
            other => Err(SwitchError::UnknownProtocol(other as char)),
        }
    }

    /// Wire byte of this protocol
    pub fn as_byte(self) -> u8 {
        b'0' + self as u8
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Classic => f.write_str("classic"),
            Protocol::Intertechno => f.write_str("intertechno"),
            Protocol::ZapRev => f.write_str("zap/rev"),
        }
    }
}

/// Switch actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Action {
    Off = 0,
    On = 1,
    Status = 2,
}

impl Action {
    /// Interpret a raw action digit
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Action::Off),
            1 => Ok(Action::On),
            2 => Ok(Action::Status),
            other => Err(SwitchError::UnsupportedAction(other)),
        }
    }

    /// Target state for On/Off, `None` for Status
    pub fn target_state(self) -> Option<bool> {
        match self {
            Action::Off => Some(false),
            Action::On => Some(true),
            Action::Status => None,
        }
    }
}

/// A parsed command
///
/// Numeric fields carry whatever the request contained; domain checks
/// happen during address mapping and encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Protocol family
    pub protocol: Protocol,

    /// 5-char group code (Classic, Zap/REV) or 2-digit house code (Intertechno)
    pub group: String,

    /// Channel (Classic, Zap/REV) or unit (Intertechno)
    pub switch_number: u8,

    /// Raw action digit
    pub action_code: u8,

    /// Deferred re-send delay in minutes (Classic, Zap/REV only)
    pub timeout_minutes: Option<u16>,
}

impl Command {
    /// Build a Classic command
    pub fn classic(group: impl Into<String>, switch_number: u8, action: Action) -> Self {
        Self::with_protocol(Protocol::Classic, group.into(), switch_number, action)
    }

    /// Build an Intertechno command
    pub fn intertechno(house: u8, unit: u8, action: Action) -> Self {
        Self::with_protocol(Protocol::Intertechno, format!("{:02}", house), unit, action)
    }

    /// Build a Zap/REV command
    pub fn zap_rev(group: impl Into<String>, switch_number: u8, action: Action) -> Self {
        Self::with_protocol(Protocol::ZapRev, group.into(), switch_number, action)
    }

    fn with_protocol(protocol: Protocol, group: String, switch_number: u8, action: Action) -> Self {
        Self {
            protocol,
            group,
            switch_number,
            action_code: action as u8,
            timeout_minutes: None,
        }
    }

    /// Attach a deferred re-send delay
    pub fn with_timeout(mut self, minutes: u16) -> Self {
        self.timeout_minutes = Some(minutes);
        self
    }

    /// Interpret the action digit
    pub fn action(&self) -> Result<Action> {
        Action::from_code(self.action_code)
    }

    /// Intertechno house code as a number (leading digits of the group)
    pub fn house_code(&self) -> u32 {
        leading_number(&self.group)
    }
}

/// Parse the leading decimal digits of `text`, 0 if there are none
pub(crate) fn leading_number(text: &str) -> u32 {
    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}
