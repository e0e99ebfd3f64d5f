//! Reply definitions
//!
//! Represents replies to clients.

use crate::error::{Result, SwitchError};

/// Wire token for a switch that is off
pub const TOKEN_OFF: u8 = b'0';

/// Wire token for a switch that is on
pub const TOKEN_ON: u8 = b'1';

/// Wire token for any failed request
pub const TOKEN_FAILURE: u8 = b'2';

/// A reply to send to a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Command succeeded; carries the switch state afterwards
    State(bool),

    /// Parse, range or unsupported-code failure
    Failure,
}

impl Reply {
    /// Single-byte wire token
    pub fn token(&self) -> u8 {
        match self {
            Reply::State(false) => TOKEN_OFF,
            Reply::State(true) => TOKEN_ON,
            Reply::Failure => TOKEN_FAILURE,
        }
    }

    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::State(_))
    }

    /// Switch state carried by a successful reply
    pub fn state(&self) -> Option<bool> {
        match self {
            Reply::State(on) => Some(*on),
            Reply::Failure => None,
        }
    }

    /// Interpret a wire token
    pub fn from_token(token: u8) -> Result<Self> {
        match token {
            TOKEN_OFF => Ok(Reply::State(false)),
            TOKEN_ON => Ok(Reply::State(true)),
            TOKEN_FAILURE => Ok(Reply::Failure),
            other => Err(SwitchError::Network(format!(
                "unknown reply token: 0x{:02x}",
                other
            ))),
        }
    }
}
