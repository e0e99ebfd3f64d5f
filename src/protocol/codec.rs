//! Protocol codec
//!
//! Decoding and encoding of the positional ASCII request grammar.
//!
//! ## Wire Format
//!
//! ### Classic / Zap/REV
//! ```text
//! ┌───────────┬───────────┬────────────┬────────────┬──────────────────┐
//! │ Proto (1) │ Group (5) │ Switch (2) │ Action (1) │ Timeout (0..=3)  │
//! └───────────┴───────────┴────────────┴────────────┴──────────────────┘
//! ```
//!
//! ### Intertechno
//! ```text
//! ┌───────────┬───────────┬──────────┬────────────┐
//! │ Proto (1) │ House (2) │ Unit (2) │ Action (1) │
//! └───────────┴───────────┴──────────┴────────────┘
//! ```
//!
//! ### Reply
//! A single ASCII byte: `0`/`1` for the switch state, `2` on failure.

use std::io::{Read, Write};

use bytes::{Bytes, BytesMut};

use super::{Command, Protocol, Reply};
use crate::error::{Result, SwitchError};

/// Shortest request that can carry any grammar
pub const MIN_REQUEST_LEN: usize = 5;

/// Largest request read from a connection
pub const MAX_REQUEST_LEN: usize = 255;

/// Length of the Classic/Zap/REV grammar without timeout
const GROUP_COMMAND_LEN: usize = 9;

/// Length of the Intertechno grammar
const INTERTECHNO_COMMAND_LEN: usize = 6;

/// Maximum number of timeout digits
const MAX_TIMEOUT_DIGITS: usize = 3;

/// Largest timeout that fits the timeout digits
const MAX_TIMEOUT_MINUTES: u16 = 999;

/// Width of the Classic/Zap/REV group field
const GROUP_LEN: usize = 5;

const MAX_ACTION_CODE: u8 = 9;

// =============================================================================
// Command Decoding/Encoding
// =============================================================================

/// Decode a request into a command
///
/// Trailing whitespace and NUL bytes are ignored so `echo … | nc` works.
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let bytes = trim_request(bytes);

    if bytes.len() < MIN_REQUEST_LEN {
        return Err(SwitchError::IncompleteCommand(format!(
            "expected at least {} bytes, got {}",
            MIN_REQUEST_LEN,
            bytes.len()
        )));
    }

    match Protocol::from_byte(bytes[0])? {
        protocol @ (Protocol::Classic | Protocol::ZapRev) => decode_group_command(protocol, bytes),
        Protocol::Intertechno => decode_intertechno_command(bytes),
    }
}

/// Decode the Classic / Zap/REV grammar
fn decode_group_command(protocol: Protocol, bytes: &[u8]) -> Result<Command> {
    if bytes.len() < GROUP_COMMAND_LEN {
        return Err(SwitchError::IncompleteCommand(format!(
            "{} command: expected {} bytes, got {}",
            protocol,
            GROUP_COMMAND_LEN,
            bytes.len()
        )));
    }

    // Group characters are kept verbatim
    let group = String::from_utf8_lossy(&bytes[1..6]).into_owned();
    let switch_number = two_digits(bytes, 6, "switch number")?;
    let action_code = digit(bytes, 8, "action")?;

    let timeout_end = bytes.len().min(GROUP_COMMAND_LEN + MAX_TIMEOUT_DIGITS);
    let timeout_minutes = if bytes.len() > GROUP_COMMAND_LEN {
        let mut minutes = 0u16;
        for position in GROUP_COMMAND_LEN..timeout_end {
            minutes = minutes * 10 + u16::from(digit(bytes, position, "timeout")?);
        }
        Some(minutes)
    } else {
        None
    };

    Ok(Command {
        protocol,
        group,
        switch_number,
        action_code,
        timeout_minutes,
    })
}

/// Decode the Intertechno grammar
fn decode_intertechno_command(bytes: &[u8]) -> Result<Command> {
    if bytes.len() < INTERTECHNO_COMMAND_LEN {
        return Err(SwitchError::IncompleteCommand(format!(
            "intertechno command: expected {} bytes, got {}",
            INTERTECHNO_COMMAND_LEN,
            bytes.len()
        )));
    }

    let house = two_digits(bytes, 1, "house code")?;
    let unit = two_digits(bytes, 3, "unit code")?;
    let action_code = digit(bytes, 5, "action")?;

    Ok(Command {
        protocol: Protocol::Intertechno,
        group: format!("{:02}", house),
        switch_number: unit,
        action_code,
        timeout_minutes: None,
    })
}

/// Encode a command into the request grammar
///
/// Fields that would not fit their fixed width are rejected, since the
/// decoder would read a shifted or truncated command back.
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    if command.action_code > MAX_ACTION_CODE {
        return Err(SwitchError::OutOfRange(format!(
            "action code {} does not fit one digit",
            command.action_code
        )));
    }

    let mut request = Vec::with_capacity(GROUP_COMMAND_LEN + MAX_TIMEOUT_DIGITS);
    request.push(command.protocol.as_byte());

    match command.protocol {
        Protocol::Classic | Protocol::ZapRev => {
            if command.group.len() != GROUP_LEN {
                return Err(SwitchError::IncompleteCommand(format!(
                    "{} group {:?}: expected {} characters",
                    command.protocol, command.group, GROUP_LEN
                )));
            }
            request.extend_from_slice(command.group.as_bytes());
            push_two_digits(&mut request, u32::from(command.switch_number), "switch number")?;
            request.push(b'0' + command.action_code);
            if let Some(minutes) = command.timeout_minutes {
                if minutes > MAX_TIMEOUT_MINUTES {
                    return Err(SwitchError::OutOfRange(format!(
                        "timeout {} exceeds {} minutes",
                        minutes, MAX_TIMEOUT_MINUTES
                    )));
                }
                request.extend_from_slice(minutes.to_string().as_bytes());
            }
        }
        Protocol::Intertechno => {
            push_two_digits(&mut request, command.house_code(), "house code")?;
            push_two_digits(&mut request, u32::from(command.switch_number), "unit code")?;
            request.push(b'0' + command.action_code);
        }
    }

    Ok(request)
}

fn push_two_digits(request: &mut Vec<u8>, value: u32, field: &str) -> Result<()> {
    if value > 99 {
        return Err(SwitchError::OutOfRange(format!(
            "{} {} does not fit two digits",
            field, value
        )));
    }
    request.extend_from_slice(format!("{:02}", value).as_bytes());
    Ok(())
}

fn trim_request(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace() && *b != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

fn digit(bytes: &[u8], position: usize, field: &str) -> Result<u8> {
    match bytes.get(position) {
        Some(b) if b.is_ascii_digit() => Ok(b - b'0'),
        Some(b) => Err(SwitchError::IncompleteCommand(format!(
            "{}: expected digit at {}, got {:?}",
            field, position, *b as char
        ))),
        None => Err(SwitchError::IncompleteCommand(format!(
            "{}: missing digit at {}",
            field, position
        ))),
    }
}

fn two_digits(bytes: &[u8], position: usize, field: &str) -> Result<u8> {
    Ok(digit(bytes, position, field)? * 10 + digit(bytes, position + 1, field)?)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one request from a stream
///
/// Performs a single read of at most `MAX_REQUEST_LEN` bytes; the request
/// grammar has no framing, so whatever arrives first is the request.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Bytes> {
    let mut buffer = BytesMut::zeroed(MAX_REQUEST_LEN);
    let read = reader.read(&mut buffer)?;
    buffer.truncate(read);
    Ok(buffer.freeze())
}

/// Write a reply token to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    writer.write_all(&[reply.token()])?;
    writer.flush()?;
    Ok(())
}

/// Read a reply token from a stream
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let mut token = [0u8; 1];
    reader.read_exact(&mut token)?;
    Reply::from_token(token[0])
}

/// Write a command request to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command)?)?;
    writer.flush()?;
    Ok(())
}
