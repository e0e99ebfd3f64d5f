//! Protocol Module
//!
//! Defines the ASCII request grammar and reply tokens.
//!
//! ## Request Format
//! One command per connection, positional and delimiter-free. The first
//! digit selects the protocol family:
//! - `1`: Classic     - group (5) + switch (2) + action (1) + timeout (0..=3)
//! - `2`: Intertechno - house (2) + unit (2) + action (1)
//! - `3`: Zap/REV     - group (5) + switch (2) + action (1) + timeout (0..=3)
//!
//! ### Actions
//! - 0: OFF
//! - 1: ON
//! - 2: STATUS
//!
//! ## Reply Tokens
//! - `0`: switch is off
//! - `1`: switch is on
//! - `2`: request failed

mod command;
mod response;
mod codec;

pub use command::{Action, Command, Protocol};
pub(crate) use command::leading_number;
pub use response::{Reply, TOKEN_FAILURE, TOKEN_OFF, TOKEN_ON};
pub use codec::{
    decode_command, encode_command, read_reply, read_request, write_command, write_reply,
    MAX_REQUEST_LEN, MIN_REQUEST_LEN,
};
