//! Network Module
//!
//! TCP listener and client handling.
//!
//! ## Architecture
//! - Single thread accepts a connection, services it and closes it
//!   before accepting the next one
//! - Each connection carries exactly one request and one reply token
//! - Commands routed through the SwitchController

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;

use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::error::Result;
use crate::protocol::{read_reply, Reply};

/// Send one raw request to a daemon and wait for its reply
pub fn request(addr: &str, request: &[u8], timeout: Duration) -> Result<Reply> {
    let mut stream = TcpStream::connect(addr)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    stream.write_all(request)?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    read_reply(&mut stream)
}
