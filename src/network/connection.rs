//! Connection Handler
//!
//! Services a single client connection: one request, one reply.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;

use crate::controller::SwitchController;
use crate::error::{Result, SwitchError};
use crate::protocol::{read_request, write_reply};

/// Handles a single client connection
pub struct Connection {
    stream: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        Ok(Self { stream, peer_addr })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Read the request, run it and write the reply token
    ///
    /// Client-side disconnects and timeouts end the connection quietly;
    /// any other I/O failure is returned to the server.
    pub fn serve(&mut self, controller: &mut SwitchController) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let request = match read_request(&mut self.stream) {
            Ok(request) => request,
            Err(SwitchError::Io(ref e)) if is_client_gone(e.kind()) => {
                tracing::debug!("Client {} went away before sending: {}", self.peer_addr, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Message from {}: {:?}",
            self.peer_addr,
            String::from_utf8_lossy(&request).trim_end()
        );

        let reply = controller.handle(&request);

        match write_reply(&mut self.stream, &reply) {
            Ok(()) => {
                tracing::trace!("Replied {:?} to {}", reply, self.peer_addr);
                Ok(())
            }
            Err(SwitchError::Io(ref e)) if is_client_gone(e.kind()) => {
                tracing::debug!(
                    "Client {} disconnected before reply could be sent: {}",
                    self.peer_addr,
                    e
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_client_gone(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
