//! TCP Server
//!
//! Accepts connections and services them one at a time.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::Connection;
use crate::config::Config;
use crate::controller::SwitchController;
use crate::error::{Result, SwitchError};

/// How long a shutdown wake-up connection may take
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// TCP server for rf433d
pub struct Server {
    config: Config,
    controller: SwitchController,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
}

/// Stops a running server from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Ask the server to stop after the current connection
    ///
    /// Opens a throwaway connection so a blocked accept returns.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, WAKE_TIMEOUT) {
            tracing::debug!("Shutdown wake-up connection failed: {}", e);
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Bind the listen address
    ///
    /// A bind failure means the host environment is unusable and is fatal
    /// to the caller.
    pub fn bind(config: Config, controller: SwitchController) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            SwitchError::Network(format!("bind {} failed: {}", config.listen_addr, e))
        })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            controller,
            listener,
            local_addr,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle for stopping the accept loop
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        let mut wake_addr = self.local_addr;
        if wake_addr.ip().is_unspecified() {
            let loopback: IpAddr = match wake_addr {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            };
            wake_addr.set_ip(loopback);
        }
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr,
        }
    }

    /// Accept and service connections until shut down (blocking)
    ///
    /// Accept and stream failures are returned; command failures were
    /// already answered on their connection.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr);

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, closing listener");
                break;
            }

            let stream =
                stream.map_err(|e| SwitchError::Network(format!("accept failed: {}", e)))?;

            let mut connection = match Connection::new(stream) {
                Ok(connection) => connection,
                Err(e) => {
                    tracing::warn!("Dropping connection: {}", e);
                    continue;
                }
            };
            connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;
            connection.serve(&mut self.controller)?;
        }

        Ok(())
    }

    /// The controller serving requests
    pub fn controller(&self) -> &SwitchController {
        &self.controller
    }
}
