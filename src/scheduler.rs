//! Scheduler Module
//!
//! Deferred re-sends for commands that carry a timeout.
//!
//! ## Model
//! - Each scheduled job runs on its own detached thread and is never joined
//! - The job captures the command and encoders by value; it re-encodes and
//!   re-transmits but never touches the state table
//! - At most one job is pending per address: scheduling again, or calling
//!   `cancel`, signals the earlier job's cancel channel

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::address::Address;
use crate::encoder::EncoderSet;
use crate::error::Result;
use crate::protocol::Command;
use crate::transmit::TransmitLine;

/// A re-send captured at scheduling time
#[derive(Debug, Clone)]
pub struct DeferredJob {
    pub command: Command,
    pub encoders: EncoderSet,
    pub on: bool,
}

impl DeferredJob {
    /// Encode and transmit the captured command
    pub fn run(&self, line: &TransmitLine) -> Result<()> {
        let transmission = self.encoders.encode(&self.command, self.on)?;
        line.send(&transmission)
    }
}

/// Runs deferred jobs, one pending job per address
pub struct DeferredScheduler {
    line: TransmitLine,

    /// Length of one timeout unit
    unit: Duration,

    /// Cancel channel of the pending job for each address
    pending: Arc<Mutex<HashMap<Address, Sender<()>>>>,
}

impl DeferredScheduler {
    pub fn new(line: TransmitLine, unit: Duration) -> Self {
        Self {
            line,
            unit,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `job` after `units` timeout units
    ///
    /// Replaces any job still pending for `address`.
    pub fn schedule(&self, address: Address, units: u16, job: DeferredJob) -> Result<()> {
        let delay = self.unit.saturating_mul(u32::from(units));
        let (cancel_tx, cancel_rx) = channel::bounded::<()>(1);

        if let Some(previous) = self.pending.lock().insert(address, cancel_tx.clone()) {
            tracing::debug!("Replacing pending deferred job for address {}", address);
            let _ = previous.try_send(());
        }

        let line = self.line.clone();
        let registry = Arc::clone(&self.pending);
        let registered = cancel_tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("deferred-{}", address))
            .spawn(move || {
                match cancel_rx.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => {
                        tracing::debug!("Deferred job for address {} cancelled", address);
                        return;
                    }
                }

                // Only fire if this job is still the registered one
                if !release(&mut registry.lock(), address, &cancel_tx) {
                    return;
                }

                tracing::info!(
                    "Deferred {} for address {} after {:?}",
                    if job.on { "on" } else { "off" },
                    address,
                    delay
                );
                if let Err(e) = job.run(&line) {
                    tracing::warn!("Deferred job for address {} failed: {}", address, e);
                }
            });

        if let Err(e) = spawned {
            release(&mut self.pending.lock(), address, &registered);
            return Err(e.into());
        }

        tracing::debug!("Scheduled deferred job for address {} in {:?}", address, delay);
        Ok(())
    }

    /// Cancel the pending job for `address`
    ///
    /// Returns whether a job was pending.
    pub fn cancel(&self, address: Address) -> bool {
        match self.pending.lock().remove(&address) {
            Some(cancel) => {
                let _ = cancel.try_send(());
                true
            }
            None => false,
        }
    }

    /// Number of jobs that have not fired or been cancelled
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

/// Drop the entry for `address` if it still belongs to `cancel`
fn release(
    pending: &mut HashMap<Address, Sender<()>>,
    address: Address,
    cancel: &Sender<()>,
) -> bool {
    match pending.get(&address) {
        Some(current) if current.same_channel(cancel) => {
            pending.remove(&address);
            true
        }
        _ => false,
    }
}
