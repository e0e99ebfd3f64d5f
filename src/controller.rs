//! Controller Module
//!
//! Turns one request into one reply.
//!
//! ## Request Path
//! 1. Decode the request into a `Command`
//! 2. Apply the group character policy
//! 3. Map the command onto its address window
//! 4. On/Off: encode, transmit, record the new state, schedule any re-send
//! 5. Status: validate the command and read the recorded state

use crate::address::{self, Address};
use crate::config::Config;
use crate::encoder::{EncoderSet, ProtocolEncoder};
use crate::error::Result;
use crate::protocol::{decode_command, Command, Reply};
use crate::scheduler::{DeferredJob, DeferredScheduler};
use crate::state::StateStore;
use crate::transmit::TransmitLine;

/// Owns the state table and drives the transmitter
///
/// ## Concurrency Model
/// Requests are handled strictly one after another through `&mut self`,
/// so the state table needs no lock. Deferred jobs share only the
/// `TransmitLine`, which serializes transmissions.
pub struct SwitchController {
    config: Config,

    /// Last commanded state of every switch
    state: StateStore,

    /// Serialized transmitter handle
    line: TransmitLine,

    /// Encoders built from the transmitter settings
    encoders: EncoderSet,

    /// Present when deferred re-sends are enabled
    scheduler: Option<DeferredScheduler>,
}

impl SwitchController {
    /// Create a controller and claim the transmit pin
    pub fn new(config: Config, line: TransmitLine) -> Result<Self> {
        config.validate()?;
        line.enable(config.transmit_pin)?;

        let scheduler = config
            .deferred_enabled
            .then(|| DeferredScheduler::new(line.clone(), config.deferred_unit));

        Ok(Self {
            state: StateStore::new(config.state_capacity),
            encoders: EncoderSet::from_config(&config),
            config,
            line,
            scheduler,
        })
    }

    /// Handle one raw request and produce the reply
    ///
    /// Every command error becomes `Reply::Failure`; nothing here is fatal.
    pub fn handle(&mut self, request: &[u8]) -> Reply {
        let outcome = decode_command(request).and_then(|command| {
            tracing::debug!("Decoded {:?}", command);
            self.execute(&command)
        });

        match outcome {
            Ok(on) => Reply::State(on),
            Err(e) => {
                tracing::warn!(
                    "Rejected request {:?}: {}",
                    String::from_utf8_lossy(request).trim_end(),
                    e
                );
                Reply::Failure
            }
        }
    }

    /// Execute a decoded command, returning the switch state afterwards
    pub fn execute(&mut self, command: &Command) -> Result<bool> {
        address::validate_group(command, self.config.group_validation)?;
        let address = address::map(command)?;
        let action = command.action()?;
        let encoder = self.encoders.for_protocol(command.protocol);

        let Some(on) = action.target_state() else {
            encoder.validate(command)?;
            let on = self.state.get(address);
            tracing::debug!("Status of {} {}: {}", command.protocol, address, on);
            return Ok(on);
        };

        let transmission = encoder.encode(command, on)?;
        self.line.send(&transmission)?;
        self.state.set(address, on);
        tracing::info!(
            "Switched {} {}:{} (address {}) {}",
            command.protocol,
            command.group,
            command.switch_number,
            address,
            if on { "on" } else { "off" }
        );

        // The switch already changed, so a scheduling failure does not fail the request
        if let Some(minutes) = command.timeout_minutes.filter(|m| *m > 0) {
            if let Err(e) = self.schedule(address, minutes, command, on) {
                tracing::warn!("Could not schedule deferred job for {}: {}", address, e);
            }
        }

        Ok(on)
    }

    fn schedule(&self, address: Address, minutes: u16, command: &Command, on: bool) -> Result<()> {
        match &self.scheduler {
            Some(scheduler) => scheduler.schedule(
                address,
                minutes,
                DeferredJob {
                    command: command.clone(),
                    encoders: self.encoders,
                    on,
                },
            ),
            None => {
                tracing::debug!("Deferred actions disabled, ignoring timeout of {} min", minutes);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The state table
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// The deferred scheduler, if enabled
    pub fn scheduler(&self) -> Option<&DeferredScheduler> {
        self.scheduler.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
