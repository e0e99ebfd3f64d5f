//! Configuration for rf433d
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::address::MIN_STATE_CAPACITY;
use crate::error::{Result, SwitchError};

/// Main configuration for an rf433d instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Transmitter Configuration
    // -------------------------------------------------------------------------
    /// Pin handed to the driver's `enable_transmit`
    pub transmit_pin: u8,

    /// How Classic devices are addressed on the named call
    pub classic_device: DeviceMode,

    /// Which Zap/REV transmit path carries normal traffic
    pub zap_transmit: ZapTransmitMode,

    // -------------------------------------------------------------------------
    // Command Configuration
    // -------------------------------------------------------------------------
    /// Acceptance policy for group characters
    pub group_validation: GroupValidation,

    /// Number of slots in the state table (at least 3072)
    pub state_capacity: usize,

    // -------------------------------------------------------------------------
    // Deferred Action Configuration
    // -------------------------------------------------------------------------
    /// Schedule re-sends for commands carrying a timeout
    pub deferred_enabled: bool,

    /// Length of one timeout unit (a minute in production)
    pub deferred_unit: Duration,
}

/// Device argument form for the Classic named call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceMode {
    /// Raw channel number
    #[default]
    Channel,

    /// Channel as a 5-digit binary string
    Binary,
}

/// Zap/REV transmit path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZapTransmitMode {
    /// Named group/switch on/off call
    #[default]
    Named,

    /// Raw 24-bit numeric send of the computed code
    Numeric,
}

/// Group character acceptance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupValidation {
    /// Any character accepted; everything but '1' counts as open
    #[default]
    Legacy,

    /// Only '0'/'1' accepted ('F' additionally for Zap/REV)
    Strict,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:11337".to_string(),
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            transmit_pin: 0,
            classic_device: DeviceMode::Channel,
            zap_transmit: ZapTransmitMode::Named,
            group_validation: GroupValidation::Legacy,
            state_capacity: 3328,
            deferred_enabled: true,
            deferred_unit: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check settings that would break address partitioning
    pub fn validate(&self) -> Result<()> {
        if self.state_capacity < MIN_STATE_CAPACITY {
            return Err(SwitchError::Config(format!(
                "state capacity {} is below the {} slots the address ranges need",
                self.state_capacity, MIN_STATE_CAPACITY
            )));
        }
        if self.listen_addr.is_empty() {
            return Err(SwitchError::Config("listen address is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the transmitter pin
    pub fn transmit_pin(mut self, pin: u8) -> Self {
        self.config.transmit_pin = pin;
        self
    }

    /// Set the Classic device argument form
    pub fn classic_device(mut self, mode: DeviceMode) -> Self {
        self.config.classic_device = mode;
        self
    }

    /// Set the Zap/REV transmit path
    pub fn zap_transmit(mut self, mode: ZapTransmitMode) -> Self {
        self.config.zap_transmit = mode;
        self
    }

    /// Set the group character policy
    pub fn group_validation(mut self, policy: GroupValidation) -> Self {
        self.config.group_validation = policy;
        self
    }

    /// Set the number of state table slots
    pub fn state_capacity(mut self, slots: usize) -> Self {
        self.config.state_capacity = slots;
        self
    }

    /// Enable or disable deferred re-sends
    pub fn deferred_enabled(mut self, enabled: bool) -> Self {
        self.config.deferred_enabled = enabled;
        self
    }

    /// Set the duration of one timeout unit
    pub fn deferred_unit(mut self, unit: Duration) -> Self {
        self.config.deferred_unit = unit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
