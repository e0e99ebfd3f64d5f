//! One-shot Module
//!
//! Socket-less sending of one or more switch commands, as used by the
//! `rf433-cli send` front-end.
//!
//! ## Argument Layout
//! ```text
//! <systemCode> <unitCode> [<systemCode> <unitCode> ...] <command>
//! ```
//! Every pair receives the same command (0 = off, 1 = on). In decimal mode
//! the pair is `<code> <pulseLength>` and the command is the driver
//! protocol id.

use crate::config::{DeviceMode, ZapTransmitMode};
use crate::encoder::{ClassicEncoder, EncoderSet, ZapRevEncoder, ZAP_CODE_BITS};
use crate::error::{Result, SwitchError};
use crate::protocol::{Action, Command};
use crate::transmit::{Payload, TransmitLine, Transmission};

/// How the system/unit codes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendMode {
    /// Classic group + decimal channel
    #[default]
    Classic,

    /// Classic group + channel given as binary digits
    Binary,

    /// Intertechno house + unit
    Intertechno,

    /// Zap/REV group + switch
    ZapRev,

    /// Raw numeric code + pulse length, command is the protocol id
    Decimal,
}

/// One system/unit code pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub system_code: String,
    pub unit_code: String,
}

/// Parsed control arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub targets: Vec<Target>,
    pub command: u8,
}

impl Batch {
    /// Parse `<systemCode> <unitCode> [...] <command>`
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < 3 || args.len() % 2 == 0 {
            return Err(SwitchError::IncompleteCommand(
                "use <systemCode> <unitCode> [<systemCode> <unitCode>...] <command>".to_string(),
            ));
        }

        let (pairs, command) = args.split_at(args.len() - 1);
        let command = command[0].as_ref();
        let command = command
            .parse::<u8>()
            .map_err(|_| SwitchError::IncompleteCommand(format!("command {:?} is not a number", command)))?;

        let targets = pairs
            .chunks_exact(2)
            .map(|pair| Target {
                system_code: pair[0].as_ref().to_string(),
                unit_code: pair[1].as_ref().to_string(),
            })
            .collect();

        Ok(Self { targets, command })
    }

    /// More than one target
    pub fn is_multi(&self) -> bool {
        self.targets.len() > 1
    }
}

/// Builds and sends transmissions for a batch
#[derive(Debug, Clone, Copy)]
pub struct OneShot {
    mode: SendMode,
    encoders: EncoderSet,
}

impl OneShot {
    pub fn new(mode: SendMode, zap_transmit: ZapTransmitMode) -> Self {
        let device_mode = match mode {
            SendMode::Binary => DeviceMode::Binary,
            _ => DeviceMode::Channel,
        };
        let encoders = EncoderSet {
            classic: ClassicEncoder::new(device_mode),
            zap_rev: ZapRevEncoder::new(zap_transmit),
            ..EncoderSet::default()
        };
        Self { mode, encoders }
    }

    pub fn mode(&self) -> SendMode {
        self.mode
    }

    /// Transmission for one target
    pub fn transmission(&self, target: &Target, command: u8) -> Result<Transmission> {
        let build: fn(&Target, Action) -> Result<Command> = match self.mode {
            SendMode::Decimal => return decimal_transmission(target, command),
            SendMode::Classic => classic_command,
            SendMode::Binary => binary_command,
            SendMode::Intertechno => intertechno_command,
            SendMode::ZapRev => zap_rev_command,
        };

        let action = Action::from_code(command)?;
        let on = action
            .target_state()
            .ok_or(SwitchError::UnsupportedAction(command))?;

        let switch_command = build(target, action)?;
        self.encoders.encode(&switch_command, on)
    }

    /// Send every target in the batch
    ///
    /// A single target's failure is returned; in multi mode failing targets
    /// are logged and skipped. Returns the number of transmissions sent.
    pub fn run(&self, batch: &Batch, line: &TransmitLine) -> Result<usize> {
        let mut sent = 0;
        for target in &batch.targets {
            let outcome = self
                .transmission(target, batch.command)
                .and_then(|transmission| line.send(&transmission));

            match outcome {
                Ok(()) => {
                    tracing::info!(
                        "Sent {:?} systemCode[{}] unitCode[{}] command[{}]",
                        self.mode,
                        target.system_code,
                        target.unit_code,
                        batch.command
                    );
                    sent += 1;
                }
                Err(e) if batch.is_multi() && e.is_command_error() => {
                    tracing::warn!(
                        "Skipping systemCode[{}] unitCode[{}]: {}",
                        target.system_code,
                        target.unit_code,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(sent)
    }
}

fn decimal_transmission(target: &Target, protocol_id: u8) -> Result<Transmission> {
    Ok(Transmission {
        protocol_id,
        pulse_length_us: parse_number(&target.unit_code, "pulse length")?,
        payload: Payload::Numeric {
            code: parse_number(&target.system_code, "code")?,
            bit_length: ZAP_CODE_BITS,
        },
    })
}

fn classic_command(target: &Target, action: Action) -> Result<Command> {
    let channel = parse_number(&target.unit_code, "unit code")?;
    Ok(Command::classic(target.system_code.as_str(), channel, action))
}

fn binary_command(target: &Target, action: Action) -> Result<Command> {
    let channel = parse_binary(&target.unit_code)?;
    Ok(Command::classic(target.system_code.as_str(), channel, action))
}

fn intertechno_command(target: &Target, action: Action) -> Result<Command> {
    let house = parse_number(&target.system_code, "house code")?;
    let unit = parse_number(&target.unit_code, "unit code")?;
    Ok(Command::intertechno(house, unit, action))
}

fn zap_rev_command(target: &Target, action: Action) -> Result<Command> {
    let switch_number = parse_number(&target.unit_code, "switch")?;
    Ok(Command::zap_rev(target.system_code.as_str(), switch_number, action))
}

fn parse_number<T: std::str::FromStr>(text: &str, field: &str) -> Result<T> {
    text.parse()
        .map_err(|_| SwitchError::UnsupportedCode(format!("{} {:?}", field, text)))
}

fn parse_binary(text: &str) -> Result<u8> {
    u8::from_str_radix(text, 2)
        .map_err(|_| SwitchError::UnsupportedCode(format!("binary unit code {:?}", text)))
}
