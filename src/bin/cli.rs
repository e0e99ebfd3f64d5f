//! rf433 CLI
//!
//! One-shot sender and client for a running rf433d.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use rf433d::config::ZapTransmitMode;
use rf433d::network;
use rf433d::oneshot::{Batch, OneShot, SendMode};
use rf433d::protocol::{encode_command, Action, Command, Reply};
use rf433d::transmit::{DryRunTransmitter, TransmitLine};
use tracing_subscriber::{fmt, EnvFilter};

/// rf433 CLI
#[derive(Parser, Debug)]
#[command(name = "rf433-cli")]
#[command(about = "Send 433MHz switch commands directly or through rf433d")]
struct Args {
    /// Don't print any text, except for errors
    #[arg(short, long, global = true)]
    silent: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transmit directly: <systemCode> <unitCode> [<systemCode> <unitCode>...] <command>
    Send {
        /// How system and unit codes are interpreted
        #[arg(short, long, value_enum, default_value_t = ModeArg::Classic)]
        mode: ModeArg,

        /// Transmitter pin
        #[arg(short, long, default_value = "0")]
        pin: u8,

        /// Send Zap/REV codes as raw 24-bit numbers
        #[arg(long)]
        zap_numeric: bool,

        /// Control arguments
        #[arg(num_args = 3.., required = true)]
        args: Vec<String>,
    },

    /// Send a switch command to a running daemon
    Remote {
        /// Server address
        #[arg(short = 'a', long, default_value = "127.0.0.1:11337")]
        server: String,

        /// Protocol family
        #[arg(value_enum)]
        protocol: ProtocolArg,

        /// Group code (Classic, Zap/REV) or house code (Intertechno)
        group: String,

        /// Switch (Classic, Zap/REV) or unit (Intertechno)
        switch: u8,

        /// What to do
        #[arg(value_enum)]
        action: ActionArg,

        /// Re-send after this many minutes (Classic, Zap/REV)
        #[arg(short, long)]
        timeout: Option<u16>,
    },

    /// Send a raw request string to a running daemon
    Raw {
        /// Server address
        #[arg(short = 'a', long, default_value = "127.0.0.1:11337")]
        server: String,

        /// Request, e.g. 100001161
        request: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Classic,
    Binary,
    Intertechno,
    Zap,
    Decimal,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProtocolArg {
    Classic,
    Intertechno,
    Zap,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ActionArg {
    Off,
    On,
    Status,
}

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

fn main() {
    let args = Args::parse();

    let default_filter = if args.silent { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt().with_env_filter(filter).with_target(false).init();

    let outcome = match args.command {
        Commands::Send {
            mode,
            pin,
            zap_numeric,
            args,
        } => send(mode, pin, zap_numeric, &args),
        Commands::Remote {
            server,
            protocol,
            group,
            switch,
            action,
            timeout,
        } => {
            let action = match action {
                ActionArg::Off => Action::Off,
                ActionArg::On => Action::On,
                ActionArg::Status => Action::Status,
            };
            let command = match protocol {
                ProtocolArg::Classic => Command::classic(group, switch, action),
                ProtocolArg::Intertechno => match group.parse() {
                    Ok(house) => Command::intertechno(house, switch, action),
                    Err(_) => {
                        tracing::error!("house code {:?} is not a number", group);
                        std::process::exit(1);
                    }
                },
                ProtocolArg::Zap => Command::zap_rev(group, switch, action),
            };
            let command = match timeout {
                Some(minutes) => command.with_timeout(minutes),
                None => command,
            };
            encode_command(&command).and_then(|request| remote(&server, &request))
        }
        Commands::Raw { server, request } => remote(&server, request.as_bytes()),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn send(mode: ModeArg, pin: u8, zap_numeric: bool, args: &[String]) -> rf433d::Result<()> {
    let batch = Batch::parse(args)?;
    let mode = match mode {
        ModeArg::Classic => SendMode::Classic,
        ModeArg::Binary => SendMode::Binary,
        ModeArg::Intertechno => SendMode::Intertechno,
        ModeArg::Zap => SendMode::ZapRev,
        ModeArg::Decimal => SendMode::Decimal,
    };
    let zap_transmit = if zap_numeric {
        ZapTransmitMode::Numeric
    } else {
        ZapTransmitMode::Named
    };

    tracing::info!("using pin {}", pin);
    if batch.is_multi() {
        tracing::info!("multi mode");
    }

    let line = TransmitLine::new(DryRunTransmitter::new());
    line.enable(pin)?;

    let sent = OneShot::new(mode, zap_transmit).run(&batch, &line)?;
    tracing::info!("{} of {} transmissions sent", sent, batch.targets.len());
    Ok(())
}

fn remote(server: &str, request: &[u8]) -> rf433d::Result<()> {
    match network::request(server, request, REPLY_TIMEOUT)? {
        Reply::State(on) => println!("{}", if on { "on" } else { "off" }),
        Reply::Failure => {
            println!("failed");
            std::process::exit(2);
        }
    }
    Ok(())
}
