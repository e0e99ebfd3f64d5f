//! rf433d Server Binary
//!
//! Starts the TCP switch daemon.

use clap::{Parser, ValueEnum};
use rf433d::config::{DeviceMode, GroupValidation, ZapTransmitMode};
use rf433d::network::Server;
use rf433d::transmit::{DryRunTransmitter, TransmitLine};
use rf433d::{Config, SwitchController};
use tracing_subscriber::{fmt, EnvFilter};

/// rf433d Server
#[derive(Parser, Debug)]
#[command(name = "rf433d")]
#[command(about = "433MHz remote power switch daemon")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:11337")]
    listen: String,

    /// Transmitter pin
    #[arg(short, long, default_value = "0")]
    pin: u8,

    /// Reject group codes containing anything but 0/1 (F for Zap/REV)
    #[arg(long)]
    strict_groups: bool,

    /// Send Classic channels as 5-digit binary strings
    #[arg(long)]
    binary_devices: bool,

    /// Zap/REV transmit path
    #[arg(long, value_enum, default_value_t = ZapPath::Named)]
    zap: ZapPath,

    /// Ignore timeout fields instead of scheduling re-sends
    #[arg(long)]
    no_deferred: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ZapPath {
    Named,
    Numeric,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rf433d=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("rf433d v{}", rf433d::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .transmit_pin(args.pin)
        .group_validation(if args.strict_groups {
            GroupValidation::Strict
        } else {
            GroupValidation::Legacy
        })
        .classic_device(if args.binary_devices {
            DeviceMode::Binary
        } else {
            DeviceMode::Channel
        })
        .zap_transmit(match args.zap {
            ZapPath::Named => ZapTransmitMode::Named,
            ZapPath::Numeric => ZapTransmitMode::Numeric,
        })
        .deferred_enabled(!args.no_deferred)
        .build();

    let line = TransmitLine::new(DryRunTransmitter::new());
    let controller = match SwitchController::new(config.clone(), line) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Failed to initialize controller: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = match Server::bind(config, controller) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.trigger();
    }) {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
