//! # rf433d
//!
//! A daemon for 433MHz remote-controlled power switches with:
//! - A positional ASCII command protocol over TCP
//! - Classic (Elro), Intertechno type B and Zap/REV encoders
//! - A shared on/off state table with disjoint per-protocol address windows
//! - Deferred re-sends for commands carrying a timeout
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one connection at a time)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Switch Controller                            │
//! │        decode → address → encode → transmit → state          │
//! └──────┬──────────────┬───────────────┬───────────────────────┘
//!        │              │               │
//!        ▼              ▼               ▼
//!   ┌─────────┐   ┌───────────┐   ┌─────────────┐
//!   │ Address │   │  Encoders │   │ State Store │
//!   │ Mapper  │   └─────┬─────┘   └─────────────┘
//!   └─────────┘         │
//!                       ▼
//!               ┌───────────────┐      ┌───────────────────┐
//!               │ Transmit Line │◄─────│ Deferred Scheduler│
//!               │   (Mutex)     │      └───────────────────┘
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod address;
pub mod encoder;
pub mod transmit;
pub mod state;
pub mod scheduler;
pub mod controller;
pub mod network;
pub mod oneshot;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SwitchError};
pub use config::Config;
pub use controller::SwitchController;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rf433d
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
