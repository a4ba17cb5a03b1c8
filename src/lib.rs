//! # maestro
//!
//! A Rust client library for Gentec-EO Maestro laser power/energy meters.
//!
//! This library speaks the meter's line-oriented ASCII protocol over a
//! serial link and exposes the instrument as a small set of typed
//! attributes: range, auto-range, trigger level, wavelength correction, and
//! the measured value.
//!
//! ## Features
//!
//! - Async/await based API using Tokio
//! - Typed command encoding and response parsing
//! - Per-reading unit resolution (W / J / dBm, following the device mode)
//! - Comprehensive error handling
//!
//! ## Quick Start
//!
//! ```no_run
//! use maestro::Maestro;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), maestro::Error> {
//!     // Connect to a Maestro power meter
//!     let mut meter = Maestro::serial("/dev/ttyUSB0");
//!     if let Some(version) = meter.connect().await? {
//!         println!("Connected to: {version}");
//!     }
//!
//!     // Read the current measurement
//!     let reading = meter.read_meter_value().await?;
//!     println!("{} {}", reading.value, reading.unit);
//!
//!     meter.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`protocol`] - Command encoding and response parsing
//! - [`types`] - Data structures (ranges, units, readings)
//! - [`transport`] - Transport implementations (currently serial)
//! - [`client`] - High-level [`Maestro`] session

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{CachedState, Maestro};
pub use error::{Error, Result};
pub use protocol::Command;
pub use transport::{SerialTransport, serial::SerialConfig, serial::list_ports};
pub use types::{MeterReading, Range, Unit};
