//! Protocol definitions for Maestro communication.
//!
//! This module contains the low-level protocol pieces:
//! - Command encoding with fixed-width operands
//! - Response line parsing

pub mod command;
pub mod response;

pub use command::{Command, RANGE_WIDTH, WAVELENGTH_WIDTH};
pub use response::{
    parse_auto_scale, parse_measurement, parse_mode, parse_range, parse_trigger_level,
    parse_wavelength,
};
