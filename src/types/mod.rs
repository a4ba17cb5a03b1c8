//! Data types for the Maestro attribute model.

pub mod range;
pub mod unit;

pub use range::{ALL_RANGES, MAX_ORDINAL, Range};
pub use unit::{MeterReading, Unit};
