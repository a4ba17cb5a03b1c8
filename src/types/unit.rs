//! Measurement units reported by the device.

use crate::error::{Error, Result};

/// Physical unit of the current measurement, derived from the device mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Continuous power, watts.
    #[default]
    Watts,
    /// Pulse energy, joules.
    Joules,
    /// Single-shot pulse energy, joules.
    JoulesSingleShot,
    /// Logarithmic power, dBm.
    Dbm,
}

impl Unit {
    /// Maps a device mode code (the payload of a `*GMD` reply) to a unit.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` for mode codes the device is not documented
    /// to report.
    pub fn from_mode_code(code: u8) -> Result<Self> {
        match code {
            b'0' => Ok(Self::Watts),
            b'1' => Ok(Self::Joules),
            b'2' => Ok(Self::JoulesSingleShot),
            b'6' => Ok(Self::Dbm),
            other => Err(Error::protocol(format!(
                "unknown mode code {:?}",
                char::from(other)
            ))),
        }
    }

    /// Display label for the unit.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Watts => "W",
            Self::Joules => "J",
            Self::JoulesSingleShot => "J (single shot)",
            Self::Dbm => "dBm",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A measured value together with the unit the device reported for it.
///
/// The meter switches units when its mode changes, so the unit is part of
/// every reading rather than a fixed property of the attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    /// Measured value in `unit`.
    pub value: f64,
    /// Unit in effect when the value was read.
    pub unit: Unit,
}
