//! Command encoding for the Maestro serial protocol.
//!
//! Every command is a short ASCII string starting with `*`. Write commands
//! carry a fixed-width decimal operand, left-padded with zeros; the device
//! answers queries with one `\r\n`-terminated line and set commands with
//! nothing at all.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::Range;

/// Wire width of the range ordinal operand.
pub const RANGE_WIDTH: usize = 2;

/// Wire width of the wavelength operand.
pub const WAVELENGTH_WIDTH: usize = 5;

/// Commands understood by the Maestro.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Query firmware version (`*VER`).
    GetVersion,
    /// Query the current range (`*GCR`).
    GetRange,
    /// Select a range (`*SCS<nn>`).
    SetRange(Range),
    /// Query auto-range state (`*GAS`).
    GetAutoScale,
    /// Enable or disable auto-range (`*SAS<b>`).
    SetAutoScale(bool),
    /// Query the trigger level (`*GTL`).
    GetTriggerLevel,
    /// Set the trigger level percentage (`*STL<f>`).
    SetTriggerLevel(f64),
    /// Query the wavelength correction value (`*GWL`).
    GetWavelength,
    /// Set the wavelength correction in nm (`*PWC<nnnnn>`).
    ///
    /// A zero operand restores the detector's default spectral settings,
    /// which the device treats as correction disabled.
    SetWavelength(u32),
    /// Query the measurement mode (`*GMD`).
    GetMode,
    /// Query the current measured value (`*CVU`).
    GetCurrentValue,
}

impl Command {
    /// Encodes the command into its wire payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::OperandOutOfRange` when a numeric operand does not
    /// fit the command's fixed field width. Nothing is transmitted in that
    /// case; the check happens before any I/O.
    pub fn encode(self) -> Result<Bytes> {
        let request = match self {
            Self::GetVersion => "*VER".to_owned(),
            Self::GetRange => "*GCR".to_owned(),
            Self::SetRange(range) => {
                format!("*SCS{}", pad_decimal(range.ordinal().into(), RANGE_WIDTH)?)
            }
            Self::GetAutoScale => "*GAS".to_owned(),
            Self::SetAutoScale(enabled) => format!("*SAS{}", u8::from(enabled)),
            Self::GetTriggerLevel => "*GTL".to_owned(),
            Self::SetTriggerLevel(level) => format!("*STL{level}"),
            Self::GetWavelength => "*GWL".to_owned(),
            Self::SetWavelength(nm) => {
                format!("*PWC{}", pad_decimal(nm, WAVELENGTH_WIDTH)?)
            }
            Self::GetMode => "*GMD".to_owned(),
            Self::GetCurrentValue => "*CVU".to_owned(),
        };
        Ok(Bytes::from(request))
    }

    /// Returns true if the device answers this command with a response line.
    ///
    /// Set commands are fire-and-forget; the device sends no acknowledgment.
    #[must_use]
    pub const fn expects_response(self) -> bool {
        !matches!(
            self,
            Self::SetRange(_)
                | Self::SetAutoScale(_)
                | Self::SetTriggerLevel(_)
                | Self::SetWavelength(_)
        )
    }
}

/// Renders `value` as decimal ASCII, left-padded with zeros to `width`.
///
/// Values wider than the field are rejected rather than truncated.
fn pad_decimal(value: u32, width: usize) -> Result<String> {
    let digits = format!("{value}");
    if digits.len() > width {
        return Err(Error::OperandOutOfRange { value, width });
    }
    Ok(format!("{value:0>width$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ALL_RANGES;

    #[test]
    fn test_query_encoding() {
        assert_eq!(Command::GetVersion.encode().unwrap(), "*VER");
        assert_eq!(Command::GetRange.encode().unwrap(), "*GCR");
        assert_eq!(Command::GetAutoScale.encode().unwrap(), "*GAS");
        assert_eq!(Command::GetTriggerLevel.encode().unwrap(), "*GTL");
        assert_eq!(Command::GetWavelength.encode().unwrap(), "*GWL");
        assert_eq!(Command::GetMode.encode().unwrap(), "*GMD");
        assert_eq!(Command::GetCurrentValue.encode().unwrap(), "*CVU");
    }

    #[test]
    fn test_range_operand_is_always_two_digits() {
        for range in ALL_RANGES {
            let payload = Command::SetRange(range).encode().unwrap();
            assert_eq!(payload.len(), 6);
            assert_eq!(&payload[..4], b"*SCS");
            let expected = format!("{:02}", range.ordinal());
            assert_eq!(&payload[4..], expected.as_bytes());
        }
    }

    #[test]
    fn test_auto_scale_encoding() {
        assert_eq!(Command::SetAutoScale(true).encode().unwrap(), "*SAS1");
        assert_eq!(Command::SetAutoScale(false).encode().unwrap(), "*SAS0");
    }

    #[test]
    fn test_trigger_level_encoding() {
        assert_eq!(Command::SetTriggerLevel(2.5).encode().unwrap(), "*STL2.5");
        assert_eq!(Command::SetTriggerLevel(0.0).encode().unwrap(), "*STL0");
    }

    #[test]
    fn test_wavelength_padding() {
        assert_eq!(Command::SetWavelength(0).encode().unwrap(), "*PWC00000");
        assert_eq!(Command::SetWavelength(532).encode().unwrap(), "*PWC00532");
        assert_eq!(
            Command::SetWavelength(99_999).encode().unwrap(),
            "*PWC99999"
        );
    }

    #[test]
    fn test_wavelength_too_wide_rejected() {
        let err = Command::SetWavelength(100_000).encode().unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::OperandOutOfRange {
                value: 100_000,
                width: WAVELENGTH_WIDTH
            }
        ));
    }

    #[test]
    fn test_expects_response() {
        assert!(Command::GetRange.expects_response());
        assert!(Command::GetCurrentValue.expects_response());
        assert!(!Command::SetAutoScale(true).expects_response());
        assert!(!Command::SetWavelength(0).expects_response());
    }
}
