//! Measurement range levels.

use crate::error::{Error, Result};

/// Full-scale measurement range of the meter.
///
/// The device exposes 42 range levels in a 1/3/10 geometric progression,
/// from 1 pW (or pJ in energy mode) up to 300 MW. The wire encoding is the
/// two-digit zero-padded decimal ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Range {
    /// 1 picowatt or picojoule.
    Pico1 = 0,
    /// 3 picowatts or picojoules.
    Pico3 = 1,
    /// 10 picowatts or picojoules.
    Pico10 = 2,
    /// 30 picowatts or picojoules.
    Pico30 = 3,
    /// 100 picowatts or picojoules.
    Pico100 = 4,
    /// 300 picowatts or picojoules.
    Pico300 = 5,
    /// 1 nanowatt or nanojoule.
    Nano1 = 6,
    /// 3 nanowatts or nanojoules.
    Nano3 = 7,
    /// 10 nanowatts or nanojoules.
    Nano10 = 8,
    /// 30 nanowatts or nanojoules.
    Nano30 = 9,
    /// 100 nanowatts or nanojoules.
    Nano100 = 10,
    /// 300 nanowatts or nanojoules.
    Nano300 = 11,
    /// 1 microwatt or microjoule.
    Micro1 = 12,
    /// 3 microwatts or microjoules.
    Micro3 = 13,
    /// 10 microwatts or microjoules.
    Micro10 = 14,
    /// 30 microwatts or microjoules.
    Micro30 = 15,
    /// 100 microwatts or microjoules.
    Micro100 = 16,
    /// 300 microwatts or microjoules.
    Micro300 = 17,
    /// 1 milliwatt or millijoule.
    Milli1 = 18,
    /// 3 milliwatts or millijoules.
    Milli3 = 19,
    /// 10 milliwatts or millijoules.
    Milli10 = 20,
    /// 30 milliwatts or millijoules.
    Milli30 = 21,
    /// 100 milliwatts or millijoules.
    Milli100 = 22,
    /// 300 milliwatts or millijoules.
    Milli300 = 23,
    /// 1 watt or joule.
    Unit1 = 24,
    /// 3 watts or joules.
    Unit3 = 25,
    /// 10 watts or joules.
    Unit10 = 26,
    /// 30 watts or joules.
    Unit30 = 27,
    /// 100 watts or joules.
    Unit100 = 28,
    /// 300 watts or joules.
    Unit300 = 29,
    /// 1 kilowatt or kilojoule.
    Kilo1 = 30,
    /// 3 kilowatts or kilojoules.
    Kilo3 = 31,
    /// 10 kilowatts or kilojoules.
    Kilo10 = 32,
    /// 30 kilowatts or kilojoules.
    Kilo30 = 33,
    /// 100 kilowatts or kilojoules.
    Kilo100 = 34,
    /// 300 kilowatts or kilojoules.
    Kilo300 = 35,
    /// 1 megawatt or megajoule.
    Mega1 = 36,
    /// 3 megawatts or megajoules.
    Mega3 = 37,
    /// 10 megawatts or megajoules.
    Mega10 = 38,
    /// 30 megawatts or megajoules.
    Mega30 = 39,
    /// 100 megawatts or megajoules.
    Mega100 = 40,
    /// 300 megawatts or megajoules.
    Mega300 = 41,
}

/// Highest valid range ordinal.
pub const MAX_ORDINAL: u8 = 41;

impl Range {
    /// Returns the wire ordinal (0..=41) of this range.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Parses a range from its wire ordinal.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the ordinal is outside 0..=41.
    pub fn from_ordinal(ordinal: u8) -> Result<Self> {
        // Variants are contiguous over 0..=41, so a bounds check suffices.
        if ordinal > MAX_ORDINAL {
            return Err(Error::protocol(format!(
                "range ordinal {ordinal} out of range 0..={MAX_ORDINAL}"
            )));
        }
        Ok(ALL_RANGES[ordinal as usize])
    }

    /// Human-readable label matching the vendor documentation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pico1 => "1 picowatt or picojoule",
            Self::Pico3 => "3 picowatts or picojoules",
            Self::Pico10 => "10 picowatts or picojoules",
            Self::Pico30 => "30 picowatts or picojoules",
            Self::Pico100 => "100 picowatts or picojoules",
            Self::Pico300 => "300 picowatts or picojoules",
            Self::Nano1 => "1 nanowatt or nanojoule",
            Self::Nano3 => "3 nanowatts or nanojoules",
            Self::Nano10 => "10 nanowatts or nanojoules",
            Self::Nano30 => "30 nanowatts or nanojoules",
            Self::Nano100 => "100 nanowatts or nanojoules",
            Self::Nano300 => "300 nanowatts or nanojoules",
            Self::Micro1 => "1 microwatt or microjoule",
            Self::Micro3 => "3 microwatts or microjoules",
            Self::Micro10 => "10 microwatts or microjoules",
            Self::Micro30 => "30 microwatts or microjoules",
            Self::Micro100 => "100 microwatts or microjoules",
            Self::Micro300 => "300 microwatts or microjoules",
            Self::Milli1 => "1 milliwatt or millijoule",
            Self::Milli3 => "3 milliwatts or millijoules",
            Self::Milli10 => "10 milliwatts or millijoules",
            Self::Milli30 => "30 milliwatts or millijoules",
            Self::Milli100 => "100 milliwatts or millijoules",
            Self::Milli300 => "300 milliwatts or millijoules",
            Self::Unit1 => "1 Watt or Joule",
            Self::Unit3 => "3 watts or joules",
            Self::Unit10 => "10 watts or joules",
            Self::Unit30 => "30 watts or joules",
            Self::Unit100 => "100 watts or joules",
            Self::Unit300 => "300 watts or joules",
            Self::Kilo1 => "1 kilowatt or kilojoule",
            Self::Kilo3 => "3 kilowatts or kilojoules",
            Self::Kilo10 => "10 kilowatts or kilojoules",
            Self::Kilo30 => "30 kilowatts or kilojoules",
            Self::Kilo100 => "100 kilowatts or kilojoules",
            Self::Kilo300 => "300 kilowatts or kilojoules",
            Self::Mega1 => "1 megawatt or megajoule",
            Self::Mega3 => "3 megawatts or megajoules",
            Self::Mega10 => "10 megawatts or megajoules",
            Self::Mega30 => "30 megawatts or megajoules",
            Self::Mega100 => "100 megawatts or megajoules",
            Self::Mega300 => "300 megawatts or megajoules",
        }
    }
}

/// All ranges in ordinal order.
pub const ALL_RANGES: [Range; 42] = [
    Range::Pico1,
    Range::Pico3,
    Range::Pico10,
    Range::Pico30,
    Range::Pico100,
    Range::Pico300,
    Range::Nano1,
    Range::Nano3,
    Range::Nano10,
    Range::Nano30,
    Range::Nano100,
    Range::Nano300,
    Range::Micro1,
    Range::Micro3,
    Range::Micro10,
    Range::Micro30,
    Range::Micro100,
    Range::Micro300,
    Range::Milli1,
    Range::Milli3,
    Range::Milli10,
    Range::Milli30,
    Range::Milli100,
    Range::Milli300,
    Range::Unit1,
    Range::Unit3,
    Range::Unit10,
    Range::Unit30,
    Range::Unit100,
    Range::Unit300,
    Range::Kilo1,
    Range::Kilo3,
    Range::Kilo10,
    Range::Kilo30,
    Range::Kilo100,
    Range::Kilo300,
    Range::Mega1,
    Range::Mega3,
    Range::Mega10,
    Range::Mega30,
    Range::Mega100,
    Range::Mega300,
];

impl From<Range> for u8 {
    fn from(range: Range) -> Self {
        range as Self
    }
}

impl TryFrom<u8> for Range {
    type Error = Error;

    fn try_from(ordinal: u8) -> Result<Self> {
        Self::from_ordinal(ordinal)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_round_trip() {
        for ordinal in 0..=MAX_ORDINAL {
            let range = Range::from_ordinal(ordinal).unwrap();
            assert_eq!(range.ordinal(), ordinal);
        }
    }

    #[test]
    fn test_out_of_range_ordinal_rejected() {
        assert!(Range::from_ordinal(42).is_err());
        assert!(Range::from_ordinal(255).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Range::Nano1.label(), "1 nanowatt or nanojoule");
        assert_eq!(Range::Nano1.ordinal(), 6);
        assert_eq!(Range::Mega300.label(), "300 megawatts or megajoules");
    }
}
