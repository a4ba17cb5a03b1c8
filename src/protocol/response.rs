//! Response parsing for the Maestro serial protocol.
//!
//! Query replies are single ASCII lines, most of them carrying a literal
//! prefix before the value (`Range: 6`, `AutoScale: 1`, ...). The transport
//! strips the `\r\n` terminator before these parsers run. A reply that is
//! empty, lacks its prefix, or whose remainder fails to parse is a protocol
//! error; the device firmware is then not speaking the dialect we expect.

use crate::error::{Error, Result};
use crate::types::{Range, Unit};

/// Strips `prefix` from `line` and returns the remainder as UTF-8 text.
fn strip_prefix<'a>(line: &'a [u8], prefix: &str) -> Result<&'a str> {
    if line.is_empty() {
        return Err(Error::protocol(format!(
            "empty response, expected `{prefix}...`"
        )));
    }
    let text = std::str::from_utf8(line)
        .map_err(|_| Error::protocol(format!("response is not valid UTF-8: {line:?}")))?;
    text.strip_prefix(prefix).ok_or_else(|| {
        Error::protocol(format!("expected prefix `{prefix}`, got `{text}`"))
    })
}

/// Parses a `*GCR` reply (`Range: <ordinal>`).
pub fn parse_range(line: &[u8]) -> Result<Range> {
    let rest = strip_prefix(line, "Range: ")?;
    let ordinal: u8 = rest
        .trim()
        .parse()
        .map_err(|_| Error::protocol(format!("invalid range ordinal `{rest}`")))?;
    Range::from_ordinal(ordinal)
}

/// Parses a `*GAS` reply (`AutoScale: 0|1`).
pub fn parse_auto_scale(line: &[u8]) -> Result<bool> {
    let rest = strip_prefix(line, "AutoScale: ")?;
    match rest.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::protocol(format!(
            "invalid auto-scale flag `{other}`"
        ))),
    }
}

/// Parses a `*GTL` reply (`Trigger Level: <float>`).
pub fn parse_trigger_level(line: &[u8]) -> Result<f64> {
    let rest = strip_prefix(line, "Trigger Level: ")?;
    rest.trim()
        .parse()
        .map_err(|_| Error::protocol(format!("invalid trigger level `{rest}`")))
}

/// Parses a `*GWL` reply (`PWC:<nm>`).
pub fn parse_wavelength(line: &[u8]) -> Result<u32> {
    let rest = strip_prefix(line, "PWC:")?;
    rest.trim()
        .parse()
        .map_err(|_| Error::protocol(format!("invalid wavelength `{rest}`")))
}

/// Parses a `*GMD` reply (`Mode: <code>`) into the unit for that mode.
pub fn parse_mode(line: &[u8]) -> Result<Unit> {
    let rest = strip_prefix(line, "Mode: ")?;
    let code = rest.trim();
    if code.len() != 1 {
        return Err(Error::protocol(format!("invalid mode code `{code}`")));
    }
    Unit::from_mode_code(code.as_bytes()[0])
}

/// Parses a `*CVU` reply, a bare float with no prefix.
pub fn parse_measurement(line: &[u8]) -> Result<f64> {
    let text = strip_prefix(line, "")?;
    text.trim()
        .parse()
        .map_err(|_| Error::protocol(format!("invalid measurement `{text}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Range;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(b"Range: 6").unwrap(), Range::Nano1);
        assert_eq!(parse_range(b"Range: 41").unwrap(), Range::Mega300);
        assert_eq!(parse_range(b"Range: 0").unwrap(), Range::Pico1);
    }

    #[test]
    fn test_parse_range_bad_prefix() {
        assert!(parse_range(b"Foo: 3").is_err());
        assert!(parse_range(b"range: 3").is_err());
    }

    #[test]
    fn test_parse_range_bad_ordinal() {
        assert!(parse_range(b"Range: 42").is_err());
        assert!(parse_range(b"Range: -1").is_err());
        assert!(parse_range(b"Range: six").is_err());
    }

    #[test]
    fn test_parse_auto_scale() {
        assert!(parse_auto_scale(b"AutoScale: 1").unwrap());
        assert!(!parse_auto_scale(b"AutoScale: 0").unwrap());
        assert!(parse_auto_scale(b"AutoScale: 2").is_err());
    }

    #[test]
    fn test_parse_trigger_level() {
        let level = parse_trigger_level(b"Trigger Level: 2.50").unwrap();
        assert!((level - 2.5).abs() < f64::EPSILON);
        assert!(parse_trigger_level(b"Level: 2.50").is_err());
    }

    #[test]
    fn test_parse_wavelength() {
        assert_eq!(parse_wavelength(b"PWC:1064").unwrap(), 1064);
        assert_eq!(parse_wavelength(b"PWC:00532").unwrap(), 532);
        assert!(parse_wavelength(b"PWC:abc").is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(b"Mode: 0").unwrap(), Unit::Watts);
        assert_eq!(parse_mode(b"Mode: 6").unwrap(), Unit::Dbm);
        assert!(parse_mode(b"Mode: 9").is_err());
        assert!(parse_mode(b"Mode: 00").is_err());
    }

    #[test]
    fn test_parse_measurement() {
        let value = parse_measurement(b"3.1415").unwrap();
        assert!((value - 3.1415).abs() < f64::EPSILON);
        assert!(parse_measurement(b"ovl").is_err());
    }

    #[test]
    fn test_empty_response_is_protocol_error() {
        assert!(parse_range(b"").is_err());
        assert!(parse_measurement(b"").is_err());
        assert!(parse_mode(b"").is_err());
    }
}
