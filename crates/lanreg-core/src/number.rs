//! Register address and value parsing
//!
//! Numbers are accepted as decimal, `0x`-prefixed hexadecimal or
//! `0`-prefixed octal, the same base detection C tools get from
//! `strtoul(.., 0)`.

use crate::error::{Error, Result};

/// Register address inside the MAC-PHY address space
pub type RegisterAddress = u32;

/// Register content
pub type RegisterValue = u32;

/// Parse a string the way C `strtoul(s, NULL, 0)` picks its base
///
/// `0x`/`0X` selects hexadecimal, any other leading `0` selects octal and
/// everything else is decimal. Surrounding whitespace is ignored. Unlike
/// `strtoul`, signs, trailing garbage and values that do not fit in 32 bits
/// are rejected rather than wrapped or truncated.
pub fn parse_u32(s: &str) -> Result<u32> {
    let trimmed = s.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        digits(hex, 16)
    } else if let Some(octal) = trimmed.strip_prefix('0').filter(|rest| !rest.is_empty()) {
        digits(octal, 8)
    } else {
        digits(trimmed, 10)
    };

    parsed.map_err(|reason| Error::InvalidNumber {
        input: s.to_string(),
        reason,
    })
}

/// Digits only: `from_str_radix` alone would also take a leading sign
fn digits(s: &str, radix: u32) -> std::result::Result<u32, String> {
    if s.is_empty() {
        return Err("no digits".to_string());
    }
    if let Some(c) = s.chars().find(|c| !c.is_digit(radix)) {
        return Err(format!("invalid base-{} digit '{}'", radix, c));
    }
    u32::from_str_radix(s, radix).map_err(|e| e.to_string())
}

/// Canonical register formatting: `0x` followed by 8 uppercase hex digits
pub fn format_hex(value: u32) -> String {
    format!("0x{:08X}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!(parse_u32("0x10000").unwrap(), 0x10000);
        assert_eq!(parse_u32("0X0c").unwrap(), 12);
        assert_eq!(parse_u32("65536").unwrap(), 0x10000);
        assert_eq!(parse_u32(" 0xFFFFFFFF\n").unwrap(), u32::MAX);
        assert_eq!(parse_u32("0").unwrap(), 0);
    }

    #[test]
    fn test_leading_zero_is_octal() {
        assert_eq!(parse_u32("010").unwrap(), 8);
        assert_eq!(parse_u32("0777").unwrap(), 0o777);
        assert_eq!(parse_u32("00").unwrap(), 0);
        assert!(parse_u32("08").is_err());
        assert!(parse_u32("040000000000").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_u32("").is_err());
        assert!(parse_u32("0x").is_err());
        assert!(parse_u32("0x1G").is_err());
        assert!(parse_u32("ten").is_err());
        assert!(parse_u32("-1").is_err());
        assert!(parse_u32("0x100000000").is_err());
        assert!(parse_u32("4294967296").is_err());
        assert!(parse_u32("0x+C").is_err());
        assert!(parse_u32("0x-1").is_err());
        assert!(parse_u32("+12").is_err());
        assert!(parse_u32("0+7").is_err());
        assert!(parse_u32("12 34").is_err());
    }

    #[test]
    fn test_matches_reference_parser() {
        let samples = [0u32, 1, 0x0C, 0xFF, 0x10000, 0x10021, 0xDEAD_BEEF, u32::MAX];
        for &v in &samples {
            let hex_lower = format!("0x{:x}", v);
            let hex_upper = format!("0X{:X}", v);
            let dec = v.to_string();
            let oct = format!("0{:o}", v);
            assert_eq!(parse_u32(&hex_lower).unwrap(), v);
            assert_eq!(parse_u32(&oct).unwrap(), v);
            assert_eq!(parse_u32(&hex_upper).unwrap(), v);
            assert_eq!(parse_u32(&dec).unwrap(), v);
        }
    }

    #[test]
    fn test_canonical_hex_is_stable() {
        for s in ["0x10000", "65536", "0x00010000", "0X10000"] {
            let canonical = format_hex(parse_u32(s).unwrap());
            assert_eq!(canonical, "0x00010000");
            assert_eq!(format_hex(parse_u32(&canonical).unwrap()), canonical);
        }
    }
}
