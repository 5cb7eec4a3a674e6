//! Hex quantity codec for JSON-RPC numbers.
//!
//! Quantities travel as `0x`-prefixed hex strings without leading zeros
//! (`"0x1228c0d"`). Empty strings decode to zero.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Encode `n` as a `0x`-prefixed lower-case hex quantity.
pub fn encode_u64(n: u64) -> String {
    format!("{:#x}", n)
}

/// Errors produced while decoding a hex quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("missing 0x prefix")]
    MissingPrefix,

    #[error("hex string \"0x\" has no digits")]
    Empty,

    #[error("hex number with leading zero digits")]
    LeadingZero,

    #[error("hex number > 64 bits")]
    Overflow,

    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Decode a hex quantity into a `u64`.
pub fn decode_u64(input: &str) -> Result<u64, HexError> {
    if input.is_empty() {
        return Ok(0);
    }

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or(HexError::MissingPrefix)?;

    if digits.is_empty() {
        return Err(HexError::Empty);
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(HexError::LeadingZero);
    }
    if digits.len() > 16 {
        return Err(HexError::Overflow);
    }

    digits.chars().try_fold(0u64, |acc, c| {
        let nibble = c.to_digit(16).ok_or(HexError::InvalidDigit(c))?;
        Ok((acc << 4) | u64::from(nibble))
    })
}

/// A `u64` that deserializes from a JSON-RPC hex quantity.
///
/// Plain JSON integers are accepted as well, and values serialize back as
/// integers so API consumers never see hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexU64(pub u64);

impl From<u64> for HexU64 {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<HexU64> for u64 {
    fn from(h: HexU64) -> Self {
        h.0
    }
}

impl fmt::Display for HexU64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for HexU64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

struct HexU64Visitor;

impl<'de> Visitor<'de> for HexU64Visitor {
    type Value = HexU64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0x-prefixed hex quantity or an unsigned integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        decode_u64(v).map(HexU64).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(HexU64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(HexU64)
            .map_err(|_| E::custom("negative quantity"))
    }
}

impl<'de> Deserialize<'de> for HexU64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HexU64Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode_u64(19041293), "0x1228c0d");
        assert_eq!(encode_u64(0), "0x0");
        assert_eq!(encode_u64(u64::MAX), "0xffffffffffffffff");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_u64("0x1228c0d"), Ok(19041293));
        assert_eq!(decode_u64("0X1228C0D"), Ok(19041293));
        assert_eq!(decode_u64("0x0"), Ok(0));
        assert_eq!(decode_u64(""), Ok(0));
        assert_eq!(decode_u64("0xffffffffffffffff"), Ok(u64::MAX));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode_u64("1228c0d"), Err(HexError::MissingPrefix));
        assert_eq!(decode_u64("0x"), Err(HexError::Empty));
        assert_eq!(decode_u64("0x01"), Err(HexError::LeadingZero));
        assert_eq!(decode_u64("0x10000000000000000"), Err(HexError::Overflow));
        assert_eq!(decode_u64("0xzz"), Err(HexError::InvalidDigit('z')));
    }

    #[test]
    fn test_json_field() {
        #[derive(Deserialize, Serialize)]
        struct Header {
            number: HexU64,
        }

        let header: Header = serde_json::from_str(r#"{"number":"0x1228c0d"}"#).unwrap();
        assert_eq!(header.number, HexU64(19041293));
        assert_eq!(serde_json::to_string(&header).unwrap(), r#"{"number":19041293}"#);

        let header: Header = serde_json::from_str(r#"{"number":42}"#).unwrap();
        assert_eq!(header.number.0, 42);

        assert!(serde_json::from_str::<Header>(r#"{"number":"0x01"}"#).is_err());
        assert!(serde_json::from_str::<Header>(r#"{"number":true}"#).is_err());
    }
}
