// ============================================================================
// Hex Encoding
// Truncated 256-bit big-endian hex words for on-chain consumers
// ============================================================================

use crate::numeric::{NumericResult, PreciseDecimal};
use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `0x`-prefixed lowercase hex integer, zero padded to at least 64 digits.
///
/// Values wider than 256 bits keep every digit, so `len()` exceeds 66.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EncodedHex(String);

impl EncodedHex {
    /// Hex digits in one 32-byte word
    pub const WORD_DIGITS: usize = 64;

    /// Length of a word-sized encoding including the `0x` prefix
    pub const WORD_LEN: usize = Self::WORD_DIGITS + 2;

    /// Output emitted in place of a result on any failure
    pub const SENTINEL: &'static str = "0x0";

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The hex digits without the `0x` prefix.
    #[inline]
    pub fn digits(&self) -> &str {
        &self.0[2..]
    }

    /// True when the value fits a single 256-bit word.
    #[inline]
    pub fn is_word_sized(&self) -> bool {
        self.0.len() == Self::WORD_LEN
    }

    /// The encoded value as an EVM word, or `None` when it is wider than 256 bits.
    pub fn to_u256(&self) -> Option<U256> {
        if !self.is_word_sized() {
            return None;
        }
        U256::from_str_radix(self.digits(), 16).ok()
    }
}

impl fmt::Display for EncodedHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedHex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Renders decimal results as fixed-width hex words.
///
/// # Example
/// ```
/// use yield_oracle::encoding::HexEncoder;
///
/// let value = "1000.9".parse().unwrap();
/// let hex = HexEncoder::encode(&value).unwrap();
/// assert!(hex.as_str().ends_with("3e8"));
/// assert_eq!(hex.as_str().len(), 66);
/// ```
pub struct HexEncoder;

impl HexEncoder {
    /// Truncate toward zero, drop the sign and hex-encode the magnitude.
    ///
    /// # Errors
    /// Returns `NotFinite` for infinities.
    pub fn encode(value: &PreciseDecimal) -> NumericResult<EncodedHex> {
        let magnitude = value.trunc_magnitude()?;
        if value.is_negative() && !magnitude.is_zero() {
            tracing::debug!(value = %value, "encoding magnitude of negative result");
        }
        Ok(Self::encode_integer(&magnitude))
    }

    /// Hex-encode an unsigned integer, left padded to one word.
    pub fn encode_integer(value: &BigUint) -> EncodedHex {
        EncodedHex(format!(
            "0x{:0>width$}",
            format!("{value:x}"),
            width = EncodedHex::WORD_DIGITS
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;
    use num_traits::One;

    fn encode(s: &str) -> String {
        HexEncoder::encode(&s.parse().unwrap())
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_encode_pads_to_word() {
        assert_eq!(
            encode("1000"),
            "0x00000000000000000000000000000000000000000000000000000000000003e8"
        );
        assert_eq!(
            encode("0"),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            encode("1000000000000000000"),
            "0x0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );
    }

    #[test]
    fn test_encode_truncates() {
        assert_eq!(encode("1000.999"), encode("1000"));
        assert_eq!(encode("0.999"), encode("0"));
        assert_eq!(encode("15.5e-1"), encode("1"));
    }

    #[test]
    fn test_encode_drops_sign() {
        assert_eq!(encode("-1000"), encode("1000"));
        assert_eq!(encode("-0.5"), encode("0"));
    }

    #[test]
    fn test_encode_wider_than_word() {
        let max_word = (BigUint::one() << 256u32) - 1u32;
        let hex = HexEncoder::encode_integer(&max_word);
        assert!(hex.is_word_sized());
        assert_eq!(hex.digits(), "f".repeat(64));

        let wide = HexEncoder::encode_integer(&(max_word + 1u32));
        assert!(!wide.is_word_sized());
        assert_eq!(wide.as_str(), format!("0x1{}", "0".repeat(64)));

        assert_eq!(
            encode("1e80"),
            "0x35f9dea3e1f6bdfef70cdd17b25efa418ca63a22764cec100000000000000000000"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode("123456789.123");
        let b = encode("123456789.123");
        assert_eq!(a, b);
        assert_eq!(a.len(), EncodedHex::WORD_LEN);
    }

    #[test]
    fn test_encode_unbounded_width() {
        let hex = encode(&format!("1{}", "0".repeat(2000)));
        assert_eq!(hex, encode("1e2000"));
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 2 + 1661);
    }

    #[test]
    fn test_encode_infinity() {
        let inf: PreciseDecimal = "-inf".parse().unwrap();
        assert_eq!(HexEncoder::encode(&inf), Err(NumericError::NotFinite));
    }

    #[test]
    fn test_to_u256() {
        let word = HexEncoder::encode(&"1000000000000000000".parse().unwrap()).unwrap();
        assert_eq!(word.to_u256(), Some(U256::from(1_000_000_000_000_000_000u64)));

        let wide = HexEncoder::encode(&"1e80".parse().unwrap()).unwrap();
        assert_eq!(wide.to_u256(), None);
    }
}
