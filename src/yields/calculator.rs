// ============================================================================
// Yield Calculator
// Compound yield, linear yield and share price over PreciseDecimal
// ============================================================================
//
// Each formula applies its operations in a fixed order with one rounding per
// operation, so results agree digit for digit with the on-chain reference
// scripts that use a 50-digit decimal context.

use super::error::{YieldError, YieldResult};
use crate::encoding::{EncodedHex, HexEncoder};
use crate::numeric::{pow, DecimalContext, PreciseDecimal};

/// Denominator turning a parts-per-million rate into a fraction
pub const PPM_DENOMINATOR: u64 = 1_000_000;

/// Seconds in one day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed-point scale of a share price (1.0 = 10^18)
pub const SHARE_PRICE_SCALE: u64 = 1_000_000_000_000_000_000;

/// Literal supply that short-circuits to the initial 1:1 share price
const ZERO_SUPPLY_LITERAL: &str = "0";

/// Stateless calculator bound to a decimal context.
///
/// # Example
/// ```
/// use yield_oracle::yields::YieldCalculator;
///
/// let calc = YieldCalculator::default();
/// let hex = calc.linear_yield_str("1000", "0", "0").unwrap();
/// assert_eq!(
///     hex.as_str(),
///     "0x00000000000000000000000000000000000000000000000000000000000003e8"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldCalculator {
    context: DecimalContext,
}

impl YieldCalculator {
    pub fn new(context: DecimalContext) -> Self {
        Self { context }
    }

    #[inline]
    pub fn context(&self) -> &DecimalContext {
        &self.context
    }

    // ========================================================================
    // Formulas
    // ========================================================================

    /// `principal × (1 + rate_ppm / 10^6) ^ (time_seconds / 86400)`
    ///
    /// Infinite arguments are accepted; an infinite result only fails once
    /// it is encoded.
    ///
    /// # Errors
    /// - `ArithmeticDomain` when the daily rate is below -100% and the
    ///   elapsed days are fractional
    /// - `Unknown` for any other arithmetic failure (e.g. `0 ^ 0`)
    pub fn compound_yield(
        &self,
        principal: &PreciseDecimal,
        rate_ppm: &PreciseDecimal,
        time_seconds: &PreciseDecimal,
    ) -> YieldResult<PreciseDecimal> {
        let ctx = &self.context;
        let daily_rate = rate_ppm.checked_div(&PreciseDecimal::from_u64(PPM_DENOMINATOR), ctx)?;
        let time_days = time_seconds.checked_div(&PreciseDecimal::from_u64(SECONDS_PER_DAY), ctx)?;
        let growth_base = PreciseDecimal::one().checked_add(&daily_rate, ctx)?;
        let growth = pow(&growth_base, &time_days, ctx)?;
        let result = principal.checked_mul(&growth, ctx)?;

        tracing::debug!(
            principal = %principal,
            rate_ppm = %rate_ppm,
            time_seconds = %time_seconds,
            result = %result,
            "compound yield"
        );
        Ok(result)
    }

    /// `principal + principal × rate_ppm × time_seconds / (10^6 × 86400)`
    pub fn linear_yield(
        &self,
        principal: &PreciseDecimal,
        rate_ppm: &PreciseDecimal,
        time_seconds: &PreciseDecimal,
    ) -> YieldResult<PreciseDecimal> {
        let ctx = &self.context;
        let denominator = PreciseDecimal::from_u64(PPM_DENOMINATOR)
            .checked_mul(&PreciseDecimal::from_u64(SECONDS_PER_DAY), ctx)?;
        let accrued = principal
            .checked_mul(rate_ppm, ctx)?
            .checked_mul(time_seconds, ctx)?
            .checked_div(&denominator, ctx)?;
        let result = principal.checked_add(&accrued, ctx)?;

        tracing::debug!(
            principal = %principal,
            rate_ppm = %rate_ppm,
            time_seconds = %time_seconds,
            result = %result,
            "linear yield"
        );
        Ok(result)
    }

    /// `compound_yield(pool_size, ..) × 10^18 / total_supply`
    ///
    /// Total assets grow with the compound formula.
    ///
    /// # Errors
    /// Returns `Unknown(DivisionByZero)` for a zero supply; the 1:1 initial
    /// price applies only to the literal `"0"` in [`Self::share_price_str`].
    pub fn share_price(
        &self,
        pool_size: &PreciseDecimal,
        total_supply: &PreciseDecimal,
        rate_ppm: &PreciseDecimal,
        time_seconds: &PreciseDecimal,
    ) -> YieldResult<PreciseDecimal> {
        let ctx = &self.context;
        let total_assets = self.compound_yield(pool_size, rate_ppm, time_seconds)?;
        let result = total_assets
            .checked_mul(&PreciseDecimal::from_u64(SHARE_PRICE_SCALE), ctx)?
            .checked_div(total_supply, ctx)?;

        tracing::debug!(
            total_assets = %total_assets,
            total_supply = %total_supply,
            result = %result,
            "share price"
        );
        Ok(result)
    }

    // ========================================================================
    // String Boundary
    // ========================================================================

    /// Parse string arguments, compute compound yield and hex-encode it.
    pub fn compound_yield_str(
        &self,
        principal: &str,
        rate_ppm: &str,
        time_seconds: &str,
    ) -> YieldResult<EncodedHex> {
        let result = self.compound_yield(
            &parse_argument("principal", principal)?,
            &parse_argument("rate_ppm", rate_ppm)?,
            &parse_argument("time_seconds", time_seconds)?,
        )?;
        encode(&result)
    }

    /// Parse string arguments, compute linear yield and hex-encode it.
    pub fn linear_yield_str(
        &self,
        principal: &str,
        rate_ppm: &str,
        time_seconds: &str,
    ) -> YieldResult<EncodedHex> {
        let result = self.linear_yield(
            &parse_argument("principal", principal)?,
            &parse_argument("rate_ppm", rate_ppm)?,
            &parse_argument("time_seconds", time_seconds)?,
        )?;
        encode(&result)
    }

    /// Parse string arguments, compute the share price and hex-encode it.
    ///
    /// A `total_supply` of exactly `"0"` returns the encoded 10^18 before any
    /// argument is parsed.
    pub fn share_price_str(
        &self,
        pool_size: &str,
        total_supply: &str,
        rate_ppm: &str,
        time_seconds: &str,
    ) -> YieldResult<EncodedHex> {
        if total_supply == ZERO_SUPPLY_LITERAL {
            tracing::debug!("zero total supply, initial share price");
            return encode(&PreciseDecimal::from_u64(SHARE_PRICE_SCALE));
        }
        let result = self.share_price(
            &parse_argument("pool_size", pool_size)?,
            &parse_argument("total_supply", total_supply)?,
            &parse_argument("rate_ppm", rate_ppm)?,
            &parse_argument("time_seconds", time_seconds)?,
        )?;
        encode(&result)
    }
}

fn parse_argument(argument: &'static str, value: &str) -> YieldResult<PreciseDecimal> {
    value.parse().map_err(|_| YieldError::InvalidNumber {
        argument,
        value: value.to_string(),
    })
}

fn encode(value: &PreciseDecimal) -> YieldResult<EncodedHex> {
    Ok(HexEncoder::encode(value)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    const ONE_E18: &str = "1000000000000000000";

    fn calc() -> YieldCalculator {
        YieldCalculator::default()
    }

    fn word(digits: &str) -> String {
        format!("0x{digits:0>64}")
    }

    fn dec(s: &str) -> PreciseDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_compound_yield_reference_values() {
        let cases = [
            (ONE_E18, "0", "86400", "de0b6b3a7640000"),
            (ONE_E18, "5000", "86400", "df27a2cdf448000"),
            (ONE_E18, "5000", "43200", "de9959a7b067d3b"),
            (ONE_E18, "100", "31536000", "e64c6d01a862179"),
            (ONE_E18, "100", "12345", "de0c3b23da6390b"),
            (ONE_E18, "1000", "-86400", "ddd2a1d9bb70458"),
            (ONE_E18, "1000", "-43200", "ddef04b92227207"),
            (ONE_E18, "-1000", "864000", "dbd5892b498a0f1"),
            (ONE_E18, "-999999", "8640000", "0"),
            ("2.5e3", "10", "86400", "9c4"),
            ("1_000", "0", "0", "3e8"),
        ];
        for (principal, rate, time, expected) in cases {
            let hex = calc().compound_yield_str(principal, rate, time).unwrap();
            assert_eq!(
                hex.as_str(),
                word(expected),
                "compound_yield({principal}, {rate}, {time})"
            );
        }
    }

    #[test]
    fn test_linear_yield_reference_values() {
        let cases = [
            ("1000", "0", "0", "3e8"),
            (ONE_E18, "5000", "86400", "df27a2cdf448000"),
            (ONE_E18, "100", "31536000", "e62634225b14000"),
            ("123456789", "333", "1", "75bcd15"),
        ];
        for (principal, rate, time, expected) in cases {
            let hex = calc().linear_yield_str(principal, rate, time).unwrap();
            assert_eq!(
                hex.as_str(),
                word(expected),
                "linear_yield({principal}, {rate}, {time})"
            );
        }
    }

    #[test]
    fn test_share_price_reference_values() {
        let hex = calc()
            .share_price_str("1000000000000000000000", "500000000000000000000", "5000", "86400")
            .unwrap();
        assert_eq!(hex.as_str(), word("1be4f459be890000"));

        let hex = calc()
            .share_price_str("1000000", "3", "250", "100000")
            .unwrap();
        assert_eq!(hex.as_str(), word("469b43d11a41746c50ad"));
    }

    #[test]
    fn test_share_price_zero_supply_literal() {
        let expected = word("de0b6b3a7640000");
        assert_eq!(
            calc().share_price_str("0", "0", "5000", "86400").unwrap().as_str(),
            expected
        );
        // other arguments are not inspected
        assert_eq!(
            calc().share_price_str("abc", "0", "x", "y").unwrap().as_str(),
            expected
        );
    }

    #[test]
    fn test_share_price_zero_supply_spelled_differently() {
        assert_eq!(
            calc().share_price_str("1", "0.0", "1", "1"),
            Err(YieldError::Unknown(NumericError::DivisionByZero))
        );
        assert_eq!(
            calc().share_price(&dec("1"), &dec("0"), &dec("1"), &dec("1")),
            Err(YieldError::Unknown(NumericError::DivisionByZero))
        );
    }

    #[test]
    fn test_share_price_uses_compound_growth() {
        let pool = dec(ONE_E18);
        let supply = dec(ONE_E18);
        let (rate, time) = (dec("100"), dec("31536000"));

        let price = calc().share_price(&pool, &supply, &rate, &time).unwrap();
        let compound = calc().compound_yield(&pool, &rate, &time).unwrap();
        let linear = calc().linear_yield(&pool, &rate, &time).unwrap();

        let scale = dec(ONE_E18);
        let ctx = DecimalContext::default();
        assert_eq!(
            price,
            compound
                .checked_mul(&scale, &ctx)
                .unwrap()
                .checked_div(&supply, &ctx)
                .unwrap()
        );
        assert!(price > linear);
    }

    #[test]
    fn test_negative_base() {
        // base -0.5 raised to a whole number of days
        let hex = calc().compound_yield_str("1000", "-1500000", "86400").unwrap();
        assert_eq!(hex.as_str(), word("1f4"));

        assert_eq!(
            calc().compound_yield_str("1000", "-1500000", "43200"),
            Err(YieldError::ArithmeticDomain)
        );
    }

    #[test]
    fn test_zero_base() {
        assert_eq!(
            calc().compound_yield_str("1000", "-1000000", "86400").unwrap().as_str(),
            word("0")
        );
        assert_eq!(
            calc().compound_yield_str("1000", "-1000000", "0"),
            Err(YieldError::Unknown(NumericError::InvalidOperation))
        );
    }

    #[test]
    fn test_fractional_days() {
        let result = calc()
            .compound_yield(&dec("1000000"), &dec("3378"), &dec("14855531"))
            .unwrap();
        assert_eq!(
            result,
            dec("1785736.9947907527541785872490773872932858650192594")
        );
        assert_eq!(
            calc().compound_yield_str("1000000", "3378", "14855531").unwrap().as_str(),
            word("1b3f88")
        );
    }

    #[test]
    fn test_unbounded_magnitudes() {
        let (principal, rate, time) = (
            "43477896179085202021.81105584150",
            "612328005812645838897763582",
            "8441991",
        );
        let result = calc()
            .compound_yield(&dec(principal), &dec(rate), &dec(time))
            .unwrap();
        assert_eq!(
            result,
            dec("4.9851347288867115471086629052412084327242459465478E+2050")
        );
        let hex = calc().compound_yield_str(principal, rate, time).unwrap();
        assert_eq!(hex.as_str().len(), 1706);
        assert!(hex.as_str().starts_with("0x134bc41eddfaee9a2ea9e5abd28d7971b0bda5"));

        // principal + 0 rounds to 50 digits before encoding
        let hex = calc().linear_yield_str(&"9".repeat(400), "0", "0").unwrap();
        assert_eq!(hex, HexEncoder::encode(&dec("1e400")).unwrap());
        assert_eq!(hex.as_str().len(), 335);

        let written_out = format!("1{}", "0".repeat(310));
        let hex = calc().linear_yield_str(&written_out, "0", "0").unwrap();
        assert_eq!(hex, HexEncoder::encode(&dec("1e310")).unwrap());
        assert_eq!(hex.as_str().len(), 260);
    }

    #[test]
    fn test_extreme_exponents() {
        assert_eq!(
            calc().linear_yield_str("1e-99999999999999999", "0", "0").unwrap().as_str(),
            word("0")
        );
        assert_eq!(
            calc().linear_yield_str("1e99999999999999999", "0", "0"),
            Err(YieldError::Unknown(NumericError::Overflow))
        );
        assert!(matches!(
            calc().linear_yield_str("1e1000000000000000000", "0", "0"),
            Err(YieldError::InvalidNumber { argument: "principal", .. })
        ));
    }

    #[test]
    fn test_infinite_arguments() {
        let finite = [
            ("compound", ["5", "0", "inf", ""], "5"),
            ("compound", ["5", "-1000", "Infinity", ""], "0"),
            ("compound", ["5", "-inf", "0", ""], "5"),
            ("compound", ["5", "inf", "-86400", ""], "0"),
            ("compound", ["5", "1000", "-inf", ""], "0"),
            ("compound", ["5", "-inf", "-86400", ""], "0"),
            ("share", ["1", "Infinity", "0", "0"], "0"),
            ("share", ["1", "-inf", "0", "0"], "0"),
            ("share", ["1000", "3", "2500", "-inf"], "0"),
        ];
        for (operation, [a, b, c, d], expected) in finite {
            let hex = match operation {
                "compound" => calc().compound_yield_str(a, b, c),
                _ => calc().share_price_str(a, b, c, d),
            };
            assert_eq!(
                hex.unwrap().as_str(),
                word(expected),
                "{operation}({a}, {b}, {c}, {d})"
            );
        }

        let not_finite: YieldResult<EncodedHex> = Err(YieldError::Unknown(NumericError::NotFinite));
        assert_eq!(calc().compound_yield_str("inf", "0", "0"), not_finite);
        assert_eq!(calc().compound_yield_str("5", "-1000", "-inf"), not_finite);
        assert_eq!(calc().compound_yield_str("5", "-1000000", "-86400"), not_finite);
        assert_eq!(calc().linear_yield_str("5", "inf", "1"), not_finite);
        assert!(matches!(
            calc().compound_yield_str("5", "nan", "0"),
            Err(YieldError::InvalidNumber { argument: "rate_ppm", .. })
        ));
    }

    #[test]
    fn test_negative_result_encodes_magnitude() {
        assert_eq!(
            calc().linear_yield_str("-1000", "0", "0").unwrap().as_str(),
            word("3e8")
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            calc().compound_yield_str("abc", "100", "86400"),
            Err(YieldError::InvalidNumber {
                argument: "principal",
                value: "abc".to_string(),
            })
        );
        assert!(matches!(
            calc().linear_yield_str("1", "1", "1.2.3"),
            Err(YieldError::InvalidNumber {
                argument: "time_seconds",
                ..
            })
        ));
        assert!(matches!(
            calc().share_price_str("1", "2", "NaN", "1"),
            Err(YieldError::InvalidNumber {
                argument: "rate_ppm",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_rate_and_zero_time_keep_principal() {
        let principal = "987654321987654321.75";
        let expected = word("db4da5f7ef412b1");
        assert_eq!(
            calc().compound_yield_str(principal, "0", "123456").unwrap().as_str(),
            expected
        );
        assert_eq!(
            calc().linear_yield_str(principal, "0", "123456").unwrap().as_str(),
            expected
        );
        assert_eq!(
            calc().compound_yield_str(principal, "777", "0").unwrap().as_str(),
            expected
        );
    }

    #[test]
    fn test_wider_than_word() {
        let hex = calc().compound_yield_str("1e80", "0", "0").unwrap();
        assert!(!hex.is_word_sized());
        assert_eq!(
            hex.as_str(),
            "0x35f9dea3e1f6bdfef70cdd17b25efa418ca63a22764cec100000000000000000000"
        );
    }

    #[test]
    fn test_custom_precision_changes_rounding() {
        let narrow = YieldCalculator::new(DecimalContext::with_precision(10).unwrap());
        assert_eq!(narrow.context().precision(), 10);
        // 10^18 is exact at any precision, 10^18 + 1 is not at 10 digits
        let hex = narrow.linear_yield_str("1000000000000000001", "0", "0").unwrap();
        assert_eq!(hex.as_str(), word("de0b6b3a7640000"));
        let hex = calc().linear_yield_str("1000000000000000001", "0", "0").unwrap();
        assert_eq!(hex.as_str(), word("de0b6b3a7640001"));
    }
}
