// ============================================================================
// Precise Decimal
// Arbitrary-precision decimal with context-rounded arithmetic
// ============================================================================

use super::context::DecimalContext;
use super::errors::{NumericError, NumericResult};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use std::sync::OnceLock;

/// Largest adjusted exponent a decimal literal may carry.
pub const LITERAL_EMAX: i64 = 999_999_999_999_999_999;

/// Smallest exponent a decimal literal may carry.
pub const LITERAL_ETINY: i64 = -1_999_999_999_999_999_997;

/// Powers of ten kept in the lookup table.
const POW10_CACHED: u32 = 512;

// ============================================================================
// Coefficient Helpers
// ============================================================================

/// 10^n
pub(crate) fn pow10(n: u32) -> BigUint {
    static TABLE: OnceLock<Vec<BigUint>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        let ten = BigUint::from(10u32);
        let mut table = Vec::with_capacity(POW10_CACHED as usize);
        let mut current = BigUint::one();
        for _ in 0..POW10_CACHED {
            let next = &current * &ten;
            table.push(current);
            current = next;
        }
        table
    });
    match table.get(n as usize) {
        Some(power) => power.clone(),
        None => BigUint::from(10u32).pow(n),
    }
}

/// Number of decimal digits in `value` (zero has one digit).
pub(crate) fn digit_count(value: &BigUint) -> u32 {
    let bits = value.bits();
    if bits == 0 {
        return 1;
    }
    // 2^(bits-1) <= value, and 0.30102 < log10(2)
    let mut digits = ((bits - 1) * 30_102 / 100_000) as u32 + 1;
    while *value >= pow10(digits) {
        digits += 1;
    }
    digits
}

/// `value / 10^places`, rounded half-even.
fn shift_right_half_even(value: BigUint, places: u32) -> BigUint {
    if places == 0 {
        return value;
    }
    if places > digit_count(&value) {
        return BigUint::zero();
    }
    let divisor = pow10(places);
    let (quotient, remainder) = value.div_rem(&divisor);
    let round_up = match (remainder * 2u32).cmp(&divisor) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => quotient.is_odd(),
    };
    if round_up {
        quotient + 1u32
    } else {
        quotient
    }
}

/// Round a coefficient to `precision` digits, adjusting the exponent.
fn round_coefficient(coefficient: BigUint, exponent: i64, precision: u32) -> (BigUint, i64) {
    let digits = digit_count(&coefficient);
    if digits <= precision {
        return (coefficient, exponent);
    }
    let dropped = digits - precision;
    let mut rounded = shift_right_half_even(coefficient, dropped);
    let mut exponent = exponent + i64::from(dropped);
    // 99..9 rounded up gained a digit
    if rounded == pow10(precision) {
        rounded = pow10(precision - 1);
        exponent += 1;
    }
    (rounded, exponent)
}

/// Remove trailing zeros while the exponent is below `ideal`.
fn strip_trailing_zeros(mut coefficient: BigUint, mut exponent: i64, ideal: i64) -> (BigUint, i64) {
    let ten = BigUint::from(10u32);
    while exponent < ideal && !coefficient.is_zero() {
        let (quotient, remainder) = coefficient.div_rem(&ten);
        if !remainder.is_zero() {
            return (quotient * 10u32 + remainder, exponent);
        }
        coefficient = quotient;
        exponent += 1;
    }
    (coefficient, exponent)
}

// ============================================================================
// Precise Decimal
// ============================================================================

/// Signed decimal number `(-1)^negative × coefficient × 10^exponent`, or a
/// signed infinity.
///
/// Construction from a literal is exact and the coefficient is unbounded.
/// Arithmetic goes through a [`DecimalContext`]: every result is the exact
/// result correctly rounded (half-even) to the context precision, so chains
/// of operations behave the same way on every platform.
///
/// Equality and ordering are numeric: `1.0 == 1.00`.
///
/// # Example
/// ```
/// use yield_oracle::numeric::{DecimalContext, PreciseDecimal};
///
/// let ctx = DecimalContext::default();
/// let rate: PreciseDecimal = "5000".parse().unwrap();
/// let million: PreciseDecimal = "1000000".parse().unwrap();
///
/// let daily = rate.checked_div(&million, &ctx).unwrap();
/// assert_eq!(daily.to_string(), "0.005");
/// ```
#[derive(Clone)]
pub struct PreciseDecimal {
    negative: bool,
    coefficient: BigUint,
    exponent: i64,
    infinite: bool,
}

impl PreciseDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    #[inline]
    pub fn zero() -> Self {
        Self::from_parts(false, BigUint::zero(), 0)
    }

    #[inline]
    pub fn one() -> Self {
        Self::from_parts(false, BigUint::one(), 0)
    }

    /// Positive or negative infinity.
    #[inline]
    pub fn infinity(negative: bool) -> Self {
        Self {
            negative,
            coefficient: BigUint::zero(),
            exponent: 0,
            infinite: true,
        }
    }

    /// Create from sign, coefficient and exponent. Exact.
    #[inline]
    pub fn from_parts(negative: bool, coefficient: BigUint, exponent: i64) -> Self {
        Self {
            negative,
            coefficient,
            exponent,
            infinite: false,
        }
    }

    #[inline]
    pub fn from_u64(value: u64) -> Self {
        Self::from_parts(false, BigUint::from(value), 0)
    }

    #[inline]
    pub fn from_i64(value: i64) -> Self {
        Self::from_parts(value < 0, BigUint::from(value.unsigned_abs()), 0)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn coefficient(&self) -> &BigUint {
        &self.coefficient
    }

    #[inline]
    pub const fn exponent(&self) -> i64 {
        self.exponent
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.infinite && self.coefficient.is_zero()
    }

    #[inline]
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// True for values strictly below zero, including negative infinity.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Number of digits in the coefficient.
    #[inline]
    pub fn digits(&self) -> u32 {
        digit_count(&self.coefficient)
    }

    /// Exponent of the most significant digit.
    #[inline]
    pub fn adjusted_exponent(&self) -> i64 {
        self.exponent + i64::from(self.digits()) - 1
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    /// True when the value is finite and has no fractional part.
    pub fn is_integer(&self) -> bool {
        if self.infinite {
            return false;
        }
        if self.exponent >= 0 || self.is_zero() {
            return true;
        }
        let places = self.exponent.unsigned_abs();
        if places >= u64::from(self.digits()) {
            return false;
        }
        (&self.coefficient % pow10(places as u32)).is_zero()
    }

    /// True when the value is an odd integer.
    pub(crate) fn is_odd_integer(&self) -> bool {
        // a positive exponent makes the integer a multiple of ten
        if !self.is_integer() || self.exponent > 0 {
            return false;
        }
        self.trunc_magnitude()
            .map(|magnitude| magnitude.is_odd())
            .unwrap_or(false)
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    /// Apply context precision and exponent bounds to an exact result.
    fn finalize(
        negative: bool,
        coefficient: BigUint,
        exponent: i64,
        ctx: &DecimalContext,
    ) -> NumericResult<Self> {
        let (coefficient, exponent) = round_coefficient(coefficient, exponent, ctx.precision());
        if coefficient.is_zero() {
            return Ok(Self::zero());
        }
        let value = Self::from_parts(negative, coefficient, exponent);
        let adjusted = value.adjusted_exponent();
        if adjusted > ctx.emax() {
            return Err(NumericError::Overflow);
        }
        // below the subnormal range everything rounds to zero
        if adjusted < ctx.emin() - i64::from(ctx.precision()) {
            return Ok(Self::zero());
        }
        Ok(value)
    }

    /// Round to the context precision. Infinities are returned unchanged.
    ///
    /// # Errors
    /// Returns `Overflow` when the adjusted exponent exceeds `emax`.
    pub fn round(&self, ctx: &DecimalContext) -> NumericResult<Self> {
        if self.infinite {
            return Ok(self.clone());
        }
        Self::finalize(self.negative, self.coefficient.clone(), self.exponent, ctx)
    }

    /// Round half-even to an integer value.
    pub(crate) fn round_integral(&self) -> Self {
        if self.infinite || self.exponent >= 0 {
            return self.clone();
        }
        let places = u32::try_from(self.exponent.unsigned_abs()).unwrap_or(u32::MAX);
        let coefficient = shift_right_half_even(self.coefficient.clone(), places);
        Self::from_parts(self.negative, coefficient, 0)
    }

    /// Multiply the coefficient by a small factor and shift the exponent,
    /// without rounding.
    pub(crate) fn scale_exact(&self, factor: u32, exponent_shift: i64) -> Self {
        Self::from_parts(
            self.negative,
            &self.coefficient * factor,
            self.exponent + exponent_shift,
        )
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Rounded addition.
    ///
    /// # Errors
    /// - `InvalidOperation` for the sum of opposite infinities
    /// - `Overflow` if the rounded result exceeds `emax`
    pub fn checked_add(&self, rhs: &Self, ctx: &DecimalContext) -> NumericResult<Self> {
        if self.infinite || rhs.infinite {
            if self.infinite && rhs.infinite && self.negative != rhs.negative {
                return Err(NumericError::InvalidOperation);
            }
            return Ok(if self.infinite { self.clone() } else { rhs.clone() });
        }
        if self.is_zero() {
            return rhs.round(ctx);
        }
        if rhs.is_zero() {
            return self.round(ctx);
        }

        let (high, low) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };

        // An addend entirely below the rounding position only matters as a
        // sticky digit; collapse it so the aligned sum stays small.
        let high_digits = i64::from(high.digits());
        let floor = high.exponent + (high_digits - i64::from(ctx.precision()) - 2).min(-1);
        let (low_coefficient, low_exponent) = if low.adjusted_exponent() < floor {
            (BigUint::one(), floor)
        } else {
            (low.coefficient.clone(), low.exponent)
        };

        let shift = u32::try_from(high.exponent - low_exponent).map_err(|_| NumericError::Overflow)?;
        let aligned = &high.coefficient * pow10(shift);

        let (negative, coefficient) = if high.negative == low.negative {
            (high.negative, aligned + low_coefficient)
        } else if aligned >= low_coefficient {
            (high.negative, aligned - low_coefficient)
        } else {
            (low.negative, low_coefficient - aligned)
        };

        Self::finalize(negative, coefficient, low_exponent, ctx)
    }

    /// Rounded subtraction.
    #[inline]
    pub fn checked_sub(&self, rhs: &Self, ctx: &DecimalContext) -> NumericResult<Self> {
        self.checked_add(&-rhs.clone(), ctx)
    }

    /// Rounded multiplication.
    ///
    /// # Errors
    /// - `InvalidOperation` for infinity times zero
    /// - `Overflow` if the rounded result exceeds `emax`
    pub fn checked_mul(&self, rhs: &Self, ctx: &DecimalContext) -> NumericResult<Self> {
        let negative = self.negative != rhs.negative;
        if self.infinite || rhs.infinite {
            if self.is_zero() || rhs.is_zero() {
                return Err(NumericError::InvalidOperation);
            }
            return Ok(Self::infinity(negative));
        }
        let exponent = self
            .exponent
            .checked_add(rhs.exponent)
            .ok_or(NumericError::Overflow)?;
        Self::finalize(negative, &self.coefficient * &rhs.coefficient, exponent, ctx)
    }

    /// Rounded division.
    ///
    /// The quotient is computed to one digit beyond the context precision
    /// plus a sticky digit for any non-zero remainder, then rounded once.
    /// Exact quotients drop trailing zeros down to `lhs.exponent - rhs.exponent`.
    /// Infinity divided by any finite value (zero included) is infinite, and
    /// a finite value divided by infinity is zero.
    ///
    /// # Errors
    /// - `DivisionByZero` for a finite non-zero dividend and zero divisor
    /// - `InvalidOperation` for `0 / 0` and `∞ / ∞`
    /// - `Overflow` if the rounded result exceeds `emax`
    pub fn checked_div(&self, rhs: &Self, ctx: &DecimalContext) -> NumericResult<Self> {
        let negative = self.negative != rhs.negative;
        match (self.infinite, rhs.infinite) {
            (true, true) => return Err(NumericError::InvalidOperation),
            (true, false) => return Ok(Self::infinity(negative)),
            (false, true) => return Ok(Self::zero()),
            (false, false) => {},
        }
        if rhs.is_zero() {
            return Err(if self.is_zero() {
                NumericError::InvalidOperation
            } else {
                NumericError::DivisionByZero
            });
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        let shift =
            i64::from(rhs.digits()) - i64::from(self.digits()) + i64::from(ctx.precision()) + 1;
        let places = u32::try_from(shift.unsigned_abs()).map_err(|_| NumericError::Overflow)?;
        let (numerator, denominator) = if shift >= 0 {
            (&self.coefficient * pow10(places), rhs.coefficient.clone())
        } else {
            (self.coefficient.clone(), &rhs.coefficient * pow10(places))
        };

        let (quotient, remainder) = numerator.div_rem(&denominator);
        let ideal_exponent = self
            .exponent
            .checked_sub(rhs.exponent)
            .ok_or(NumericError::Overflow)?;
        let (coefficient, exponent) = if remainder.is_zero() {
            strip_trailing_zeros(quotient, ideal_exponent - shift, ideal_exponent)
        } else {
            (quotient * 10u32 + 1u32, ideal_exponent - shift - 1)
        };

        Self::finalize(negative, coefficient, exponent, ctx)
    }

    // ========================================================================
    // Integer Conversion
    // ========================================================================

    /// Truncate toward zero and return the magnitude of the integer part.
    ///
    /// # Errors
    /// - `NotFinite` for infinities
    /// - `Overflow` when the integer would have more than `u32::MAX` digits
    pub fn trunc_magnitude(&self) -> NumericResult<BigUint> {
        if self.infinite {
            return Err(NumericError::NotFinite);
        }
        if self.is_zero() {
            return Ok(BigUint::zero());
        }
        if self.exponent >= 0 {
            let places = u32::try_from(self.exponent).map_err(|_| NumericError::Overflow)?;
            return Ok(&self.coefficient * pow10(places));
        }
        let places = self.exponent.unsigned_abs();
        if places >= u64::from(self.digits()) {
            return Ok(BigUint::zero());
        }
        Ok(&self.coefficient / pow10(places as u32))
    }

    /// Integer part as `i64`, truncated toward zero.
    pub(crate) fn to_i64(&self) -> NumericResult<i64> {
        if self.is_zero() {
            return Ok(0);
        }
        if !self.infinite && self.adjusted_exponent() > 18 {
            return Err(NumericError::Overflow);
        }
        let value = self
            .trunc_magnitude()?
            .to_i64()
            .ok_or(NumericError::Overflow)?;
        Ok(if self.is_negative() { -value } else { value })
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.infinite, other.infinite) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {},
        }
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {},
        }

        let adjusted = self.adjusted_exponent().cmp(&other.adjusted_exponent());
        if adjusted != Ordering::Equal {
            return adjusted;
        }

        // Same leading position: the shift is the difference in digit counts
        if self.exponent >= other.exponent {
            let shift = (self.exponent - other.exponent) as u32;
            (&self.coefficient * pow10(shift)).cmp(&other.coefficient)
        } else {
            let shift = (other.exponent - self.exponent) as u32;
            self.coefficient.cmp(&(&other.coefficient * pow10(shift)))
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for PreciseDecimal {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for PreciseDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PreciseDecimal {}

impl PartialOrd for PreciseDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreciseDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl Neg for PreciseDecimal {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            negative: !self.negative,
            ..self
        }
    }
}

impl From<u64> for PreciseDecimal {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<i64> for PreciseDecimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for PreciseDecimal {
    /// Plain notation for moderate exponents, scientific otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        if self.infinite {
            return write!(f, "{sign}Infinity");
        }

        let digits = self.coefficient.to_string();
        let len = digits.len() as i64;
        let adjusted = self.exponent + len - 1;

        if self.exponent <= 0 && adjusted >= -6 {
            if self.exponent == 0 {
                return write!(f, "{sign}{digits}");
            }
            let point = len + self.exponent;
            if point > 0 {
                let (int_part, frac_part) = digits.split_at(point as usize);
                write!(f, "{sign}{int_part}.{frac_part}")
            } else {
                let zeros = "0".repeat(point.unsigned_abs() as usize);
                write!(f, "{sign}0.{zeros}{digits}")
            }
        } else {
            let (lead, rest) = digits.split_at(1);
            let point = if rest.is_empty() { "" } else { "." };
            write!(f, "{sign}{lead}{point}{rest}E{adjusted:+}")
        }
    }
}

impl fmt::Debug for PreciseDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PreciseDecimal({}, coefficient={}, exponent={})",
            self, self.coefficient, self.exponent
        )
    }
}

// ============================================================================
// String Parsing
// ============================================================================

/// Append the digits of `part` to `out`, allowing single underscores
/// between digits.
fn push_digits(part: &str, out: &mut String) -> NumericResult<()> {
    let mut previous_digit = false;
    let mut pending_underscore = false;
    for ch in part.chars() {
        match ch {
            '0'..='9' => {
                out.push(ch);
                previous_digit = true;
                pending_underscore = false;
            },
            '_' if previous_digit && !pending_underscore => {
                pending_underscore = true;
            },
            _ => return Err(NumericError::InvalidNumber),
        }
    }
    if pending_underscore {
        return Err(NumericError::InvalidNumber);
    }
    Ok(())
}

fn parse_exponent(part: &str) -> NumericResult<i128> {
    let (negative, body) = match part.as_bytes().first() {
        Some(b'-') => (true, &part[1..]),
        Some(b'+') => (false, &part[1..]),
        _ => (false, part),
    };
    let mut digits = String::with_capacity(body.len());
    push_digits(body, &mut digits)?;
    if digits.is_empty() {
        return Err(NumericError::InvalidNumber);
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(0);
    }
    // far beyond either literal bound
    if trimmed.len() > 30 {
        return Err(NumericError::InvalidNumber);
    }
    let magnitude: i128 = trimmed.parse().map_err(|_| NumericError::InvalidNumber)?;
    Ok(if negative { -magnitude } else { magnitude })
}

impl FromStr for PreciseDecimal {
    type Err = NumericError;

    /// Parse a decimal literal exactly.
    ///
    /// # Examples
    /// - "123" -> 123
    /// - "-0.001" -> -0.001
    /// - " 1_000.5e3 " -> 1000500
    /// - "inf", "-Infinity" (any case) -> signed infinity
    /// - ".5" and "5." are accepted; "." and "1e" are not
    ///
    /// NaN literals are rejected. Finite literals must keep their adjusted
    /// exponent at or below [`LITERAL_EMAX`] and their exponent at or above
    /// [`LITERAL_ETINY`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (negative, body) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
            return Ok(Self::infinity(negative));
        }

        let (mantissa, exponent_part) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        let mut digits = String::with_capacity(mantissa.len());
        push_digits(int_part, &mut digits)?;
        let int_len = digits.len();
        push_digits(frac_part, &mut digits)?;
        if digits.is_empty() {
            return Err(NumericError::InvalidNumber);
        }
        let frac_len = (digits.len() - int_len) as i128;

        let exponent = match exponent_part {
            Some(part) => parse_exponent(part)?,
            None => 0,
        } - frac_len;

        let significant = digits.trim_start_matches('0');
        let top = if significant.is_empty() {
            exponent
        } else {
            exponent + significant.len() as i128 - 1
        };
        if top > i128::from(LITERAL_EMAX) || exponent < i128::from(LITERAL_ETINY) {
            return Err(NumericError::InvalidNumber);
        }
        let exponent = exponent as i64;

        let coefficient = if significant.is_empty() {
            BigUint::zero()
        } else {
            BigUint::parse_bytes(significant.as_bytes(), 10).ok_or(NumericError::InvalidNumber)?
        };

        Ok(Self::from_parts(negative, coefficient, exponent))
    }
}

// ============================================================================
// Conversion with rust_decimal (for API boundaries)
// ============================================================================

impl PreciseDecimal {
    /// Largest scale a `rust_decimal::Decimal` can carry
    const DECIMAL_MAX_SCALE: u32 = 28;

    /// Convert from rust_decimal::Decimal. Exact.
    pub fn from_decimal(d: rust_decimal::Decimal) -> Self {
        let mantissa = d.mantissa();
        Self::from_parts(
            mantissa < 0,
            BigUint::from(mantissa.unsigned_abs()),
            -i64::from(d.scale()),
        )
    }

    /// Convert to rust_decimal::Decimal, rounding to 28 significant digits.
    ///
    /// # Errors
    /// - `NotFinite` for infinities
    /// - `Overflow` if the magnitude exceeds `Decimal::MAX`
    pub fn to_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        if self.infinite {
            return Err(NumericError::NotFinite);
        }
        let ctx = DecimalContext::default().widened(Self::DECIMAL_MAX_SCALE);
        let rounded = self.round(&ctx)?;
        if rounded.is_zero() {
            return Ok(rust_decimal::Decimal::ZERO);
        }
        if rounded.adjusted_exponent() > i64::from(Self::DECIMAL_MAX_SCALE) {
            return Err(NumericError::Overflow);
        }

        let (mantissa, scale) = if rounded.exponent >= 0 {
            (&rounded.coefficient * pow10(rounded.exponent as u32), 0)
        } else {
            let scale = rounded.exponent.unsigned_abs();
            let max_scale = u64::from(Self::DECIMAL_MAX_SCALE);
            if scale > max_scale {
                let places = u32::try_from(scale - max_scale).unwrap_or(u32::MAX);
                (
                    shift_right_half_even(rounded.coefficient.clone(), places),
                    Self::DECIMAL_MAX_SCALE,
                )
            } else {
                (rounded.coefficient.clone(), scale as u32)
            }
        };

        let magnitude = mantissa
            .to_u128()
            .filter(|m| *m < (1u128 << 96))
            .ok_or(NumericError::Overflow)?;
        let signed = if rounded.negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        rust_decimal::Decimal::try_from_i128_with_scale(signed, scale)
            .map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// Tests
// ============================================================================
