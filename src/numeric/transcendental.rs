// ============================================================================
// Transcendental Functions
// Correctly rounded ln, exp and power over PreciseDecimal
// ============================================================================
//
// Every function computes at the target precision plus GUARD_DIGITS using
// rounded PreciseDecimal operations, then rounds once to the target.
//
// pow() follows the decimal power algorithm used by on-chain reference
// scripts:
// - integral exponents: left-to-right binary exponentiation with
//   `precision + exponent digits + 2` working digits
// - fractional exponents: exp(ln(base) × y) with ln and the product rounded
//   to `max(base digits, precision) + 23` digits

use super::context::DecimalContext;
use super::errors::{NumericError, NumericResult};
use super::precise_decimal::PreciseDecimal;
use num_bigint::BigUint;

/// Extra digits carried through series evaluation.
const GUARD_DIGITS: u32 = 25;

/// Extra digits of the ln/multiply stage in a fractional power.
const REAL_POWER_EXTRA_DIGITS: u32 = 23;

/// Number of halvings applied before the exp Taylor series.
const EXP_HALVINGS: u32 = 10;

/// Integral exponents with more digits than this go through exp(ln(base) × y).
const MAX_EXPONENT_DIGITS: u32 = 400;

fn literal(coefficient: u64, exponent: i64) -> PreciseDecimal {
    PreciseDecimal::from_parts(false, BigUint::from(coefficient), exponent)
}

/// True once `term` no longer affects `sum` at the working precision.
fn negligible(term: &PreciseDecimal, sum: &PreciseDecimal, work: &DecimalContext) -> bool {
    term.is_zero()
        || term.adjusted_exponent() < sum.adjusted_exponent() - i64::from(work.precision()) - 1
}

// ============================================================================
// Natural Logarithm
// ============================================================================

/// atanh(z) = z + z³/3 + z⁵/5 + ...
fn atanh_series(z: &PreciseDecimal, work: &DecimalContext) -> NumericResult<PreciseDecimal> {
    if z.is_zero() {
        return Ok(PreciseDecimal::zero());
    }
    let z_squared = z.checked_mul(z, work)?;
    let mut power = z.clone();
    let mut sum = z.clone();
    let mut denominator = 1u64;
    loop {
        power = power.checked_mul(&z_squared, work)?;
        denominator += 2;
        let term = power.checked_div(&PreciseDecimal::from_u64(denominator), work)?;
        if negligible(&term, &sum, work) {
            break;
        }
        sum = sum.checked_add(&term, work)?;
    }
    Ok(sum)
}

/// ln(m) = 2·atanh((m - 1) / (m + 1)), for m near 1.
fn ln_near_one(m: &PreciseDecimal, work: &DecimalContext) -> NumericResult<PreciseDecimal> {
    let one = PreciseDecimal::one();
    let wide = work.widened(work.precision() + 2);
    let z = m
        .checked_sub(&one, &wide)?
        .checked_div(&m.checked_add(&one, &wide)?, work)?;
    atanh_series(&z, work)?.checked_mul(&literal(2, 0), work)
}

/// ln 2 = 2·atanh(1/3)
fn ln_two(work: &DecimalContext) -> NumericResult<PreciseDecimal> {
    let z = PreciseDecimal::one().checked_div(&literal(3, 0), work)?;
    atanh_series(&z, work)?.checked_mul(&literal(2, 0), work)
}

/// ln 10 = 3·ln 2 + 2·atanh(1/9)
fn ln_ten(work: &DecimalContext) -> NumericResult<PreciseDecimal> {
    let z = PreciseDecimal::one().checked_div(&literal(9, 0), work)?;
    let quarter = atanh_series(&z, work)?.checked_mul(&literal(2, 0), work)?;
    ln_two(work)?
        .checked_mul(&literal(3, 0), work)?
        .checked_add(&quarter, work)
}

/// Natural logarithm, correctly rounded to the context precision.
///
/// # Errors
/// Returns `InvalidOperation` for zero or negative arguments.
pub fn ln(x: &PreciseDecimal, ctx: &DecimalContext) -> NumericResult<PreciseDecimal> {
    if x.is_zero() || x.is_negative() {
        return Err(NumericError::InvalidOperation);
    }
    if x.is_infinite() {
        return Ok(x.clone());
    }
    if *x == PreciseDecimal::one() {
        return Ok(PreciseDecimal::zero());
    }

    let work = ctx.widened(ctx.precision() + GUARD_DIGITS);

    // x = m · 10^decade, m in [0.316, 3.16)
    let mut decade = x.adjusted_exponent();
    let mut m = PreciseDecimal::from_parts(false, x.coefficient().clone(), 1 - i64::from(x.digits()));
    if m >= literal(316, -2) {
        m = PreciseDecimal::from_parts(false, m.coefficient().clone(), m.exponent() - 1);
        decade += 1;
    }

    // m = m' · 2^octave, m' in [0.7, 1.42)
    let mut octave: i64 = 0;
    while m >= literal(142, -2) {
        m = m.scale_exact(5, -1);
        octave += 1;
    }
    while m < literal(7, -1) {
        m = m.scale_exact(2, 0);
        octave -= 1;
    }

    let mut sum = ln_near_one(&m, &work)?;
    if octave != 0 || decade != 0 {
        let constants = work.widened(work.precision() + 20);
        if octave != 0 {
            let shift = PreciseDecimal::from_i64(octave).checked_mul(&ln_two(&constants)?, &constants)?;
            sum = sum.checked_add(&shift, &work)?;
        }
        if decade != 0 {
            let shift = PreciseDecimal::from_i64(decade).checked_mul(&ln_ten(&constants)?, &constants)?;
            sum = sum.checked_add(&shift, &work)?;
        }
    }
    sum.round(ctx)
}

// ============================================================================
// Exponential
// ============================================================================

/// Exponential, correctly rounded to the context precision.
///
/// # Errors
/// Returns `Overflow` when the result exceeds `emax`. Results below the
/// subnormal range are zero; exp(∞) is ∞ and exp(-∞) is zero.
pub fn exp(x: &PreciseDecimal, ctx: &DecimalContext) -> NumericResult<PreciseDecimal> {
    if x.is_zero() {
        return Ok(PreciseDecimal::one());
    }
    if x.is_infinite() {
        return Ok(if x.is_negative() {
            PreciseDecimal::zero()
        } else {
            x.clone()
        });
    }
    // |x| >= 10^8 is far outside the exponent range
    if x.adjusted_exponent() >= 8 {
        return if x.is_negative() {
            Ok(PreciseDecimal::zero())
        } else {
            Err(NumericError::Overflow)
        };
    }

    let work = ctx.widened(ctx.precision() + GUARD_DIGITS);
    let reduction = work.widened(work.precision() + 12);

    // exp(x) = exp(r) · 10^decades, |r| <= ln(10)/2
    let ln10 = ln_ten(&reduction.widened(reduction.precision() + 4))?;
    let decades = x
        .checked_div(&ln10, &reduction)?
        .round_integral()
        .to_i64()?;
    if decades > ctx.emax() + 1 {
        return Err(NumericError::Overflow);
    }
    if decades < ctx.emin() - i64::from(ctx.precision()) - 1 {
        return Ok(PreciseDecimal::zero());
    }
    let remainder = x.checked_sub(
        &PreciseDecimal::from_i64(decades).checked_mul(&ln10, &reduction)?,
        &reduction,
    )?;

    // exp(r) = exp(r / 2^10)^(2^10); 1/1024 = 0.0009765625 exactly
    let scaled = remainder.checked_mul(&literal(9_765_625, -10), &work)?;
    let mut sum = PreciseDecimal::one();
    let mut term = PreciseDecimal::one();
    let mut n = 0u64;
    loop {
        n += 1;
        term = term
            .checked_mul(&scaled, &work)?
            .checked_div(&PreciseDecimal::from_u64(n), &work)?;
        if negligible(&term, &sum, &work) {
            break;
        }
        sum = sum.checked_add(&term, &work)?;
    }
    for _ in 0..EXP_HALVINGS {
        sum = sum.checked_mul(&sum, &work)?;
    }

    PreciseDecimal::from_parts(false, sum.coefficient().clone(), sum.exponent() + decades).round(ctx)
}

// ============================================================================
// Power
// ============================================================================

/// `base ^ exponent`, rounded to the context precision.
///
/// Infinite operands follow the usual decimal rules: `1 ^ ±∞` is 1, a base
/// above one raised to `+∞` is `+∞`, below one it is zero, and an infinite
/// base yields `±∞` or zero depending on the sign of the exponent.
///
/// # Errors
/// - `InvalidOperation` for `0 ^ 0`
/// - `ArithmeticDomain` for a negative base with a non-integral exponent
/// - `Overflow` when the result exceeds `emax`
///
/// # Example
/// ```
/// use yield_oracle::numeric::{pow, DecimalContext, PreciseDecimal};
///
/// let ctx = DecimalContext::default();
/// let base: PreciseDecimal = "1.5".parse().unwrap();
/// let squared = pow(&base, &"2".parse().unwrap(), &ctx).unwrap();
/// assert_eq!(squared, "2.25".parse().unwrap());
/// ```
pub fn pow(
    base: &PreciseDecimal,
    exponent: &PreciseDecimal,
    ctx: &DecimalContext,
) -> NumericResult<PreciseDecimal> {
    let integral = exponent.is_integer();
    let negative = base.is_negative() && exponent.is_odd_integer();
    let signed = |value: PreciseDecimal| if negative { -value } else { value };

    if base.is_zero() {
        return if exponent.is_zero() {
            Err(NumericError::InvalidOperation)
        } else if exponent.is_negative() {
            Ok(PreciseDecimal::infinity(negative))
        } else {
            Ok(PreciseDecimal::zero())
        };
    }
    if base.is_negative() && !integral {
        return Err(NumericError::ArithmeticDomain);
    }
    if exponent.is_infinite() {
        let one = PreciseDecimal::one();
        if *base == one {
            return Ok(one);
        }
        let grows = (*base > one) != exponent.is_negative();
        return Ok(if grows {
            PreciseDecimal::infinity(false)
        } else {
            PreciseDecimal::zero()
        });
    }
    if base.is_infinite() {
        return Ok(if exponent.is_zero() {
            PreciseDecimal::one()
        } else if exponent.is_negative() {
            PreciseDecimal::zero()
        } else {
            signed(PreciseDecimal::infinity(false))
        });
    }
    if exponent.is_zero() || *base == PreciseDecimal::one() {
        return Ok(PreciseDecimal::one());
    }

    if integral {
        integer_power(base, exponent, negative, ctx)
    } else {
        real_power(base, exponent, ctx)
    }
}

fn integer_power(
    base: &PreciseDecimal,
    exponent: &PreciseDecimal,
    negative: bool,
    ctx: &DecimalContext,
) -> NumericResult<PreciseDecimal> {
    let magnitude = base.abs();
    let exponent_digits = exponent.adjusted_exponent() + 1;
    if exponent_digits > i64::from(MAX_EXPONENT_DIGITS) {
        return saturated_power(&magnitude, exponent, negative, ctx);
    }
    let count = exponent.trunc_magnitude()?;

    let mut work = ctx.widened(ctx.precision() + exponent_digits as u32 + 2);
    let factor = if exponent.is_negative() {
        work = work.widened(work.precision() + 1);
        PreciseDecimal::one().checked_div(&magnitude, &work)?
    } else {
        magnitude
    };

    let mut result = factor.clone();
    for bit in (0..count.bits() - 1).rev() {
        result = result.checked_mul(&result, &work)?;
        if count.bit(bit) {
            result = result.checked_mul(&factor, &work)?;
        }
        if result.is_zero() {
            break;
        }
    }

    let result = result.round(ctx)?;
    Ok(if negative { -result } else { result })
}

/// Power with an exponent too large to iterate. Unless the base is within a
/// few ulps of one the result leaves the exponent range.
fn saturated_power(
    magnitude: &PreciseDecimal,
    exponent: &PreciseDecimal,
    negative: bool,
    ctx: &DecimalContext,
) -> NumericResult<PreciseDecimal> {
    let grows = (*magnitude > PreciseDecimal::one()) != exponent.is_negative();
    let result = match real_power(magnitude, exponent, ctx) {
        // ln(base) × y itself left the range
        Err(NumericError::Overflow) if !grows => PreciseDecimal::zero(),
        other => other?,
    };
    Ok(if negative { -result } else { result })
}

fn real_power(
    base: &PreciseDecimal,
    exponent: &PreciseDecimal,
    ctx: &DecimalContext,
) -> NumericResult<PreciseDecimal> {
    let work = ctx.widened(base.digits().max(ctx.precision()) + REAL_POWER_EXTRA_DIGITS);
    let log = ln(base, &work)?;
    let scaled = log.checked_mul(exponent, &work)?;
    exp(&scaled, ctx)
}

// ============================================================================
// Tests
// ============================================================================
