// ============================================================================
// Decimal Context
// Precision and rounding parameters for rounded decimal arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of significant digits retained by every rounded operation.
pub const DEFAULT_PRECISION: u32 = 50;

/// Largest precision a context may be configured with.
pub const MAX_PRECISION: u32 = 200;

/// Rounding applied when a result has more digits than the context allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Round to nearest, ties to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
}

/// Arithmetic context passed explicitly to every rounded operation.
///
/// Replaces a process-wide precision setting: two calculators with different
/// contexts never observe each other.
///
/// # Example
/// ```
/// use yield_oracle::numeric::DecimalContext;
///
/// let ctx = DecimalContext::default();
/// assert_eq!(ctx.precision(), 50);
///
/// let wide = DecimalContext::with_precision(80).unwrap();
/// assert_eq!(wide.precision(), 80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimalContext {
    precision: u32,
    rounding: RoundingMode,
    emax: i64,
    emin: i64,
}

impl DecimalContext {
    /// Largest adjusted exponent a finite result may carry
    pub const EMAX: i64 = 999_999;

    /// Smallest adjusted exponent of a normal result
    pub const EMIN: i64 = -999_999;

    /// Create a context with the given number of significant digits.
    ///
    /// # Errors
    /// Returns `InvalidPrecision` when `precision` is zero or above
    /// [`MAX_PRECISION`].
    pub fn with_precision(precision: u32) -> NumericResult<Self> {
        if precision == 0 || precision > MAX_PRECISION {
            return Err(NumericError::InvalidPrecision);
        }
        Ok(Self {
            precision,
            ..Self::default()
        })
    }

    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    #[inline]
    pub const fn emax(&self) -> i64 {
        self.emax
    }

    #[inline]
    pub const fn emin(&self) -> i64 {
        self.emin
    }

    /// Same bounds with a different precision, used for internal working
    /// precision. Not range-checked.
    pub(crate) const fn widened(&self, precision: u32) -> Self {
        Self {
            precision,
            rounding: self.rounding,
            emax: self.emax,
            emin: self.emin,
        }
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            rounding: RoundingMode::HalfEven,
            emax: Self::EMAX,
            emin: Self::EMIN,
        }
    }
}
