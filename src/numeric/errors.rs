// ============================================================================
// Numeric Errors
// Error types for arbitrary-precision decimal operations
// ============================================================================

use thiserror::Error;

/// Errors that can occur during decimal parsing and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NumericError {
    /// Input string is not a decimal literal
    #[error("invalid number: could not parse decimal literal")]
    InvalidNumber,
    /// Attempted division of a non-zero value by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Operation has no defined result (e.g. 0/0, 0^0)
    #[error("invalid operation: result is undefined")]
    InvalidOperation,
    /// Fractional power of a negative base
    #[error("domain error: fractional power of a negative base")]
    ArithmeticDomain,
    /// Result exceeded the representable range
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// An infinite value has no integer representation
    #[error("value is not finite")]
    NotFinite,
    /// Context precision outside the supported range
    #[error("invalid precision: must be between 1 and {max} digits", max = super::MAX_PRECISION)]
    InvalidPrecision,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
