// ============================================================================
// Yield Errors
// Failure taxonomy surfaced by the calculator and the CLI boundary
// ============================================================================

use crate::numeric::NumericError;
use thiserror::Error;

/// Errors that can occur while computing a yield figure.
///
/// The CLI maps every variant to the same `0x0` sentinel; the variants exist
/// for library callers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YieldError {
    /// Missing command, wrong argument count or unknown command
    #[error("usage error: {0}")]
    Usage(String),

    /// An argument is not a decimal literal
    #[error("invalid number for {argument}: {value:?}")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },

    /// Fractional power of a negative base (daily rate below -100%)
    #[error("arithmetic domain error: fractional power of a negative base")]
    ArithmeticDomain,

    /// Any other arithmetic failure
    #[error("computation failed: {0}")]
    Unknown(NumericError),
}

impl YieldError {
    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            YieldError::Usage(_) => "usage",
            YieldError::InvalidNumber { .. } => "invalid_number",
            YieldError::ArithmeticDomain => "arithmetic_domain",
            YieldError::Unknown(_) => "unknown",
        }
    }
}

impl From<NumericError> for YieldError {
    fn from(err: NumericError) -> Self {
        match err {
            NumericError::ArithmeticDomain => YieldError::ArithmeticDomain,
            other => YieldError::Unknown(other),
        }
    }
}

/// Result type alias for yield computations
pub type YieldResult<T> = Result<T, YieldError>;
