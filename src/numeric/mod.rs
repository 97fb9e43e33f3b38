// ============================================================================
// Numeric Module
// Arbitrary-precision decimal arithmetic for deterministic yield figures
// ============================================================================
//
// This module provides:
// - PreciseDecimal: exact decimal literals with context-rounded arithmetic
// - DecimalContext: precision and exponent bounds, passed explicitly
// - ln/exp/pow: correctly rounded transcendental functions
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - Every operation rounds once, half-even, to the context precision
// - No global configuration: the context travels with each call

mod context;
mod errors;
mod precise_decimal;
mod transcendental;

pub use context::{DecimalContext, RoundingMode, DEFAULT_PRECISION, MAX_PRECISION};
pub use errors::{NumericError, NumericResult};
pub use precise_decimal::{PreciseDecimal, LITERAL_EMAX, LITERAL_ETINY};
pub use transcendental::{exp, ln, pow};
