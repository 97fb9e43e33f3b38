// ============================================================================
// Yield Oracle Library
// Deterministic interest-bearing pool figures as 256-bit hex words
// ============================================================================

//! # Yield Oracle
//!
//! Computes compound yield, linear yield and vault share prices with
//! 50-digit decimal arithmetic (round half-even) and renders the truncated
//! integer result as a `0x`-prefixed, 64-digit lowercase hex word, ready to
//! be compared against on-chain fixed-point math.
//!
//! ## Features
//!
//! - **Arbitrary-precision decimals** with exact literal parsing
//! - **Correctly rounded `ln`, `exp` and `pow`** for fractional day counts
//! - **Fixed-width hex output** with a single `0x0` failure sentinel
//!
//! ## Example
//!
//! ```rust
//! use yield_oracle::prelude::*;
//!
//! let calc = YieldCalculator::default();
//!
//! // one day at 5000 ppm on 1e18
//! let hex = calc
//!     .compound_yield_str("1000000000000000000", "5000", "86400")
//!     .unwrap();
//! assert_eq!(
//!     hex.as_str(),
//!     "0x0000000000000000000000000000000000000000000000000df27a2cdf448000"
//! );
//!
//! // a total supply of "0" prices shares 1:1
//! let price = calc.share_price_str("0", "0", "5000", "86400").unwrap();
//! assert_eq!(price.digits().trim_start_matches('0'), "de0b6b3a7640000");
//! ```

pub mod cli;
pub mod encoding;
pub mod numeric;
pub mod yields;

// Re-exports for convenience
pub mod prelude {
    pub use crate::encoding::{EncodedHex, HexEncoder};
    pub use crate::numeric::{DecimalContext, NumericError, PreciseDecimal};
    pub use crate::yields::{YieldCalculator, YieldError, YieldResult};
}
