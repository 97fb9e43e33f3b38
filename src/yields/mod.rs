// ============================================================================
// Yields Module
// Interest-bearing pool figures: compound yield, linear yield, share price
// ============================================================================

mod calculator;
mod error;

pub use calculator::{YieldCalculator, PPM_DENOMINATOR, SECONDS_PER_DAY, SHARE_PRICE_SCALE};
pub use error::{YieldError, YieldResult};
