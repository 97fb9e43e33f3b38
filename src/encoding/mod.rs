// ============================================================================
// Encoding Module
// Output formats for computed figures
// ============================================================================

mod hex;

pub use hex::{EncodedHex, HexEncoder};
