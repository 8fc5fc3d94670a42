//! Price denomination.
//!
//! Chain amounts are integers in the currency's smallest unit; the UI
//! shows whole coins. Conversion happens exactly once, at the display
//! boundary, in exact base-10 decimal arithmetic — amounts are never
//! summed or compared as floats, and round-tripping an amount through
//! the display form reconstructs it bit-for-bit.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Base units per display coin.
pub const BASE_UNITS_PER_COIN: u64 = 1_000_000_000;

/// Convert a base-unit amount to its display denomination.
pub fn to_display(base_units: u64) -> Decimal {
    Decimal::from(base_units) / Decimal::from(BASE_UNITS_PER_COIN)
}

/// Convert a display-denominated amount back to base units.
///
/// Returns `None` for negative amounts, amounts with a sub-unit
/// remainder, and amounts past `u64::MAX`. There is no rounding path.
pub fn to_base(display: Decimal) -> Option<u64> {
    let scaled = display.checked_mul(Decimal::from(BASE_UNITS_PER_COIN))?;
    if scaled.is_sign_negative() || !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_u64()
}
