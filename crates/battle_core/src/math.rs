//! Fixed-point multipliers for attack and defence bonuses.
//!
//! Bonus tables are authored as integer percentages and stored as
//! fixed-point multipliers, so that combat math layered on top of the
//! engine stays deterministic across platforms.

use fixed::types::I32F32;

/// Fixed-point number type for bonus multipliers.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Largest percentage a bonus table may hold.
pub const MAX_PERCENT: u32 = 0x7fff_ffff;

/// Slack added before flooring a scaled value. `from_percent` truncates to
/// the nearest representable multiplier below, so exact products such as
/// `100 * 120%` would otherwise land just under the integer.
const FLOOR_SLACK: Fixed = Fixed::from_bits(1 << 16);

/// Convert an integer percentage (100 = x1.0) into a multiplier.
///
/// Percentages above [`MAX_PERCENT`] saturate.
#[must_use]
pub fn from_percent(percent: u32) -> Fixed {
    Fixed::saturating_from_num(percent.min(MAX_PERCENT)) / Fixed::from_num(100)
}

/// Convert a multiplier back into the nearest whole percentage.
#[must_use]
pub fn to_percent(multiplier: Fixed) -> u32 {
    multiplier
        .saturating_mul(Fixed::from_num(100))
        .saturating_round()
        .saturating_to_num::<u32>()
}

/// Scale an integer value by a multiplier, rounding down.
///
/// Negative multipliers clamp to zero.
#[must_use]
pub fn scale(value: u32, multiplier: Fixed) -> u32 {
    let scaled = Fixed::saturating_from_num(value).saturating_mul(multiplier);
    if scaled <= Fixed::ZERO {
        0
    } else {
        scaled.saturating_add(FLOOR_SLACK).floor().to_num::<u32>()
    }
}

/// Divide an integer value by a multiplier, rounding down.
///
/// A zero or negative divisor leaves the value unchanged.
#[must_use]
pub fn divide(value: u32, divisor: Fixed) -> u32 {
    if divisor <= Fixed::ZERO {
        return value;
    }
    Fixed::saturating_from_num(value)
        .saturating_div(divisor)
        .floor()
        .to_num::<u32>()
}
