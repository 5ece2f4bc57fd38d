//! Overflow-aware increment arithmetic for fixed-width fields.
//!
//! Both variants return the would-be new value together with an [OverflowKind].
//! Under [Overflow::Fail] the wrapped value is still computed; it is the caller
//! that decides not to store it.

use std::{fmt, str::FromStr};

use crate::{bits::low_mask, errors::ParseError};

/// Policy applied when an increment leaves a field's representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    /// Two's-complement wraparound at the field's own width.
    #[default]
    Wrap,
    /// Clamp to the field's minimum or maximum.
    Sat,
    /// Refuse the write.
    Fail,
}

impl FromStr for Overflow {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(Overflow::Wrap),
            "sat" => Ok(Overflow::Sat),
            "fail" => Ok(Overflow::Fail),
            _ => Err(ParseError::InvalidOverflow(s.to_string())),
        }
    }
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Overflow::Wrap => "wrap",
            Overflow::Sat => "sat",
            Overflow::Fail => "fail",
        })
    }
}

/// Whether an increment stayed in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowKind {
    None,
    Overflow,
    Underflow,
}

impl OverflowKind {
    /// `0`, `1` or `-1`.
    pub fn indicator(self) -> i8 {
        match self {
            OverflowKind::None => 0,
            OverflowKind::Overflow => 1,
            OverflowKind::Underflow => -1,
        }
    }

    pub fn is_none(self) -> bool {
        self == OverflowKind::None
    }
}

/// Adds `incr` to an unsigned `bits`-wide field holding `value` (`bits` in `1..=63`).
pub fn incr_unsigned(value: u64, incr: i64, bits: u8, policy: Overflow) -> (u64, OverflowKind) {
    let max = low_mask(bits);
    let wrapped = value.wrapping_add(incr as u64) & max;

    if value > max || (incr > 0 && incr as u64 > max - value) {
        return match policy {
            Overflow::Wrap | Overflow::Fail => (wrapped, OverflowKind::Overflow),
            Overflow::Sat => (max, OverflowKind::Overflow),
        };
    }

    if incr < 0 && incr.unsigned_abs() > value {
        return match policy {
            Overflow::Wrap | Overflow::Fail => (wrapped, OverflowKind::Underflow),
            Overflow::Sat => (0, OverflowKind::Underflow),
        };
    }

    (value.wrapping_add(incr as u64), OverflowKind::None)
}

/// Adds `incr` to a signed `bits`-wide field holding `value` (`bits` in `1..=64`).
pub fn incr_signed(value: i64, incr: i64, bits: u8, policy: Overflow) -> (i64, OverflowKind) {
    let (min, max) = signed_range(bits);
    let max_incr = max.wrapping_sub(value);
    let min_incr = min.wrapping_sub(value);
    let narrow = bits < 64;

    if value > max || (narrow && incr > max_incr) || (value >= 0 && incr > 0 && incr > max_incr) {
        return match policy {
            Overflow::Wrap | Overflow::Fail => (wrap_signed(value, incr, bits), OverflowKind::Overflow),
            Overflow::Sat => (max, OverflowKind::Overflow),
        };
    }

    if value < min || (narrow && incr < min_incr) || (value < 0 && incr < 0 && incr < min_incr) {
        return match policy {
            Overflow::Wrap | Overflow::Fail => (wrap_signed(value, incr, bits), OverflowKind::Underflow),
            Overflow::Sat => (min, OverflowKind::Underflow),
        };
    }

    (value.wrapping_add(incr), OverflowKind::None)
}

/// Inclusive `(min, max)` of a signed `bits`-wide field.
pub fn signed_range(bits: u8) -> (i64, i64) {
    let max = if bits == 64 {
        i64::MAX
    } else {
        (1i64 << (bits - 1)) - 1
    };

    (-max - 1, max)
}

// Sum in u64, then copy bit `bits - 1` into every higher bit.
fn wrap_signed(value: i64, incr: i64, bits: u8) -> i64 {
    let msb = 1u64 << (bits - 1);
    let high = u64::MAX << (bits - 1);
    let c = (value as u64).wrapping_add(incr as u64);

    if c & msb != 0 {
        (c | high) as i64
    } else {
        (c & !high) as i64
    }
}
