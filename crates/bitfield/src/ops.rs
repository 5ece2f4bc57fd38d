//! GET, SET and INCRBY over a single field of a buffer.
//!
//! Every operation shares the codec's offset guard: an offset past the end of
//! the buffer yields 0 and leaves the buffer untouched.

use std::fmt;

use crate::{
    bits::{self, bit_len},
    field::FieldType,
    overflow::{Overflow, incr_signed, incr_unsigned},
};

/// Result of one sub-operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Integer(i64),
    /// An `INCRBY` refused under [Overflow::Fail]; nothing was written.
    Nil,
}

impl Reply {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(v) => Some(*v),
            Reply::Nil => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(v) => write!(f, "{}", v),
            Reply::Nil => f.write_str("(nil)"),
        }
    }
}

/// Reads the field at `offset`.
pub fn get(buf: &[u8], field: FieldType, offset: u64) -> i64 {
    bits::read(buf, offset, field.bits(), field.is_signed())
}

/// Writes `value` (truncated to the field width) and returns the previous value.
pub fn set(buf: &mut Vec<u8>, field: FieldType, offset: u64, value: i64) -> i64 {
    if offset > bit_len(buf) {
        return 0;
    }

    let old = get(buf, field, offset);
    bits::write(buf, offset, field.bits(), value as u64);

    log::debug!("set - {} at {}: {} -> {}", field, offset, old, value);

    old
}

/// Adds `incr` to the field under `policy` and returns the stored value.
///
/// Under [Overflow::Fail] an overflow or underflow leaves the buffer as it was
/// and yields [Reply::Nil].
pub fn incrby(buf: &mut Vec<u8>, field: FieldType, offset: u64, incr: i64, policy: Overflow) -> Reply {
    if offset > bit_len(buf) {
        return Reply::Integer(0);
    }

    let bits = field.bits();
    let (value, kind) = if field.is_signed() {
        let current = bits::read(buf, offset, bits, true);
        incr_signed(current, incr, bits, policy)
    } else {
        let current = bits::read_bits_at(buf, offset, bits);
        let (value, kind) = incr_unsigned(current, incr, bits, policy);
        (value as i64, kind)
    };

    if policy == Overflow::Fail && !kind.is_none() {
        log::debug!("incrby - {} at {} by {} refused ({:?})", field, offset, incr, kind);
        return Reply::Nil;
    }

    bits::write(buf, offset, bits, value as u64);

    log::debug!(
        "incrby - {} at {} by {} under {}: {} (overflow {})",
        field,
        offset,
        incr,
        policy,
        value,
        kind.indicator()
    );

    Reply::Integer(value)
}
