//! Error types for parsing bitfield sub-operations.
//!
//! The codec itself has no error paths: offsets past the end of a buffer are
//! guarded no-ops, and a refused `INCRBY` is a [crate::ops::Reply::Nil], not an error.

use thiserror::Error;

/// Errors produced while turning tokens into [crate::exec::Op]s.
///
/// Any of these aborts the whole batch before a single operation runs. The
/// variants carrying a `String` hold the token that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Missing arguments, or a missing key after `BITFIELD`.
    #[error("syntax error")]
    Syntax,
    /// Sub-command name is not `GET`, `SET`, `INCRBY` or `OVERFLOW`.
    #[error("syntax error")]
    UnknownCommand(String),
    /// Field type is not `u1`..`u63` or `i1`..`i64`.
    #[error("Invalid bitfield type. Use something like i16 u8. Note that u64 is not supported but i64 is.")]
    InvalidType(String),
    /// Offset is not a non-negative integer (optionally `#`-prefixed) or overflows once scaled.
    #[error("bit offset is not an integer or out of range")]
    InvalidOffset(String),
    /// Value or increment is not a signed 64-bit integer.
    #[error("value is not an integer or out of range")]
    InvalidValue(String),
    /// Overflow policy is not one of `wrap`, `sat`, `fail`.
    #[error("Invalid OVERFLOW type specified")]
    InvalidOverflow(String),
    /// A mutating sub-command was used in a read-only batch.
    #[error("BITFIELD_RO only supports the GET subcommand")]
    ReadOnly(String),
}

impl ParseError {
    /// The token that caused the error, if the error is tied to one.
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::Syntax => None,
            ParseError::UnknownCommand(t)
            | ParseError::InvalidType(t)
            | ParseError::InvalidOffset(t)
            | ParseError::InvalidValue(t)
            | ParseError::InvalidOverflow(t)
            | ParseError::ReadOnly(t) => Some(t),
        }
    }
}
