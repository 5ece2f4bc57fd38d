//! # bitfield
//!
//! Bit-addressable integer fields over a growable byte buffer.
//!
//! Read and write signed or unsigned integers of 1 to 64 bits at any bit
//! offset, and increment them under a wrap, saturate or fail overflow policy.
//! Fields are MSB-first: bit 0 is the high bit of the first byte. This is the
//! field model of the `BITFIELD` command found in key-value stores, where
//! several small counters and flags share one string value.
//!
//! The layers, bottom up:
//!
//! - [bits]: the raw codec. Zero-extending reads, growing writes.
//! - [overflow]: increment arithmetic with overflow detection.
//! - [ops]: `GET`, `SET` and `INCRBY` on one field.
//! - [command] and [exec]: parse a batch of sub-operations and run it.
//!
//! ## Example
//!
//! ```
//! use bitfield::field::FieldType;
//! use bitfield::ops::{self, Reply};
//! use bitfield::overflow::Overflow;
//!
//! let counter = FieldType::unsigned(8).unwrap();
//! let mut buf = vec![0xff];
//!
//! assert_eq!(ops::incrby(&mut buf, counter, 0, 1, Overflow::Wrap), Reply::Integer(0));
//! assert_eq!(ops::incrby(&mut buf, counter, 0, -1, Overflow::Fail), Reply::Nil);
//! assert_eq!(ops::set(&mut buf, counter, 8, 39), 0);
//! assert_eq!(buf, vec![0x00, 39]);
//! ```

pub mod bits;
pub mod command;
pub mod errors;
pub mod exec;
pub mod field;
pub mod ops;
pub mod overflow;
#[cfg(feature = "serde")]
pub mod serde;

pub use command::Command;
pub use errors::ParseError;
pub use exec::{Executor, Op};
pub use field::{FieldType, Offset};
pub use ops::Reply;
pub use overflow::{Overflow, OverflowKind};
