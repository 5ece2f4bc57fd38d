//! Runs parsed sub-operations against one buffer.

use crate::{
    command::Command,
    errors::ParseError,
    field::FieldType,
    ops,
    overflow::Overflow,
};

pub use crate::ops::Reply;

/// One parsed sub-operation. Offsets are already resolved to absolute bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get { field: FieldType, offset: u64 },
    Set { field: FieldType, offset: u64, value: i64 },
    IncrBy { field: FieldType, offset: u64, incr: i64 },
    /// Sets the policy for the next `INCRBY`.
    Overflow(Overflow),
}

/// Owns a buffer and the overflow policy used by the next `INCRBY`.
///
/// The policy goes back to [Overflow::Wrap] after every `INCRBY`, whether or
/// not the increment was applied.
///
/// # Example
///
/// ```
/// use bitfield::exec::{Executor, Reply};
///
/// let mut executor = Executor::new(b"883".to_vec());
/// let replies = executor
///     .run_str("SET u8 #0 39 SET u8 #1 39 SET u8 #2 39 GET u24 0")
///     .unwrap();
///
/// assert_eq!(replies.last(), Some(&Reply::Integer(2565927)));
/// assert_eq!(executor.buffer(), &[39, 39, 39]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Executor {
    buffer: Vec<u8>,
    overflow: Overflow,
}

impl Executor {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            overflow: Overflow::Wrap,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// Policy the next `INCRBY` will use.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Executes one op. `OVERFLOW` yields no reply.
    pub fn apply(&mut self, op: &Op) -> Option<Reply> {
        match *op {
            Op::Get { field, offset } => Some(Reply::Integer(ops::get(&self.buffer, field, offset))),
            Op::Set { field, offset, value } => {
                Some(Reply::Integer(ops::set(&mut self.buffer, field, offset, value)))
            }
            Op::IncrBy { field, offset, incr } => {
                let reply = ops::incrby(&mut self.buffer, field, offset, incr, self.overflow);
                self.overflow = Overflow::Wrap;
                Some(reply)
            }
            Op::Overflow(policy) => {
                log::debug!("overflow policy: {} -> {}", self.overflow, policy);
                self.overflow = policy;
                None
            }
        }
    }

    /// Executes `ops` in order and collects their replies.
    pub fn run(&mut self, ops: &[Op]) -> Vec<Reply> {
        ops.iter().filter_map(|op| self.apply(op)).collect()
    }

    /// Parses `line` (see [Command::parse]) and runs it. Nothing runs if parsing fails.
    pub fn run_str(&mut self, line: &str) -> Result<Vec<Reply>, ParseError> {
        let command = Command::parse(line)?;
        Ok(self.run(&command.ops))
    }
}
