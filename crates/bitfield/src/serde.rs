//! JSON-deserializable batch description.
//!
//! These types mirror the textual grammar one op per object, for callers that
//! would rather ship a batch as JSON than as a command line:
//!
//! ```json
//! { "ops": [
//!     { "op": "overflow", "policy": "sat" },
//!     { "op": "incrby", "type": "u4", "offset": "#2", "value": 1 },
//!     { "op": "get", "type": "u4", "offset": "8" }
//! ] }
//! ```
//!
//! Types and offsets stay strings so they go through the same validation as
//! the command line.

use serde::{Deserialize, Serialize};

use crate::{
    errors::ParseError,
    exec::Op,
    field::parse_field,
    overflow::Overflow,
};

/// Top-level batch: ops run in order against one buffer.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BatchDef {
    pub ops: Vec<OpDef>,
}

/// A single sub-operation.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum OpDef {
    Get {
        #[serde(rename = "type")]
        ty: String,
        offset: String,
    },
    Set {
        #[serde(rename = "type")]
        ty: String,
        offset: String,
        value: i64,
    },
    Incrby {
        #[serde(rename = "type")]
        ty: String,
        offset: String,
        value: i64,
    },
    Overflow {
        policy: String,
    },
}

impl TryFrom<OpDef> for Op {
    type Error = ParseError;

    fn try_from(value: OpDef) -> Result<Self, Self::Error> {
        Ok(match value {
            OpDef::Get { ty, offset } => {
                let (field, offset) = parse_field(&ty, &offset)?;
                Op::Get { field, offset }
            }
            OpDef::Set { ty, offset, value } => {
                let (field, offset) = parse_field(&ty, &offset)?;
                Op::Set { field, offset, value }
            }
            OpDef::Incrby { ty, offset, value } => {
                let (field, offset) = parse_field(&ty, &offset)?;
                Op::IncrBy { field, offset, incr: value }
            }
            OpDef::Overflow { policy } => Op::Overflow(policy.parse::<Overflow>()?),
        })
    }
}

impl TryFrom<BatchDef> for Vec<Op> {
    type Error = ParseError;

    fn try_from(value: BatchDef) -> Result<Self, Self::Error> {
        value.ops.into_iter().map(Op::try_from).collect()
    }
}
