//! Tokenizer-level grammar for bitfield sub-operations.
//!
//! ```text
//! [BITFIELD key | BITFIELD_RO key]
//!     ( GET type offset
//!     | SET type offset value
//!     | INCRBY type offset increment
//!     | OVERFLOW (WRAP | SAT | FAIL) )*
//! ```
//!
//! A batch is parsed completely before anything runs; the first bad token
//! rejects all of it.

use crate::{
    errors::ParseError,
    exec::Op,
    field::{parse_field, parse_value},
    overflow::Overflow,
};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Key named after `BITFIELD`, if the line had the prefix.
    pub key: Option<String>,
    /// `BITFIELD_RO`: only `GET` is allowed.
    pub read_only: bool,
    pub ops: Vec<Op>,
}

impl Command {
    /// Parses a whitespace separated line, with or without the `BITFIELD key` prefix.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }

    pub fn from_tokens(tokens: &[&str]) -> Result<Self, ParseError> {
        let read_only = match tokens.first() {
            Some(t) if t.eq_ignore_ascii_case("bitfield") => false,
            Some(t) if t.eq_ignore_ascii_case("bitfield_ro") => true,
            _ => {
                return Ok(Command {
                    key: None,
                    read_only: false,
                    ops: parse_ops(tokens)?,
                });
            }
        };

        let key = tokens.get(1).ok_or(ParseError::Syntax)?;
        let rest = &tokens[2..];
        let ops = if read_only {
            parse_read_only_ops(rest)?
        } else {
            parse_ops(rest)?
        };

        Ok(Command {
            key: Some(key.to_string()),
            read_only,
            ops,
        })
    }
}

/// Parses a sequence of sub-operation tokens into [Op]s.
pub fn parse_ops(tokens: &[&str]) -> Result<Vec<Op>, ParseError> {
    parse_sub_ops(tokens, false)
}

/// Like [parse_ops], but rejects every sub-command except `GET`.
pub fn parse_read_only_ops(tokens: &[&str]) -> Result<Vec<Op>, ParseError> {
    parse_sub_ops(tokens, true)
}

fn parse_sub_ops(tokens: &[&str], read_only: bool) -> Result<Vec<Op>, ParseError> {
    let mut ops = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let name = tokens[i].to_ascii_lowercase();
        let args = &tokens[i + 1..];

        if read_only && name != "get" {
            return Err(ParseError::ReadOnly(tokens[i].to_string()));
        }

        let (op, used) = match name.as_str() {
            "get" => {
                let [ty, offset, ..] = args else {
                    return Err(ParseError::Syntax);
                };
                let (field, offset) = parse_field(ty, offset)?;
                (Op::Get { field, offset }, 2)
            }
            "set" => {
                let [ty, offset, value, ..] = args else {
                    return Err(ParseError::Syntax);
                };
                let (field, offset) = parse_field(ty, offset)?;
                let value = parse_value(value)?;
                (Op::Set { field, offset, value }, 3)
            }
            "incrby" => {
                let [ty, offset, incr, ..] = args else {
                    return Err(ParseError::Syntax);
                };
                let (field, offset) = parse_field(ty, offset)?;
                let incr = parse_value(incr)?;
                (Op::IncrBy { field, offset, incr }, 3)
            }
            "overflow" => {
                let [policy, ..] = args else {
                    return Err(ParseError::Syntax);
                };
                (Op::Overflow(policy.parse::<Overflow>()?), 1)
            }
            _ => return Err(ParseError::UnknownCommand(tokens[i].to_string())),
        };

        ops.push(op);
        i += 1 + used;
    }

    Ok(ops)
}
