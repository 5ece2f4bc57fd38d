use bitfield::{Executor, Op, ParseError, Reply, serde::BatchDef};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// A reply as seen from JavaScript: a `BigInt`, or `null` for a refused `INCRBY`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyOut {
    Integer(i64),
    Nil,
}

impl From<Reply> for ReplyOut {
    fn from(value: Reply) -> Self {
        match value {
            Reply::Integer(v) => ReplyOut::Integer(v),
            Reply::Nil => ReplyOut::Nil,
        }
    }
}

/// Parses a JSON batch description into executable ops.
pub fn batch_from_json(json: &str) -> Result<Vec<Op>, String> {
    let def: BatchDef = serde_json::from_str(json).map_err(|e| e.to_string())?;
    def.try_into().map_err(|e: ParseError| format!("ERR {}", e))
}

/// Runs `ops` on a copy of `executor` and keeps the result only if `reply` succeeds.
pub fn run_atomic<T, E>(
    executor: &mut Executor,
    ops: &[Op],
    reply: impl FnOnce(Vec<Reply>) -> Result<T, E>,
) -> Result<T, E> {
    let mut next = executor.clone();
    let out = reply(next.run(ops))?;
    *executor = next;
    Ok(out)
}

/// Replies become `BigInt`s; `i64` fields do not fit a JS number.
pub fn replies_to_js(replies: Vec<Reply>) -> Result<JsValue, JsValue> {
    let out: Vec<ReplyOut> = replies.into_iter().map(ReplyOut::from).collect();
    let ser = serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(true);

    out.serialize(&ser).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn error_to_js(e: ParseError) -> JsValue {
    JsValue::from_str(&format!("ERR {}", e))
}
