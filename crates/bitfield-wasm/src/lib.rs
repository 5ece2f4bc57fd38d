//! WASM bindings for the `bitfield` codec.
//!
//! This crate exposes a small API to JavaScript for running BITFIELD batches
//! against a byte buffer that lives on the Rust side between calls.
//!
//! ```text
//! // Pseudo TypeScript example
//! //
//! // const bf = new WasmBitfield(new TextEncoder().encode("883"));
//! // bf.exec("SET u8 #0 39 SET u8 #1 39 SET u8 #2 39 GET u24 0");
//! // // [56n, 56n, 51n, 2565927n]
//! //
//! // bf.execJson(JSON.stringify({ ops: [
//! //   { op: "overflow", policy: "fail" },
//! //   { op: "incrby", type: "u8", offset: "0", value: 1000 },
//! // ] }));
//! // // [null]
//! //
//! // bf.bytes(); // Uint8Array [39, 39, 39]
//! ```
//!
//! Replies are `BigInt`s, or `null` for an `INCRBY` refused under `OVERFLOW FAIL`.
//! Parse errors are thrown as strings prefixed with `ERR`. A call that throws
//! leaves the buffer as it was.

mod convert;

use bitfield::{Command, Executor};
use wasm_bindgen::prelude::*;

/// A byte buffer plus the overflow policy for its next `INCRBY`.
#[wasm_bindgen]
pub struct WasmBitfield {
    executor: Executor,
}

#[wasm_bindgen]
impl WasmBitfield {
    /// Wraps a copy of `data` (for example a `Uint8Array` passed from JS).
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> WasmBitfield {
        WasmBitfield {
            executor: Executor::new(data.to_vec()),
        }
    }

    /// Runs a command line such as `"OVERFLOW SAT INCRBY u4 #1 3"` and returns the replies.
    ///
    /// A leading `BITFIELD key` is accepted and ignored. Nothing runs when any
    /// sub-operation fails to parse.
    pub fn exec(&mut self, command: &str) -> Result<JsValue, JsValue> {
        let command = Command::parse(command).map_err(convert::error_to_js)?;
        convert::run_atomic(&mut self.executor, &command.ops, convert::replies_to_js)
    }

    /// Runs a JSON batch (see `bitfield::serde::BatchDef`) and returns the replies.
    #[wasm_bindgen(js_name = execJson)]
    pub fn exec_json(&mut self, json: &str) -> Result<JsValue, JsValue> {
        let ops = convert::batch_from_json(json).map_err(|e| JsValue::from_str(&e))?;
        convert::run_atomic(&mut self.executor, &ops, convert::replies_to_js)
    }

    /// Current contents of the buffer.
    pub fn bytes(&self) -> Vec<u8> {
        self.executor.buffer().to_vec()
    }

    /// Length of the buffer in bytes.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.executor.buffer().len()
    }
}
