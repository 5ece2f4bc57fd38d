//! Initial buffer contents from the command line.

use anyhow::{Context, Result, bail};

/// Decodes a hex string such as `383833` or `0x38 0x38 0x33`.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|chunk| chunk.trim_start_matches("0x").trim_start_matches("0X"))
        .map(|chunk| {
            if chunk.len() % 2 == 1 {
                format!("0{}", chunk)
            } else {
                chunk.to_string()
            }
        })
        .collect();

    if !digits.is_ascii() {
        bail!("hex input contains non-ASCII characters");
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).context("invalid hex input")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte {:?}", pair))
        })
        .collect()
}
