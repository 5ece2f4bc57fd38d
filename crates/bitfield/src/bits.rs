//! Low-level bit read and write utilities for byte buffers.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.
//! Reads past the end of the data see zeros; writes past the end grow the buffer.

use std::fmt::Write;

/// Number of addressable bits in `data`.
pub fn bit_len(data: &[u8]) -> u64 {
    data.len() as u64 * 8
}

/// Mask covering the low `width` bits. `width` must be in `1..=64`.
pub fn low_mask(width: u8) -> u64 {
    u64::MAX >> (64 - u32::from(width))
}

/// Reads a single bit at `bit_pos` (0 = MSB of first byte). Returns 0 past the end.
pub fn read_bit_at(data: &[u8], bit_pos: u64) -> u8 {
    let byte_index = bit_pos >> 3;
    let bit_index = 7 - (bit_pos & 7);

    match usize::try_from(byte_index).ok().and_then(|i| data.get(i)) {
        Some(byte) => (byte >> bit_index) & 1,
        None => 0,
    }
}

/// Reads `width` bits starting at `offset` as an unsigned value. MSB-first.
///
/// Bits beyond the end of `data` are read as zero; nothing is allocated.
pub fn read_bits_at(data: &[u8], offset: u64, width: u8) -> u64 {
    let mut value = 0u64;

    for i in 0..u64::from(width) {
        // Positions past u64::MAX are past the end too.
        let bit = offset.checked_add(i).map_or(0, |pos| read_bit_at(data, pos));
        value = (value << 1) | u64::from(bit);
    }

    log::trace!(
        "read_bits_at - offset: {}, width: {}, len: {}, value: 0x{:x}",
        offset,
        width,
        data.len(),
        value
    );

    value
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u8) -> i64 {
    let shift = 64 - u32::from(bits);
    ((value << shift) as i64) >> shift
}

/// Reads a `width`-bit field at `offset`, sign-extended when `signed`.
///
/// An `offset` past the end of the buffer yields 0 without looking at the data.
pub fn read(data: &[u8], offset: u64, width: u8, signed: bool) -> i64 {
    if offset > bit_len(data) {
        return 0;
    }

    let raw = read_bits_at(data, offset, width);
    if signed {
        sign_extend(raw, width)
    } else {
        raw as i64
    }
}

/// Appends zero bytes so that bits `offset..offset + width` exist. Returns the number of bytes added.
pub fn grow_for(buf: &mut Vec<u8>, offset: u64, width: u8) -> usize {
    let end = offset + u64::from(width);
    let len = bit_len(buf);
    if end <= len {
        return 0;
    }

    let extra = (end - len).div_ceil(8) as usize;
    buf.resize(buf.len() + extra, 0);

    log::trace!("grow_for - offset: {}, width: {}, added: {} bytes", offset, width, extra);

    extra
}

/// Writes the low `width` bits of `value` at `offset`, MSB-first.
///
/// The buffer grows with zero bytes when the field runs past its end. An
/// `offset` past the end of the buffer leaves it untouched.
pub fn write(buf: &mut Vec<u8>, offset: u64, width: u8, value: u64) {
    if offset > bit_len(buf) {
        return;
    }

    let value = value & low_mask(width);
    grow_for(buf, offset, width);

    let mut pos = offset;
    for i in (0..width).rev() {
        let bit = ((value >> i) & 1) as u8;
        let byte_index = (pos >> 3) as usize;
        let shift = 7 - (pos & 7);

        let byte = &mut buf[byte_index];
        *byte &= !(1 << shift);
        *byte |= bit << shift;

        pos += 1;
    }

    log::trace!(
        "write - offset: {}, width: {}, value: 0x{:x}, len: {}",
        offset,
        width,
        value,
        buf.len()
    );
}

/// Formats bytes as space separated hex, e.g. `0x38 0x38 0x33`.
pub fn format_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 5);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "0x{:x}", byte);
    }

    out
}

/// Formats bytes as binary, one `|`-terminated group per byte.
pub fn format_binary(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 9);
    for byte in data {
        let _ = write!(out, "{:08b}|", byte);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_bit_at() {
        let data = [0b1000_0001];
        assert_eq!(read_bit_at(&data, 0), 1);
        assert_eq!(read_bit_at(&data, 1), 0);
        assert_eq!(read_bit_at(&data, 7), 1);
    }

    #[test]
    fn test_read_bit_past_end() {
        let data = [0xff];
        assert_eq!(read_bit_at(&data, 8), 0);
        assert_eq!(read_bit_at(&data, u64::MAX), 0);
    }

    #[test]
    fn test_read_bits_at() {
        let data = [0b11111111];
        assert_eq!(read_bits_at(&data, 0, 8), 0b11111111);
    }

    #[test]
    fn test_read_bits_across_bytes() {
        let data = [0b0000_0011, 0b1100_0000];
        assert_eq!(read_bits_at(&data, 6, 4), 0b1111);
    }

    #[test]
    fn test_read_bits_zero_extends() {
        let data = [0xff];
        assert_eq!(read_bits_at(&data, 4, 8), 0b1111_0000);
    }

    #[test]
    fn test_read_bits_near_max_offset() {
        let data = [0xff];
        assert_eq!(read_bits_at(&data, u64::MAX - 2, 8), 0);
        assert_eq!(read_bits_at(&data, u64::MAX, 64), 0);
    }

    #[test]
    fn test_read_bits_64() {
        let data = [0x80, 0, 0, 0, 0, 0, 0, 0x01];
        assert_eq!(read_bits_at(&data, 0, 64), 0x8000_0000_0000_0001);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0b11111111, 8), -1);
        assert_eq!(sign_extend(0b1000_0000, 8), -128);
        assert_eq!(sign_extend(0b0111_1111, 8), 127);
        assert_eq!(sign_extend(1, 1), -1);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
        assert_eq!(sign_extend(1 << 63, 64), i64::MIN);
    }

    #[test]
    fn test_read_signed_and_unsigned() {
        let data = [0xf0];
        assert_eq!(read(&data, 0, 4, false), 15);
        assert_eq!(read(&data, 0, 4, true), -1);
        assert_eq!(read(&data, 4, 4, true), 0);
    }

    #[test]
    fn test_read_offset_past_end() {
        let data = [0xff, 0xff, 0xff];
        assert_eq!(read(&data, 1000, 8, false), 0);
        assert_eq!(read(&data, 25, 8, true), 0);
    }

    #[test]
    fn test_read_at_exact_end() {
        let data = [0xff];
        assert_eq!(read(&data, 8, 8, false), 0);
    }

    #[test]
    fn test_write_in_place() {
        let mut buf = vec![0x00, 0x00];
        write(&mut buf, 4, 8, 0xab);
        assert_eq!(buf, vec![0x0a, 0xb0]);
    }

    #[test]
    fn test_write_preserves_neighbours() {
        let mut buf = vec![0xff];
        write(&mut buf, 2, 3, 0);
        assert_eq!(buf, vec![0b1100_0111]);
    }

    #[test]
    fn test_write_masks_value() {
        let mut buf = vec![0x00];
        write(&mut buf, 0, 4, 0xfff);
        assert_eq!(buf, vec![0xf0]);
    }

    #[test]
    fn test_write_grows() {
        let mut buf = vec![0x38, 0x38, 0x33];
        write(&mut buf, 24, 8, 39);
        assert_eq!(buf, vec![0x38, 0x38, 0x33, 39]);

        let mut buf = vec![];
        write(&mut buf, 0, 1, 1);
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn test_write_offset_past_end_is_noop() {
        let mut buf = vec![0x01, 0x02];
        write(&mut buf, 17, 8, 0xff);
        assert_eq!(buf, vec![0x01, 0x02]);
    }

    #[test]
    fn test_write_64_bits() {
        let mut buf = vec![];
        write(&mut buf, 0, 64, u64::MAX);
        assert_eq!(buf, vec![0xff; 8]);
    }

    #[test]
    fn test_grow_for() {
        let mut buf = vec![0u8; 3];
        assert_eq!(grow_for(&mut buf, 20, 4), 0);
        assert_eq!(grow_for(&mut buf, 20, 5), 1);
        assert_eq!(buf.len(), 4);
        assert_eq!(grow_for(&mut buf, 32, 17), 3);
        assert_eq!(buf, vec![0u8; 7]);
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x38, 0x38, 0x33]), "0x38 0x38 0x33");
        assert_eq!(format_hex(&[]), "");
    }

    #[test]
    fn test_format_binary() {
        assert_eq!(format_binary(&[0x38, 0x01]), "00111000|00000001|");
    }

    fn field_and_value() -> impl Strategy<Value = (u8, bool, i64)> {
        (1u8..=64, any::<bool>(), any::<i64>()).prop_filter_map(
            "unsigned fields are at most 63 bits",
            |(width, signed, raw)| {
                if signed {
                    Some((width, true, sign_extend(raw as u64, width)))
                } else if width <= 63 {
                    Some((width, false, (raw as u64 & low_mask(width)) as i64))
                } else {
                    None
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_write_then_read(
            prefix in proptest::collection::vec(any::<u8>(), 0..6),
            extra in 0u64..8,
            (width, signed, value) in field_and_value(),
        ) {
            let mut buf = prefix.clone();
            let offset = (bit_len(&buf)).saturating_sub(extra);
            write(&mut buf, offset, width, value as u64);
            prop_assert_eq!(read(&buf, offset, width, signed), value);
        }

        #[test]
        fn prop_growth_is_exact(len in 0usize..8, offset_back in 0u64..16, width in 1u8..=64) {
            let mut buf = vec![0xa5; len];
            let old_bits = bit_len(&buf);
            let offset = old_bits.saturating_sub(offset_back);
            write(&mut buf, offset, width, 0);

            let end = offset + u64::from(width);
            let expected = if end > old_bits { (end - old_bits).div_ceil(8) as usize } else { 0 };
            prop_assert_eq!(buf.len(), len + expected);
        }

        #[test]
        fn prop_sign_extension(width in 1u8..=63, low in any::<u64>()) {
            let pattern = (low & low_mask(width)) | (1 << (width - 1));
            let mut buf = vec![];
            write(&mut buf, 0, width, pattern);
            let expected = (i128::from(pattern) - (1i128 << width)) as i64;
            prop_assert_eq!(read(&buf, 0, width, true), expected);
        }
    }
}
