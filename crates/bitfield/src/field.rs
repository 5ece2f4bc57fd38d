//! Field specifiers (`u8`, `i64`, ...) and bit offsets (`100`, `#3`).

use std::{fmt, str::FromStr};

use crate::errors::ParseError;

/// Signedness and width of a field.
///
/// Unsigned fields are at most 63 bits wide so every value fits an `i64`;
/// signed fields may use all 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    signed: bool,
    bits: u8,
}

impl FieldType {
    pub const MAX_UNSIGNED_BITS: u8 = 63;
    pub const MAX_SIGNED_BITS: u8 = 64;

    /// Returns `None` when `bits` is 0 or above the limit for the signedness.
    pub fn new(signed: bool, bits: u8) -> Option<Self> {
        let limit = if signed {
            Self::MAX_SIGNED_BITS
        } else {
            Self::MAX_UNSIGNED_BITS
        };

        (1..=limit).contains(&bits).then_some(Self { signed, bits })
    }

    pub fn unsigned(bits: u8) -> Option<Self> {
        Self::new(false, bits)
    }

    pub fn signed(bits: u8) -> Option<Self> {
        Self::new(true, bits)
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

impl FromStr for FieldType {
    type Err = ParseError;

    /// Accepts `^[ui][1-9][0-9]?$`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidType(s.to_string());

        let bytes = s.as_bytes();
        if !(2..=3).contains(&bytes.len()) {
            return Err(invalid());
        }

        let signed = match bytes[0] {
            b'u' => false,
            b'i' => true,
            _ => return Err(invalid()),
        };

        let digits = &bytes[1..];
        if digits[0] == b'0' || !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let bits = digits.iter().fold(0u8, |acc, d| acc * 10 + (d - b'0'));
        FieldType::new(signed, bits).ok_or_else(invalid)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.signed { 'i' } else { 'u' }, self.bits)
    }
}

/// Where a field starts: an absolute bit position or an index in field-width units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Plain bit offset, e.g. `100`.
    Absolute(u64),
    /// `#k`, resolved to `k * width`.
    Element(u64),
}

impl Offset {
    /// Absolute bit offset for a field of `field`'s width. `None` if it does not fit a `u64`.
    pub fn resolve(&self, field: FieldType) -> Option<u64> {
        match *self {
            Offset::Absolute(bit) => Some(bit),
            Offset::Element(index) => index.checked_mul(u64::from(field.bits())),
        }
    }
}

impl FromStr for Offset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (element, digits) = match s.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        // u64::from_str would also take a leading '+'.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidOffset(s.to_string()));
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| ParseError::InvalidOffset(s.to_string()))?;

        Ok(if element {
            Offset::Element(value)
        } else {
            Offset::Absolute(value)
        })
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Absolute(bit) => write!(f, "{}", bit),
            Offset::Element(index) => write!(f, "#{}", index),
        }
    }
}

/// Parses a field type and offset token pair and resolves the offset to bits.
pub fn parse_field(type_token: &str, offset_token: &str) -> Result<(FieldType, u64), ParseError> {
    let field: FieldType = type_token.parse()?;
    let offset: Offset = offset_token.parse()?;
    let bit = offset
        .resolve(field)
        .ok_or_else(|| ParseError::InvalidOffset(offset_token.to_string()))?;

    Ok((field, bit))
}

/// Parses a signed 64-bit value or increment.
pub fn parse_value(token: &str) -> Result<i64, ParseError> {
    token
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidValue(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("u8".parse::<FieldType>(), Ok(FieldType::unsigned(8).unwrap()));
        assert_eq!("i64".parse::<FieldType>(), Ok(FieldType::signed(64).unwrap()));
        assert_eq!("u63".parse::<FieldType>(), Ok(FieldType::unsigned(63).unwrap()));
        assert_eq!("i1".parse::<FieldType>(), Ok(FieldType::signed(1).unwrap()));
    }

    #[test]
    fn test_field_type_rejects() {
        for token in ["u64", "i65", "u0", "i08", "x8", "u", "U8", "u8a", "u100", "", "i-1", "u+8"] {
            assert_eq!(
                token.parse::<FieldType>(),
                Err(ParseError::InvalidType(token.to_string())),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::signed(16).unwrap().to_string(), "i16");
        assert_eq!(FieldType::unsigned(3).unwrap().to_string(), "u3");
    }

    #[test]
    fn test_field_type_new_limits() {
        assert!(FieldType::unsigned(0).is_none());
        assert!(FieldType::unsigned(64).is_none());
        assert!(FieldType::signed(64).is_some());
        assert!(FieldType::signed(65).is_none());
    }

    #[test]
    fn test_offset_from_str() {
        assert_eq!("100".parse::<Offset>(), Ok(Offset::Absolute(100)));
        assert_eq!("#2".parse::<Offset>(), Ok(Offset::Element(2)));
        assert_eq!("0".parse::<Offset>(), Ok(Offset::Absolute(0)));
    }

    #[test]
    fn test_offset_rejects() {
        for token in ["", "#", "-1", "+1", "#-1", "abc", "1.5", "18446744073709551616"] {
            assert_eq!(
                token.parse::<Offset>(),
                Err(ParseError::InvalidOffset(token.to_string())),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_element_offset_scaling() {
        let u8_field = FieldType::unsigned(8).unwrap();
        assert_eq!(Offset::Element(2).resolve(u8_field), Some(16));
        assert_eq!(Offset::Absolute(2).resolve(u8_field), Some(2));

        let i5_field = FieldType::signed(5).unwrap();
        assert_eq!(Offset::Element(3).resolve(i5_field), Some(15));
        assert_eq!(Offset::Element(u64::MAX).resolve(i5_field), None);
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("u8", "#2"),
            Ok((FieldType::unsigned(8).unwrap(), 16))
        );
        assert_eq!(
            parse_field("i64", "#18446744073709551615"),
            Err(ParseError::InvalidOffset("#18446744073709551615".to_string()))
        );
        assert_eq!(
            parse_field("u64", "0"),
            Err(ParseError::InvalidType("u64".to_string()))
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("-5"), Ok(-5));
        assert_eq!(parse_value("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(
            parse_value("9223372036854775808"),
            Err(ParseError::InvalidValue("9223372036854775808".to_string()))
        );
        assert_eq!(parse_value("ten"), Err(ParseError::InvalidValue("ten".to_string())));
    }
}
