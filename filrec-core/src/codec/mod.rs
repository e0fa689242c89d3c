//! Field codec: one fixed-width slice of a record into a typed value.
//! Malformed input decodes to a default, never an error.

use crate::text::encoding::LegacyEncoding;
use serde::{Deserialize, Serialize};
use time::macros::date;
use time::{Date, Month};

pub mod decimal;

pub use decimal::Decimal;

/// Sentinel for blank or malformed date fields.
pub const MIN_DATE: Date = date!(0001 - 01 - 01);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Character,
    Numeric,
    Date,
    Logical,
    Memo,
    Unknown(u8),
}

impl FieldType {
    pub fn from_tag(tag: u8) -> Self {
        match tag.to_ascii_uppercase() {
            b'C' => FieldType::Character,
            b'N' => FieldType::Numeric,
            b'D' => FieldType::Date,
            b'L' => FieldType::Logical,
            b'M' => FieldType::Memo,
            _ => FieldType::Unknown(tag),
        }
    }

    pub fn tag(self) -> char {
        match self {
            FieldType::Character => 'C',
            FieldType::Numeric => 'N',
            FieldType::Date => 'D',
            FieldType::Logical => 'L',
            FieldType::Memo => 'M',
            FieldType::Unknown(t) => t as char,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(Date),
    Boolean(bool),
    /// Bytes the codec could not interpret (slice shorter than declared).
    Raw(Vec<u8>),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Date(d) => write!(
                f,
                "{:04}-{:02}-{:02}",
                d.year(),
                d.month() as u8,
                d.day()
            ),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Raw(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

fn trim_field(s: &str) -> &str {
    s.trim_end_matches(['\0', ' '])
}

/// Parse `YYYYMMDD` with a year of at least 1; anything else is `None`.
pub fn parse_yyyymmdd(s: &str) -> Option<Date> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok().filter(|y| *y >= 1)?;
    let month: u8 = s[4..6].parse().ok()?;
    let day: u8 = s[6..8].parse().ok()?;
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

pub fn parse_integer(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Decode one field. `declared_len` is the descriptor length; a shorter
/// slice means the record ran out of bytes and is passed through raw.
pub fn decode(
    field_type: FieldType,
    raw: &[u8],
    declared_len: usize,
    decimal_count: u8,
    encoding: LegacyEncoding,
) -> FieldValue {
    if raw.len() < declared_len {
        return FieldValue::Raw(raw.to_vec());
    }
    let decoded = encoding.decode(raw);
    let s = trim_field(&decoded);

    match field_type {
        FieldType::Character | FieldType::Unknown(_) => FieldValue::Text(s.to_string()),
        FieldType::Numeric => decode_numeric(s, decimal_count),
        FieldType::Date => FieldValue::Date(parse_yyyymmdd(s).unwrap_or(MIN_DATE)),
        FieldType::Logical => {
            let t = s.trim();
            FieldValue::Boolean(
                t.eq_ignore_ascii_case("T") || t.eq_ignore_ascii_case("Y") || t == "1",
            )
        }
        FieldType::Memo => FieldValue::Integer(parse_integer(s).unwrap_or(0)),
    }
}

fn decode_numeric(s: &str, decimal_count: u8) -> FieldValue {
    let t = s.trim();
    if decimal_count == 0 {
        return FieldValue::Integer(parse_integer(t).unwrap_or(0));
    }
    let scale = decimal_count.min(decimal::MAX_SCALE);
    if t.is_empty() {
        return FieldValue::Decimal(Decimal::zero(scale));
    }
    FieldValue::Decimal(Decimal::parse(t).unwrap_or(Decimal::zero(scale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CP: LegacyEncoding = LegacyEncoding::Windows1252;

    fn dec(ft: FieldType, raw: &[u8], decimals: u8) -> FieldValue {
        decode(ft, raw, raw.len(), decimals, CP)
    }

    #[test]
    fn character_trims_trailing_nul_and_space() {
        assert_eq!(
            dec(FieldType::Character, b"  RAM LAL \0\0  ", 0),
            FieldValue::Text("  RAM LAL".into())
        );
    }

    #[test]
    fn blank_numeric_is_zero_of_field_shape() {
        assert_eq!(dec(FieldType::Numeric, b"      ", 0), FieldValue::Integer(0));
        match dec(FieldType::Numeric, b"        ", 2) {
            FieldValue::Decimal(d) => {
                assert_eq!(d.to_string(), "0.00");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_parses_or_defaults() {
        assert_eq!(dec(FieldType::Numeric, b"   42", 0), FieldValue::Integer(42));
        assert_eq!(dec(FieldType::Numeric, b"  4x2", 0), FieldValue::Integer(0));
        assert_eq!(
            dec(FieldType::Numeric, b"  1234.50", 2),
            FieldValue::Decimal(Decimal::new(123450, 2))
        );
        assert_eq!(
            dec(FieldType::Numeric, b"***.**", 2),
            FieldValue::Decimal(Decimal::zero(2))
        );
    }

    #[test]
    fn two_decimal_round_trip() {
        for v in [0.0f64, 1.5, 99.99, 12345.67, -8.25] {
            let text = format!("{v:>10.2}");
            match dec(FieldType::Numeric, text.as_bytes(), 2) {
                FieldValue::Decimal(d) => assert!((d.to_f64() - v).abs() < 0.005, "{text}"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn date_requires_eight_digits() {
        assert_eq!(
            dec(FieldType::Date, b"20230115", 0),
            FieldValue::Date(date!(2023 - 01 - 15))
        );
        assert_eq!(dec(FieldType::Date, b"        ", 0), FieldValue::Date(MIN_DATE));
        assert_eq!(dec(FieldType::Date, b"2023011", 0), FieldValue::Date(MIN_DATE));
        assert_eq!(dec(FieldType::Date, b"20231345", 0), FieldValue::Date(MIN_DATE));
        assert_eq!(dec(FieldType::Date, b"2023-1-5", 0), FieldValue::Date(MIN_DATE));
    }

    #[test]
    fn year_zero_is_not_a_date() {
        assert_eq!(parse_yyyymmdd("00000101"), None);
        assert_eq!(dec(FieldType::Date, b"00000615", 0), FieldValue::Date(MIN_DATE));
        assert_eq!(parse_yyyymmdd("00010101"), Some(MIN_DATE));
    }

    #[test]
    fn logical_accepts_t_y_1() {
        for raw in [b"T", b"t", b"Y", b"y", b"1"] {
            assert_eq!(dec(FieldType::Logical, raw, 0), FieldValue::Boolean(true));
        }
        for raw in [b"F", b"N", b"0", b" ", b"?"] {
            assert_eq!(dec(FieldType::Logical, raw, 0), FieldValue::Boolean(false));
        }
    }

    #[test]
    fn memo_pointer_or_zero() {
        assert_eq!(dec(FieldType::Memo, b"        17", 0), FieldValue::Integer(17));
        assert_eq!(dec(FieldType::Memo, b"          ", 0), FieldValue::Integer(0));
    }

    #[test]
    fn unknown_type_passes_text_through() {
        assert_eq!(
            dec(FieldType::from_tag(b'X'), b"abc  ", 0),
            FieldValue::Text("abc".into())
        );
    }

    #[test]
    fn short_slice_is_raw() {
        assert_eq!(
            decode(FieldType::Numeric, b"12", 5, 0, CP),
            FieldValue::Raw(b"12".to_vec())
        );
    }
}
