use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const MAX_SCALE: u8 = 18;

/// Fixed-point number: `mantissa * 10^-scale`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Decimal {
    pub mantissa: i64,
    pub scale: u8,
}

impl Decimal {
    pub const fn new(mantissa: i64, scale: u8) -> Self {
        Self { mantissa, scale }
    }

    pub const fn zero(scale: u8) -> Self {
        Self { mantissa: 0, scale }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa > 0
    }

    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Parse an invariant-culture number: optional sign, digits with optional
    /// `,` group separators, optional `.` fraction. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (neg, body) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if int_part.starts_with(',') || int_part.ends_with(',') || int_part.contains(",,") {
            return None;
        }
        if frac_part.len() > MAX_SCALE as usize {
            return None;
        }

        let mut mantissa: i64 = 0;
        for b in int_part.bytes().filter(|&b| b != b',') {
            if !b.is_ascii_digit() {
                return None;
            }
            mantissa = mantissa.checked_mul(10)?.checked_add((b - b'0') as i64)?;
        }
        for b in frac_part.bytes() {
            if !b.is_ascii_digit() {
                return None;
            }
            mantissa = mantissa.checked_mul(10)?.checked_add((b - b'0') as i64)?;
        }
        Some(Self {
            mantissa: if neg { -mantissa } else { mantissa },
            scale: frac_part.len() as u8,
        })
    }

    fn aligned(&self, other: &Self) -> (i128, i128) {
        let scale = self.scale.max(other.scale);
        let a = self.mantissa as i128 * 10i128.pow((scale - self.scale) as u32);
        let b = other.mantissa as i128 * 10i128.pow((scale - other.scale) as u32);
        (a, b)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = self.aligned(other);
        a == b
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.aligned(other);
        a.cmp(&b)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let abs = self.mantissa.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{sign}{abs}");
        }
        let pow = 10u64.pow(self.scale as u32);
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / pow,
            abs % pow,
            width = self.scale as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_invariant_numbers() {
        assert_eq!(Decimal::parse("123.45"), Some(Decimal::new(12345, 2)));
        assert_eq!(Decimal::parse("  -0.50 "), Some(Decimal::new(-50, 2)));
        assert_eq!(Decimal::parse("1,250.00"), Some(Decimal::new(125000, 2)));
        assert_eq!(Decimal::parse(".5"), Some(Decimal::new(5, 1)));
        assert_eq!(Decimal::parse("7"), Some(Decimal::new(7, 0)));
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", " ", "-", ".", "1.2.3", "12a", ",100", "1,,0", "1e5"] {
            assert_eq!(Decimal::parse(s), None, "{s:?}");
        }
    }

    #[test]
    fn compares_across_scales() {
        assert_eq!(Decimal::new(150, 2), Decimal::new(15, 1));
        assert!(Decimal::new(1, 0) > Decimal::new(99, 2));
        assert!(Decimal::zero(2).is_zero());
    }

    #[test]
    fn displays_with_scale_digits() {
        assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
        assert_eq!(Decimal::new(-5, 2).to_string(), "-0.05");
        assert_eq!(Decimal::zero(2).to_string(), "0.00");
        assert_eq!(Decimal::new(42, 0).to_string(), "42");
    }
}
