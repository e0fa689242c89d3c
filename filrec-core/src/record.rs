// filrec_core/src/record.rs
use crate::codec::{Decimal, FieldValue, parse_yyyymmdd};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use time::Date;

pub mod keys {
    pub const CUSTOMER_CODE: &str = "CustomerCode";
    pub const CUSTOMER_NAME: &str = "CustomerName";
    pub const OPENING_BALANCE: &str = "OpeningBalance";
    pub const CD: &str = "CD";
    pub const ECODE: &str = "ECODE";
    pub const VEHICLE_NUMBER: &str = "VehicleNumber";
    pub const VOUCHER_NUMBER: &str = "VoucherNumber";
    pub const AMOUNT: &str = "Amount";
    pub const TRANSACTION_TYPE: &str = "TransactionType";
    pub const DATE: &str = "Date";
}

/// Loosely typed value shared by the strict and heuristic decoders.
pub type LooseValue = FieldValue;

/// Key/value record produced by any decoder; the importers only see this.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericRecord {
    fields: BTreeMap<String, LooseValue>,
}

impl GenericRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: LooseValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn with(mut self, key: &str, value: LooseValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_text(self, key: &str, value: impl Into<String>) -> Self {
        self.with(key, LooseValue::Text(value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&LooseValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<LooseValue> {
        self.fields.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LooseValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Trimmed textual form; empty strings count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        let s = match self.get(key)? {
            LooseValue::Text(s) => s.trim().to_string(),
            LooseValue::Integer(n) => n.to_string(),
            LooseValue::Decimal(d) => d.to_string(),
            LooseValue::Boolean(_) | LooseValue::Date(_) | LooseValue::Raw(_) => return None,
        };
        (!s.is_empty()).then_some(s)
    }

    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.get(key)? {
            LooseValue::Decimal(d) => Some(*d),
            LooseValue::Integer(n) => Some(Decimal::new(*n, 0)),
            LooseValue::Text(s) => Decimal::parse(s),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> Option<Date> {
        match self.get(key)? {
            LooseValue::Date(d) => Some(*d),
            LooseValue::Text(s) => parse_yyyymmdd(s.trim()),
            _ => None,
        }
    }
}

impl FromIterator<(String, LooseValue)> for GenericRecord {
    fn from_iter<I: IntoIterator<Item = (String, LooseValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for GenericRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn text_treats_blank_as_absent() {
        let r = GenericRecord::new()
            .with_text(keys::CUSTOMER_CODE, "  ")
            .with_text(keys::CUSTOMER_NAME, " UHA ");
        assert_eq!(r.text(keys::CUSTOMER_CODE), None);
        assert_eq!(r.text(keys::CUSTOMER_NAME).as_deref(), Some("UHA"));
        assert_eq!(r.text("missing"), None);
    }

    #[test]
    fn numeric_accessors_coerce() {
        let r = GenericRecord::new()
            .with(keys::ECODE, LooseValue::Integer(12))
            .with_text(keys::AMOUNT, "150.25")
            .with_text(keys::DATE, "20230115");
        assert_eq!(r.text(keys::ECODE).as_deref(), Some("12"));
        assert_eq!(r.decimal(keys::AMOUNT), Some(Decimal::new(15025, 2)));
        assert_eq!(r.date(keys::DATE), Some(date!(2023 - 01 - 15)));
    }

    #[test]
    fn display_lists_sorted_pairs() {
        let r = GenericRecord::new()
            .with_text("b", "2")
            .with(keys::AMOUNT, LooseValue::Decimal(Decimal::new(100, 2)));
        assert_eq!(r.to_string(), "Amount:1.00, b:2");
    }
}
