use crate::codec::{Decimal, FieldValue, MIN_DATE};
use crate::config::RecoveryConfig;
use crate::read::extract::RecordKind;
use crate::read::strict::Record;
use crate::record::{GenericRecord, keys};
use crate::recover::splitter::split_code_name;
use std::collections::BTreeMap;

/// Field names commonly used by legacy ledgers, first non-blank one wins.
const CODE_FIELDS: &[&str] = &["CODE", "ACCT", "ACCOUNT", "ACCT_NO", "CUST_CODE", "ID"];
const NAME_FIELDS: &[&str] = &["NAME", "CUSTOMER", "CUST_NAME", "ACCT_NAME", "PARTY"];
const DATE_FIELDS: &[&str] = &["DATE", "TXN_DATE", "TRANS_DATE", "DT"];
const VEHICLE_FIELDS: &[&str] = &["VEHICLE", "VEH_NO", "REG_NO", "REGISTRATION"];
const VOUCHER_FIELDS: &[&str] = &["VOUCHER", "VNO", "VOUCHER_NO"];
/// Amount columns paired with the debit/credit marker they imply.
const AMOUNT_FIELDS: &[(&str, Option<&str>)] = &[
    ("AMOUNT", None),
    ("AMT", None),
    ("DEBIT", Some("D")),
    ("CREDIT", Some("C")),
    ("DR", Some("D")),
    ("CR", Some("C")),
];

/// Maps strict field names onto the keys the importers read. Original field
/// names are kept alongside.
#[derive(Clone, Debug)]
pub struct Canonicalizer {
    kind: RecordKind,
    aliases: BTreeMap<String, String>,
}

impl Canonicalizer {
    pub fn new(kind: RecordKind, config: &RecoveryConfig) -> Self {
        Self {
            kind,
            aliases: config
                .aliases
                .iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v.clone()))
                .collect(),
        }
    }

    pub fn apply(&self, record: Record) -> GenericRecord {
        let mut out = GenericRecord::new();
        for (name, value) in &record.values {
            if let Some(key) = self.aliases.get(&name.to_ascii_uppercase()) {
                out.insert(key.clone(), value.clone());
            }
        }

        if self.kind == RecordKind::Account {
            if let Some(FieldValue::Text(aname)) = record.get("ANAME") {
                match split_code_name(aname) {
                    Some(cn) => {
                        fill(&mut out, keys::CUSTOMER_CODE, FieldValue::Text(cn.code));
                        fill(&mut out, keys::CUSTOMER_NAME, FieldValue::Text(cn.name));
                    }
                    None => fill(&mut out, keys::CUSTOMER_NAME, FieldValue::Text(aname.clone())),
                }
            }
            if let Some(v) = record.get("OPBAL") {
                fill(&mut out, keys::OPENING_BALANCE, v.clone());
            }
        }

        fill_first_text(&mut out, &record, keys::CUSTOMER_CODE, CODE_FIELDS);
        fill_first_text(&mut out, &record, keys::CUSTOMER_NAME, NAME_FIELDS);
        fill_first_text(&mut out, &record, keys::VEHICLE_NUMBER, VEHICLE_FIELDS);
        fill_first_text(&mut out, &record, keys::VOUCHER_NUMBER, VOUCHER_FIELDS);

        if !out.contains(keys::DATE) {
            let date = DATE_FIELDS.iter().find_map(|f| match record.get(f) {
                Some(FieldValue::Date(d)) if *d != MIN_DATE => Some(*d),
                _ => None,
            });
            if let Some(d) = date {
                out.insert(keys::DATE, FieldValue::Date(d));
            }
        }

        if !out.contains(keys::AMOUNT) {
            let hit = AMOUNT_FIELDS.iter().find_map(|(f, marker)| {
                positive_decimal(record.get(f)?).map(|d| (d, *marker))
            });
            if let Some((amount, marker)) = hit {
                out.insert(keys::AMOUNT, FieldValue::Decimal(amount));
                if let Some(m) = marker {
                    fill(&mut out, keys::TRANSACTION_TYPE, FieldValue::Text(m.into()));
                }
            }
        }

        for (name, value) in record.values {
            if !out.contains(&name) {
                out.insert(name, value);
            }
        }
        out
    }
}

fn positive_decimal(v: &FieldValue) -> Option<Decimal> {
    let d = match v {
        FieldValue::Decimal(d) => *d,
        FieldValue::Integer(n) => Decimal::new(*n, 0),
        FieldValue::Text(s) => Decimal::parse(s)?,
        _ => return None,
    };
    d.is_positive().then_some(d)
}

fn fill(out: &mut GenericRecord, key: &str, value: FieldValue) {
    if !out.contains(key) {
        out.insert(key, value);
    }
}

fn fill_first_text(out: &mut GenericRecord, record: &Record, key: &str, names: &[&str]) {
    if out.contains(key) {
        return;
    }
    let found = names.iter().find_map(|f| match record.get(f) {
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(FieldValue::Integer(n)) if *n != 0 => Some(n.to_string()),
        _ => None,
    });
    if let Some(s) = found {
        out.insert(key, FieldValue::Text(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn rec(values: Vec<(&str, FieldValue)>) -> Record {
        Record {
            index: 0,
            values: values.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[test]
    fn account_aname_and_opbal() {
        let c = Canonicalizer::new(RecordKind::Account, &RecoveryConfig::default());
        let out = c.apply(rec(vec![
            ("ANAME", FieldValue::Text("UHA    / 5494".into())),
            ("OPBAL", FieldValue::Decimal(Decimal::new(1050, 2))),
        ]));
        assert_eq!(out.text(keys::CUSTOMER_CODE).as_deref(), Some("5494"));
        assert_eq!(out.text(keys::CUSTOMER_NAME).as_deref(), Some("UHA"));
        assert_eq!(out.decimal(keys::OPENING_BALANCE), Some(Decimal::new(1050, 2)));
        assert!(out.contains("ANAME"));
    }

    #[test]
    fn cash_columns_and_debit_marker() {
        let c = Canonicalizer::new(RecordKind::Cash, &RecoveryConfig::default());
        let out = c.apply(rec(vec![
            ("DT", FieldValue::Date(date!(2023 - 01 - 15))),
            ("AMT", FieldValue::Decimal(Decimal::zero(2))),
            ("DR", FieldValue::Decimal(Decimal::new(2500, 2))),
            ("VEH_NO", FieldValue::Text("CV-9".into())),
        ]));
        assert_eq!(out.date(keys::DATE), Some(date!(2023 - 01 - 15)));
        assert_eq!(out.decimal(keys::AMOUNT), Some(Decimal::new(2500, 2)));
        assert_eq!(out.text(keys::TRANSACTION_TYPE).as_deref(), Some("D"));
        assert_eq!(out.text(keys::VEHICLE_NUMBER).as_deref(), Some("CV-9"));
    }

    #[test]
    fn configured_alias_wins() {
        let mut cfg = RecoveryConfig::default();
        cfg.aliases.insert("party".into(), keys::CUSTOMER_CODE.into());
        let c = Canonicalizer::new(RecordKind::Cash, &cfg);
        let out = c.apply(rec(vec![
            ("PARTY", FieldValue::Text("7001".into())),
            ("CODE", FieldValue::Text("9999".into())),
        ]));
        assert_eq!(out.text(keys::CUSTOMER_CODE).as_deref(), Some("7001"));
        assert_eq!(out.text("CODE").as_deref(), Some("9999"));
    }
}
