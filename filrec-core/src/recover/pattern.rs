use crate::codec::{Decimal, FieldValue, MIN_DATE, parse_yyyymmdd};
use crate::record::{GenericRecord, keys};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::trace;

/// Transaction-shaped token groups, tried in order over the whole text.
const PATTERNS: [&str; 3] = [
    // NAME / CODE VOUCHERVEHICLE YYYYMMDD
    r"(?im)(?P<name>[A-Z]{2,4})\s*/\s*(?P<code>\d{4,6})\s+(?P<voucher>\d+)(?P<vehicle>CV-\d+|\w{2,3}-\d+)\s+(?P<date>\d{8})",
    // AMOUNT[CD] NAME / CODE
    r"(?im)(?P<amount>\d+\.\d{2})(?P<type>[CD])\s+(?P<name>[A-Z]{2,4})\s*/\s*(?P<code>\d{4,6})",
    // VEHICLE / CODE
    r"(?im)(?P<vehicle>\w{2,3}-\d+|\bCV-\d+)\s*/\s*(?P<code>\d{4,6})",
];

fn patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("valid transaction pattern"))
            .collect()
    })
}

fn group<'t>(c: &Captures<'t>, name: &str) -> Option<&'t str> {
    c.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Turn one match into a candidate record. Amount defaults to zero and the
/// debit/credit marker to `C`; other keys are only set when matched.
pub fn candidate(c: &Captures<'_>) -> GenericRecord {
    let mut rec = GenericRecord::new();
    if let Some(name) = group(c, "name") {
        rec.insert(keys::CUSTOMER_NAME, FieldValue::Text(name.to_string()));
    }
    if let Some(code) = group(c, "code") {
        rec.insert(keys::CUSTOMER_CODE, FieldValue::Text(code.to_string()));
    }
    if let Some(vehicle) = group(c, "vehicle") {
        rec.insert(keys::VEHICLE_NUMBER, FieldValue::Text(vehicle.to_string()));
    }
    if let Some(voucher) = group(c, "voucher") {
        rec.insert(keys::VOUCHER_NUMBER, FieldValue::Text(voucher.to_string()));
    }
    let amount = group(c, "amount")
        .and_then(Decimal::parse)
        .unwrap_or(Decimal::zero(2));
    rec.insert(keys::AMOUNT, FieldValue::Decimal(amount));
    let kind = group(c, "type").unwrap_or("C").to_ascii_uppercase();
    rec.insert(keys::TRANSACTION_TYPE, FieldValue::Text(kind));
    if let Some(date) = group(c, "date") {
        rec.insert(
            keys::DATE,
            FieldValue::Date(parse_yyyymmdd(date).unwrap_or(MIN_DATE)),
        );
    }
    rec
}

/// A candidate survives only with a customer code, a vehicle number, or a
/// positive amount.
pub fn has_signal(rec: &GenericRecord) -> bool {
    rec.text(keys::CUSTOMER_CODE).is_some()
        || rec.text(keys::VEHICLE_NUMBER).is_some()
        || rec.decimal(keys::AMOUNT).is_some_and(|a| a.is_positive())
}

/// Lazily scans `text` with each pattern in turn, one match per step.
pub struct PatternRecords {
    text: String,
    pattern: usize,
    pos: usize,
    rejected: usize,
}

impl PatternRecords {
    pub fn new(text: String) -> Self {
        Self {
            text,
            pattern: 0,
            pos: 0,
            rejected: 0,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    fn advance_past(&self, start: usize, end: usize) -> usize {
        if end > start {
            return end;
        }
        // empty match: step one char forward
        self.text[end..]
            .chars()
            .next()
            .map_or(self.text.len() + 1, |c| end + c.len_utf8())
    }
}

impl Iterator for PatternRecords {
    type Item = GenericRecord;

    fn next(&mut self) -> Option<GenericRecord> {
        let res = patterns();
        while self.pattern < res.len() {
            if self.pos > self.text.len() {
                self.pattern += 1;
                self.pos = 0;
                continue;
            }
            let Some(c) = res[self.pattern].captures_at(&self.text, self.pos) else {
                self.pattern += 1;
                self.pos = 0;
                continue;
            };
            let (start, end) = c.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            let rec = candidate(&c);
            self.pos = self.advance_past(start, end);
            if has_signal(&rec) {
                return Some(rec);
            }
            self.rejected += 1;
            trace!(pattern = self.pattern, at = start, "pattern candidate without signal");
        }
        None
    }
}
