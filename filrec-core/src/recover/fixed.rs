use crate::codec::{Decimal, FieldValue, parse_integer};
use crate::container::header::DELETED_MARKER;
use crate::record::{GenericRecord, keys};
use crate::recover::splitter::split_code_name;
use crate::text::encoding::LegacyEncoding;
use crate::text::resolver::{Printability, resolve};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// Empirical record layout for an account file whose dBase header is unusable.
///
/// The defaults come from one observed corrupted `ACCOUNT.FIL`; other files
/// need their own profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedLayout {
    pub record_len: usize,
    pub data_start: usize,
    pub name: Range<usize>,
    pub balance: Range<usize>,
    pub cd: usize,
    pub ecode: Range<usize>,
}

impl Default for FixedLayout {
    fn default() -> Self {
        Self {
            record_len: 49,
            data_start: 161,
            name: 1..31,
            balance: 31..42,
            cd: 42,
            ecode: 43..49,
        }
    }
}

impl FixedLayout {
    /// Every sub-field must lie inside one slot.
    pub fn is_consistent(&self) -> bool {
        let inside = |r: &Range<usize>| r.start < r.end && r.end <= self.record_len;
        self.record_len > 0
            && inside(&self.name)
            && inside(&self.balance)
            && inside(&self.ecode)
            && self.cd < self.record_len
    }
}

/// Walks fixed-size slots over a raw buffer, one slot per step.
pub struct FixedOffsetRecords {
    bytes: Vec<u8>,
    layout: FixedLayout,
    candidates: Vec<LegacyEncoding>,
    printability: Printability,
    offset: usize,
    dropped: usize,
}

impl FixedOffsetRecords {
    pub fn new(
        bytes: Vec<u8>,
        layout: FixedLayout,
        candidates: Vec<LegacyEncoding>,
        printability: Printability,
    ) -> Self {
        // An inconsistent profile yields nothing rather than slicing out of bounds.
        let offset = if layout.is_consistent() {
            layout.data_start
        } else {
            usize::MAX
        };
        Self {
            bytes,
            layout,
            candidates,
            printability,
            offset,
            dropped: 0,
        }
    }

    /// Slots skipped for lacking a code or a name.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn decode_slot(&self, slot: &[u8]) -> Option<GenericRecord> {
        let l = &self.layout;
        let raw_name = trim_padding(&slot[l.name.clone()]);
        if raw_name.is_empty() {
            return None;
        }
        let name = resolve(raw_name, &self.candidates, self.printability)?;
        let parsed = split_code_name(&name.text)?;
        if parsed.code.is_empty() || parsed.name.is_empty() {
            return None;
        }

        let balance = ascii_field(&slot[l.balance.clone()]);
        let ecode = ascii_field(&slot[l.ecode.clone()]);
        let cd = (slot[l.cd] as char).to_string();

        Some(
            GenericRecord::new()
                .with_text(keys::CUSTOMER_CODE, parsed.code)
                .with_text(keys::CUSTOMER_NAME, parsed.name)
                .with(
                    keys::OPENING_BALANCE,
                    FieldValue::Decimal(Decimal::parse(&balance).unwrap_or(Decimal::zero(0))),
                )
                .with_text(keys::CD, cd)
                .with(
                    keys::ECODE,
                    FieldValue::Integer(parse_integer(&ecode).unwrap_or(0)),
                ),
        )
    }
}

/// Strip NUL and space padding on both sides of a byte field.
fn trim_padding(raw: &[u8]) -> &[u8] {
    let pad = |b: &u8| *b == 0 || *b == b' ';
    let start = raw.iter().position(|b| !pad(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !pad(b)).map_or(start, |i| i + 1);
    &raw[start..end]
}

fn ascii_field(raw: &[u8]) -> String {
    LegacyEncoding::Ascii
        .decode(raw)
        .trim_matches(['\0', ' '])
        .to_string()
}

impl Iterator for FixedOffsetRecords {
    type Item = GenericRecord;

    fn next(&mut self) -> Option<GenericRecord> {
        let len = self.layout.record_len;
        while self
            .offset
            .checked_add(len)
            .is_some_and(|end| end <= self.bytes.len())
        {
            let at = self.offset;
            self.offset += len;
            let slot = &self.bytes[at..at + len];
            if slot[0] == DELETED_MARKER {
                continue;
            }
            match self.decode_slot(slot) {
                Some(rec) => return Some(rec),
                None => {
                    self.dropped += 1;
                    debug!(offset = at, "fixed-offset slot has no code/name");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::resolver::DEFAULT_CANDIDATES;

    fn slot(marker: u8, name: &str, balance: &str, cd: u8, ecode: &str) -> Vec<u8> {
        let mut s = vec![0u8; 49];
        s[0] = marker;
        s[1..1 + name.len()].copy_from_slice(name.as_bytes());
        for b in &mut s[1 + name.len()..31] {
            *b = b' ';
        }
        let bal = format!("{balance:>11}");
        s[31..42].copy_from_slice(bal.as_bytes());
        s[42] = cd;
        let ec = format!("{ecode:>6}");
        s[43..49].copy_from_slice(ec.as_bytes());
        s
    }

    fn run(slots: &[Vec<u8>]) -> Vec<GenericRecord> {
        let mut bytes = vec![0xFFu8; 161];
        for s in slots {
            bytes.extend_from_slice(s);
        }
        bytes.extend_from_slice(&[0u8; 20]); // trailing partial slot
        FixedOffsetRecords::new(
            bytes,
            FixedLayout::default(),
            DEFAULT_CANDIDATES.to_vec(),
            Printability::default(),
        )
        .collect()
    }

    #[test]
    fn extracts_code_name_and_numbers() {
        let recs = run(&[slot(b' ', "UHA    / 5494", "1500.50", b'D', "12")]);
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.text(keys::CUSTOMER_CODE).as_deref(), Some("5494"));
        assert_eq!(r.text(keys::CUSTOMER_NAME).as_deref(), Some("UHA"));
        assert_eq!(r.decimal(keys::OPENING_BALANCE), Some(Decimal::new(150050, 2)));
        assert_eq!(r.text(keys::CD).as_deref(), Some("D"));
        assert_eq!(r.get(keys::ECODE), Some(&FieldValue::Integer(12)));
    }

    #[test]
    fn nul_padded_name_is_recovered() {
        let mut s = slot(b' ', "UHA    / 5494", "1500.50", b'D', "12");
        for b in &mut s[14..31] {
            *b = 0;
        }
        let recs = run(&[s]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].text(keys::CUSTOMER_CODE).as_deref(), Some("5494"));
        assert_eq!(recs[0].text(keys::CUSTOMER_NAME).as_deref(), Some("UHA"));
        assert_eq!(recs[0].decimal(keys::OPENING_BALANCE), Some(Decimal::new(150050, 2)));
    }

    #[test]
    fn padding_is_trimmed_from_both_ends() {
        assert_eq!(trim_padding(b"\0 AB C \0\0"), b"AB C");
        assert_eq!(trim_padding(b"\0\0  "), b"");
        assert_eq!(trim_padding(b""), b"");
    }

    #[test]
    fn skips_deleted_and_unparseable_slots() {
        let recs = run(&[
            slot(b'*', "DEL / 1111", "1", b'C', "1"),
            slot(b' ', "just some words", "2", b'C', "2"),
            slot(b' ', "7788 KMR", "x", b'C', "zz"),
        ]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].text(keys::CUSTOMER_CODE).as_deref(), Some("7788"));
        assert_eq!(recs[0].decimal(keys::OPENING_BALANCE), Some(Decimal::zero(0)));
        assert_eq!(recs[0].get(keys::ECODE), Some(&FieldValue::Integer(0)));
    }

    #[test]
    fn buffer_shorter_than_data_start_yields_nothing() {
        let it = FixedOffsetRecords::new(
            vec![0u8; 10],
            FixedLayout::default(),
            DEFAULT_CANDIDATES.to_vec(),
            Printability::default(),
        );
        assert_eq!(it.count(), 0);
    }

    #[test]
    fn inconsistent_layout_yields_nothing() {
        let layout = FixedLayout {
            record_len: 10,
            ..FixedLayout::default()
        };
        assert!(!layout.is_consistent());
        let it = FixedOffsetRecords::new(
            vec![b'A'; 4096],
            layout,
            DEFAULT_CANDIDATES.to_vec(),
            Printability::default(),
        );
        assert_eq!(it.count(), 0);
    }
}
