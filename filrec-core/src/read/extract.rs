use crate::config::RecoveryConfig;
use crate::error::{FilError, Result};
use crate::read::canonical::Canonicalizer;
use crate::read::strict::{Records, StrictReader};
use crate::record::GenericRecord;
use crate::recover::{FixedOffsetRecords, LineRecords, PatternRecords};
use crate::text::resolver::resolve;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Which legacy table a file holds; selects the heuristic path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Account,
    Cash,
}

impl RecordKind {
    /// `ACCOUNT.FIL` and `CASH.FIL`, any case.
    pub fn for_file_name(name: &str) -> Option<Self> {
        let stem = name.rsplit_once('.').map_or(name, |(s, _)| s);
        match stem.to_ascii_uppercase().as_str() {
            "ACCOUNT" => Some(RecordKind::Account),
            "CASH" => Some(RecordKind::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Account => "account",
            RecordKind::Cash => "cash",
        })
    }
}

impl FromStr for RecordKind {
    type Err = FilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "account" => Ok(RecordKind::Account),
            "cash" => Ok(RecordKind::Cash),
            other => Err(FilError::Format(format!("unknown record kind `{other}`"))),
        }
    }
}

/// The decoder that produced an extraction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Strict,
    Fixed,
    Lines,
    Pattern,
    Empty,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Strict => "strict",
            Source::Fixed => "fixed-offset",
            Source::Lines => "lines",
            Source::Pattern => "pattern",
            Source::Empty => "empty",
        })
    }
}

/// Lazy record sequence from exactly one decoder.
pub enum Extraction {
    Strict {
        records: Records<File>,
        canon: Canonicalizer,
    },
    Fixed(FixedOffsetRecords),
    Lines(LineRecords),
    Pattern(PatternRecords),
    Empty,
}

impl Extraction {
    pub fn source(&self) -> Source {
        match self {
            Extraction::Strict { .. } => Source::Strict,
            Extraction::Fixed(_) => Source::Fixed,
            Extraction::Lines(_) => Source::Lines,
            Extraction::Pattern(_) => Source::Pattern,
            Extraction::Empty => Source::Empty,
        }
    }
}

impl Iterator for Extraction {
    type Item = GenericRecord;

    fn next(&mut self) -> Option<GenericRecord> {
        match self {
            Extraction::Strict { records, canon } => records.next().map(|r| canon.apply(r)),
            Extraction::Fixed(it) => it.next(),
            Extraction::Lines(it) => it.next(),
            Extraction::Pattern(it) => it.next(),
            Extraction::Empty => None,
        }
    }
}

/// Open `path` and pick a decoder: strict first, and on structural failure
/// the heuristic path for `kind`. Only I/O failures are returned.
pub fn extract(path: &Path, kind: RecordKind, config: &RecoveryConfig) -> Result<Extraction> {
    match StrictReader::open(path, config.code_page) {
        Ok(reader) => {
            info!(
                path = %path.display(),
                %kind,
                records = reader.header().record_count,
                fields = reader.fields().len(),
                "strict decode"
            );
            return Ok(Extraction::Strict {
                records: reader.records()?,
                canon: Canonicalizer::new(kind, config),
            });
        }
        Err(e) if e.is_structural() => {
            warn!(path = %path.display(), %kind, error = %e, "strict decode failed; trying heuristics");
        }
        Err(e) => return Err(e),
    }

    let bytes = fs::read(path)?;
    let extraction = recover_bytes(bytes, kind, config);
    info!(path = %path.display(), %kind, source = %extraction.source(), "heuristic decode");
    Ok(extraction)
}

/// Heuristic path over an in-memory buffer.
pub fn recover_bytes(bytes: Vec<u8>, kind: RecordKind, config: &RecoveryConfig) -> Extraction {
    match kind {
        RecordKind::Account => match resolve(&bytes, &config.candidates, config.printability) {
            Some(r) => Extraction::Lines(LineRecords::new(r.text)),
            None => Extraction::Fixed(FixedOffsetRecords::new(
                bytes,
                config.fixed_layout.clone(),
                config.candidates.clone(),
                config.printability,
            )),
        },
        RecordKind::Cash => {
            if bytes.len() > config.max_scan_bytes {
                warn!(
                    len = bytes.len(),
                    cap = config.max_scan_bytes,
                    "buffer too large to scan"
                );
                return Extraction::Empty;
            }
            match resolve(&bytes, &config.candidates, config.printability) {
                Some(r) => Extraction::Pattern(PatternRecords::new(r.text)),
                None => Extraction::Empty,
            }
        }
    }
}
