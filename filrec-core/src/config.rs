use crate::error::{FilError, Result};
use crate::recover::fixed::FixedLayout;
use crate::text::encoding::LegacyEncoding;
use crate::text::resolver::{DEFAULT_CANDIDATES, Printability};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Knobs for decoding and recovery. Every field has a default, so a config
/// document only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Code page for Character fields of strictly decoded files.
    pub code_page: LegacyEncoding,
    /// Tried in order by the encoding resolver.
    pub candidates: Vec<LegacyEncoding>,
    pub printability: Printability,
    pub fixed_layout: FixedLayout,
    /// Buffers larger than this are not pattern-scanned.
    pub max_scan_bytes: usize,
    /// Extra strict field name -> canonical key mappings (matched case-insensitively).
    pub aliases: BTreeMap<String, String>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            code_page: LegacyEncoding::Windows1252,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            printability: Printability::default(),
            fixed_layout: FixedLayout::default(),
            max_scan_bytes: 64 << 20,
            aliases: BTreeMap::new(),
        }
    }
}

impl RecoveryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(FilError::Config("no candidate encodings".into()));
        }
        let r = self.printability.min_ratio;
        if !(0.0..1.0).contains(&r) {
            return Err(FilError::Config(format!(
                "printable ratio must be in [0, 1), got {r}"
            )));
        }
        if self.printability.sample_chars == 0 {
            return Err(FilError::Config("sample size must be positive".into()));
        }
        if !self.fixed_layout.is_consistent() {
            return Err(FilError::Config(format!(
                "fixed layout does not fit a {}-byte slot",
                self.fixed_layout.record_len
            )));
        }
        Ok(())
    }

    /// Canonical key for a strict field name, if an alias is configured.
    pub fn alias_for(&self, field: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(field))
            .map(|(_, v)| v.as_str())
    }
}
