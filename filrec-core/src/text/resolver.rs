use super::encoding::LegacyEncoding;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANDIDATES: [LegacyEncoding; 4] = [
    LegacyEncoding::Windows1252,
    LegacyEncoding::Ascii,
    LegacyEncoding::Utf8,
    LegacyEncoding::Cp437,
];

/// Scoring knobs for [`resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Printability {
    /// Number of leading characters inspected.
    pub sample_chars: usize,
    /// Minimum fraction of ASCII 32..=126 characters (exclusive).
    pub min_ratio: f64,
}

impl Default for Printability {
    fn default() -> Self {
        Self {
            sample_chars: 1000,
            min_ratio: 0.70,
        }
    }
}

/// A successful resolution: the winning encoding and the full decoded text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub encoding: LegacyEncoding,
    pub text: String,
}

pub fn printable_ratio(text: &str, sample_chars: usize) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars().take(sample_chars) {
        total += 1;
        if (' '..='~').contains(&c) {
            printable += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}

/// Try each candidate in order; the first whose text looks printable wins.
pub fn resolve(bytes: &[u8], candidates: &[LegacyEncoding], p: Printability) -> Option<Resolved> {
    candidates.iter().find_map(|&encoding| {
        let text = encoding.decode(bytes);
        (printable_ratio(&text, p.sample_chars) > p.min_ratio)
            .then_some(Resolved { encoding, text })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_resolves_to_first_candidate() {
        let r = resolve(b"UHA    / 5494", &DEFAULT_CANDIDATES, Printability::default()).unwrap();
        assert_eq!(r.encoding, LegacyEncoding::Windows1252);
        assert_eq!(r.text, "UHA    / 5494");
    }

    #[test]
    fn binary_noise_is_rejected() {
        let noise = [0u8; 64];
        assert!(resolve(&noise, &DEFAULT_CANDIDATES, Printability::default()).is_none());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(resolve(&[], &DEFAULT_CANDIDATES, Printability::default()).is_none());
    }

    #[test]
    fn ratio_only_counts_the_sample_window() {
        // 10 printable chars then 990 NULs then printable tail: sample of 10 is fully printable.
        let mut bytes = b"ABCDEFGHIJ".to_vec();
        bytes.extend(std::iter::repeat_n(0u8, 990));
        let p = Printability {
            sample_chars: 10,
            min_ratio: 0.7,
        };
        assert!(resolve(&bytes, &DEFAULT_CANDIDATES, p).is_some());
        assert!(resolve(&bytes, &DEFAULT_CANDIDATES, Printability::default()).is_none());
    }

    #[test]
    fn threshold_is_exclusive() {
        // exactly 70% printable must not qualify
        let mut bytes = vec![b'a'; 7];
        bytes.extend([0u8; 3]);
        assert!(resolve(&bytes, &DEFAULT_CANDIDATES, Printability::default()).is_none());
        bytes.push(b'b');
        assert!(resolve(&bytes, &DEFAULT_CANDIDATES, Printability::default()).is_some());
    }
}
