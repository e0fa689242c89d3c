use crate::record::{GenericRecord, keys};
use crate::recover::splitter::split_code_name;

/// Account recovery for files that decode to readable text: one candidate
/// per non-blank line, kept when the line splits into code and name.
pub struct LineRecords {
    text: String,
    pos: usize,
    skipped: usize,
}

impl LineRecords {
    pub fn new(text: String) -> Self {
        Self {
            text,
            pos: 0,
            skipped: 0,
        }
    }

    /// Non-blank lines that did not look like an account label.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn next_line(&mut self) -> Option<(usize, usize)> {
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let start = self.pos;
        let (len, sep) = match rest.find(['\r', '\n']) {
            Some(i) if rest[i..].starts_with("\r\n") => (i, 2),
            Some(i) => (i, 1),
            None => (rest.len(), 0),
        };
        self.pos += len + sep;
        Some((start, start + len))
    }
}

impl Iterator for LineRecords {
    type Item = GenericRecord;

    fn next(&mut self) -> Option<GenericRecord> {
        while let Some((start, end)) = self.next_line() {
            let line = &self.text[start..end];
            if line.trim().is_empty() {
                continue;
            }
            match split_code_name(line) {
                Some(cn) if !cn.code.is_empty() && !cn.name.is_empty() => {
                    return Some(
                        GenericRecord::new()
                            .with_text(keys::CUSTOMER_CODE, cn.code)
                            .with_text(keys::CUSTOMER_NAME, cn.name),
                    );
                }
                _ => self.skipped += 1,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_line_endings() {
        let text = "UHA / 5494\r\n\r\n5001 KMR\rnoise line\nCV-12/77";
        let mut it = LineRecords::new(text.to_string());
        let got: Vec<_> = it
            .by_ref()
            .map(|r| (r.text(keys::CUSTOMER_CODE).unwrap(), r.text(keys::CUSTOMER_NAME).unwrap()))
            .collect();
        assert_eq!(
            got,
            [
                ("5494".to_string(), "UHA".to_string()),
                ("5001".to_string(), "KMR".to_string()),
                ("77".to_string(), "CV-12".to_string()),
            ]
        );
        assert_eq!(it.skipped(), 1);
    }

    #[test]
    fn empty_text() {
        assert_eq!(LineRecords::new(String::new()).count(), 0);
        assert_eq!(LineRecords::new("\n\n  \r\n".into()).count(), 0);
    }
}
