use crate::container::fields::FieldDescriptor;
use crate::container::header::FileHeader;
use crate::error::Result;
use crate::read::strict::{Record, StrictReader};
use crate::text::encoding::LegacyEncoding;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const HEX_DUMP_LEN: usize = 512;
pub const HEX_DUMP_WIDTH: usize = 16;

/// Header, field table and the first few records of a strictly readable file.
#[derive(Debug)]
pub struct Inspection {
    pub header: FileHeader,
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<Record>,
    /// Deleted records passed over while collecting `records`.
    pub deleted: u32,
}

pub fn inspect(path: &Path, encoding: LegacyEncoding, limit: usize) -> Result<Inspection> {
    let reader = StrictReader::open(path, encoding)?;
    let header = *reader.header();
    let fields = reader.fields().to_vec();
    let mut it = reader.records()?;
    let records = it.by_ref().take(limit).collect();
    Ok(Inspection {
        header,
        fields,
        records,
        deleted: it.deleted(),
    })
}

/// First `n` bytes of a file (fewer if the file is shorter).
pub fn read_prefix(path: &Path, n: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(n);
    File::open(path)?.take(n as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Offset, hex bytes and printable ASCII, `width` bytes per line.
pub fn hex_dump(bytes: &[u8], width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    for (i, row) in bytes.chunks(width).enumerate() {
        let _ = write!(out, "{:08X}  ", i * width);
        for b in row {
            let _ = write!(out, "{b:02X} ");
        }
        for _ in row.len()..width {
            out.push_str("   ");
        }
        out.push(' ');
        out.extend(
            row.iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' }),
        );
        out.push('\n');
    }
    out
}
