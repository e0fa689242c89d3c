use crate::codec::FieldType;
use crate::container::header::{FileHeader, HEADER_LEN};
use crate::error::{FilError, Result};
use std::io::Read;

pub const DESCRIPTOR_SIZE: usize = 32;
pub const NAME_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub data_address: i32,
    pub length: u8,
    pub decimal_count: u8,
    /// Byte offset inside a record, counting the leading deletion marker.
    pub offset: usize,
}

impl FieldDescriptor {
    pub fn end(&self) -> usize {
        self.offset + self.length as usize
    }
}

fn field_name(raw: &[u8]) -> String {
    let cut = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..cut])
        .trim_end_matches(' ')
        .to_string()
}

/// Layout: [0..11]=name, [11]=type, [12..16]=data address, [16]=length,
/// [17]=decimal count, [18..32]=reserved.
pub fn parse_descriptor(e: &[u8; DESCRIPTOR_SIZE], offset: usize) -> FieldDescriptor {
    FieldDescriptor {
        name: field_name(&e[..NAME_LEN]),
        field_type: FieldType::from_tag(e[11]),
        data_address: i32::from_le_bytes([e[12], e[13], e[14], e[15]]),
        length: e[16],
        decimal_count: e[17],
        offset,
    }
}

/// Read descriptors from a reader positioned at byte 32 until the cursor
/// reaches `header_length - 1`.
pub fn read_table(r: &mut impl Read, header: &FileHeader) -> Result<Vec<FieldDescriptor>> {
    let end = (header.header_length as i64 - 1).max(0) as u64;
    let mut pos = HEADER_LEN;
    let mut out = Vec::new();
    let mut offset = 1usize;
    let mut buf = [0u8; DESCRIPTOR_SIZE];

    while pos < end {
        r.read_exact(&mut buf).map_err(|e| {
            FilError::structural(format!(
                "field descriptor {} at offset {pos} unreadable: {e}",
                out.len()
            ))
        })?;
        let fd = parse_descriptor(&buf, offset);
        offset = fd.end();
        out.push(fd);
        pos += DESCRIPTOR_SIZE as u64;
    }

    if offset > header.record_length as usize {
        return Err(FilError::structural(format!(
            "fields span {offset} bytes but record length is {}",
            header.record_length
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, tag: u8, len: u8, dec: u8) -> [u8; 32] {
        let mut d = [0u8; 32];
        d[..name.len()].copy_from_slice(name.as_bytes());
        d[11] = tag;
        d[16] = len;
        d[17] = dec;
        d
    }

    fn header(hlen: i16, rlen: i16) -> FileHeader {
        FileHeader {
            file_type: 3,
            last_update: None,
            record_count: 0,
            header_length: hlen,
            record_length: rlen,
        }
    }

    #[test]
    fn reads_descriptors_and_offsets() {
        let mut bytes = Vec::new();
        bytes.extend(descriptor("ANAME", b'C', 30, 0));
        bytes.extend(descriptor("OPBAL", b'N', 11, 2));
        bytes.push(0x0D);
        let h = header(32 + 64 + 1, 42);
        let fields = read_table(&mut &bytes[..], &h).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "ANAME");
        assert_eq!(fields[0].field_type, FieldType::Character);
        assert_eq!(fields[0].offset, 1);
        assert_eq!(fields[1].name, "OPBAL");
        assert_eq!(fields[1].field_type, FieldType::Numeric);
        assert_eq!(fields[1].decimal_count, 2);
        assert_eq!(fields[1].offset, 31);
        assert_eq!(fields[1].end(), 42);
    }

    #[test]
    fn name_stops_at_nul_and_trims_spaces() {
        let mut d = descriptor("CODE ", b'C', 4, 0);
        d[6] = b'Z'; // garbage after the terminator
        assert_eq!(parse_descriptor(&d, 1).name, "CODE");
    }

    #[test]
    fn header_of_33_has_no_fields() {
        let fields = read_table(&mut &[0x0Du8][..], &header(33, 20)).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn truncated_table_is_structural() {
        let bytes = descriptor("A", b'C', 5, 0);
        let err = read_table(&mut &bytes[..20], &header(32 + 32 + 1, 6)).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn fields_wider_than_record_are_structural() {
        let bytes = descriptor("A", b'C', 50, 0);
        let err = read_table(&mut &bytes[..], &header(32 + 32 + 1, 10)).unwrap_err();
        assert!(err.is_structural());
    }
}
