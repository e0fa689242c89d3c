use crate::codec::{self, FieldValue};
use crate::container::fields::{FieldDescriptor, read_table};
use crate::container::header::{DELETED_MARKER, FileHeader, HEADER_LEN};
use crate::error::{FilError, Result};
use crate::text::encoding::LegacyEncoding;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// One non-deleted physical record, fields in descriptor order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub index: u32,
    pub values: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

/// A dBase table whose header and field table decoded cleanly.
pub struct StrictReader<R> {
    inner: R,
    header: FileHeader,
    fields: Arc<[FieldDescriptor]>,
    encoding: LegacyEncoding,
}

impl StrictReader<File> {
    /// Unbuffered: each record step is a single `read_exact` on the file.
    pub fn open(path: &Path, encoding: LegacyEncoding) -> Result<Self> {
        Self::from_reader(File::open(path)?, encoding)
    }
}

impl<R: Read + Seek> StrictReader<R> {
    /// Read and validate the header and field table. Anything short of that
    /// is a structural failure.
    pub fn from_reader(mut inner: R, encoding: LegacyEncoding) -> Result<Self> {
        let file_len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        let header = FileHeader::read_from(&mut inner).map_err(|e| {
            FilError::structural(format!("header unreadable ({file_len} bytes): {e}"))
        })?;
        header.validate(file_len)?;

        inner.seek(SeekFrom::Start(HEADER_LEN))?;
        let fields = read_table(&mut inner, &header)?;
        debug!(
            file_type = header.file_type,
            records = header.record_count,
            fields = fields.len(),
            "dbase header decoded"
        );

        Ok(Self {
            inner,
            header,
            fields: fields.into(),
            encoding,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn encoding(&self) -> LegacyEncoding {
        self.encoding
    }

    /// Position at the data area and hand out the lazy record stream.
    pub fn records(mut self) -> Result<Records<R>> {
        self.inner
            .seek(SeekFrom::Start(self.header.data_offset()))?;
        Ok(Records {
            buf: vec![0u8; self.header.record_length as usize],
            remaining: self.header.record_count as u32,
            inner: self.inner,
            fields: self.fields,
            encoding: self.encoding,
            index: 0,
            deleted: 0,
            done: false,
        })
    }
}

/// Pull-based record cursor: each step reads exactly one record.
pub struct Records<R> {
    inner: R,
    fields: Arc<[FieldDescriptor]>,
    encoding: LegacyEncoding,
    buf: Vec<u8>,
    remaining: u32,
    index: u32,
    deleted: u32,
    done: bool,
}

impl<R> Records<R> {
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Records skipped so far because of the deletion marker.
    pub fn deleted(&self) -> u32 {
        self.deleted
    }

    fn decode_current(&self, index: u32) -> Record {
        let values = self
            .fields
            .iter()
            .map(|fd| {
                let start = fd.offset.min(self.buf.len());
                let end = fd.end().min(self.buf.len());
                let v = codec::decode(
                    fd.field_type,
                    &self.buf[start..end],
                    fd.length as usize,
                    fd.decimal_count,
                    self.encoding,
                );
                (fd.name.clone(), v)
            })
            .collect();
        Record { index, values }
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        while !self.done && self.remaining > 0 {
            self.remaining -= 1;
            if let Err(e) = self.inner.read_exact(&mut self.buf) {
                if e.kind() == ErrorKind::UnexpectedEof {
                    debug!(index = self.index, "record stream truncated");
                } else {
                    warn!(index = self.index, error = %e, "record read failed; stopping");
                }
                self.done = true;
                break;
            }
            let index = self.index;
            self.index += 1;
            if self.buf.first() == Some(&DELETED_MARKER) {
                self.deleted += 1;
                continue;
            }
            return Some(self.decode_current(index));
        }
        None
    }
}
