use crate::error::{FilError, Result};
use std::io::Read;
use time::{Date, Month};

pub const HEADER_LEN: u64 = 32;
/// Smallest plausible header: fixed part plus the 0x0D terminator.
pub const MIN_HEADER_LENGTH: i16 = 33;
pub const DELETED_MARKER: u8 = 0x2A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub file_type: u8,
    /// `None` when the stored year/month/day do not form a calendar date.
    pub last_update: Option<Date>,
    pub record_count: i32,
    pub header_length: i16,
    pub record_length: i16,
}

impl FileHeader {
    pub fn read_from(mut r: impl Read) -> std::io::Result<Self> {
        let mut buf = [0u8; HEADER_LEN as usize];
        r.read_exact(&mut buf)?;
        Ok(Self::parse(&buf))
    }

    /// Layout: [0]=type, [1..4]=yy/mm/dd, [4..8]=records, [8..10]=header len,
    /// [10..12]=record len, [12..32]=reserved.
    pub fn parse(buf: &[u8; HEADER_LEN as usize]) -> Self {
        Self {
            file_type: buf[0],
            last_update: last_update(buf[1], buf[2], buf[3]),
            record_count: i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            header_length: i16::from_le_bytes([buf[8], buf[9]]),
            record_length: i16::from_le_bytes([buf[10], buf[11]]),
        }
    }

    /// Reject headers that cannot describe a real table of `file_len` bytes.
    pub fn validate(&self, file_len: u64) -> Result<()> {
        if self.header_length < MIN_HEADER_LENGTH {
            return Err(FilError::structural(format!(
                "header length {} below minimum {MIN_HEADER_LENGTH}",
                self.header_length
            )));
        }
        if self.record_length < 1 {
            return Err(FilError::structural(format!(
                "record length {} must be positive",
                self.record_length
            )));
        }
        if self.record_count < 0 {
            return Err(FilError::structural(format!(
                "negative record count {}",
                self.record_count
            )));
        }
        if self.header_length as u64 > file_len {
            return Err(FilError::structural(format!(
                "header length {} exceeds file size {file_len}",
                self.header_length
            )));
        }
        Ok(())
    }

    pub fn data_offset(&self) -> u64 {
        self.header_length.max(0) as u64
    }
}

fn last_update(yy: u8, mm: u8, dd: u8) -> Option<Date> {
    let month = Month::try_from(mm).ok()?;
    Date::from_calendar_date(1900 + yy as i32, month, dd).ok()
}
