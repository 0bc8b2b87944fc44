//! Transforms from raw field integers to meaningful values.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use tartan_bitfield::bitfield;
use thiserror::Error;
use zerocopy::FromBytes;

use super::record::Value;

/// Signature of a transform attached to a field descriptor.
pub type Transform = fn(u64) -> Result<Value, TransformError>;

/// An error transforming a raw field value.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Packed date and time components do not form a calendar date and time.
    #[error("Invalid timestamp ({0}).")]
    InvalidTimestamp(TimestampParts),
}

/// Seconds represented by one unit of a raw duration byte.
pub const DURATION_SCALE: f64 = 3.6;

/// Scale a raw duration byte.
pub fn duration(raw: u64) -> Result<Value, TransformError> {
    Ok(Value::Duration(raw as f64 * DURATION_SCALE))
}

/// Unpack a bit-packed date and time, failing on impossible components.
pub fn timestamp(raw: u64) -> Result<Value, TransformError> {
    let parts = TimestampParts::unpack(raw as u32);
    parts
        .to_datetime()
        .map(Value::Timestamp)
        .ok_or(TransformError::InvalidTimestamp(parts))
}

/// Components of a bit-packed timestamp, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParts {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimestampParts {
    /// Unpack the date word (low half) and time word (high half) of a
    /// little-endian timestamp field.
    pub fn unpack(raw: u32) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct PackedTimestamp {
            date: [u8; 2],
            time: [u8; 2],
        }

        let PackedTimestamp { date, time } = zerocopy::transmute!(raw.to_le_bytes());

        bitfield! {
            struct DateWord(u16) {
                [0..5] day: u8,
                [5..9] month: u8,
                [9..16] year: u8,
            }
        }

        bitfield! {
            struct TimeWord(u16) {
                [0..5] half_second: u8,
                [5..11] minute: u8,
                [11..16] hour: u8,
            }
        }

        let date = DateWord(u16::from_le_bytes(date));
        let time = TimeWord(u16::from_le_bytes(time));

        Self {
            year: 2000 + date.year() as u16,
            month: date.month(),
            day: date.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.half_second() * 2,
        }
    }

    /// Build a calendar date and time, if the components form one.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
        )
    }
}

impl fmt::Display for TimestampParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
