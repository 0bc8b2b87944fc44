//! Bookkeeping for the header checksum.
//!
//! The final byte of the seventh header field holds a checksum. How the
//! device computes it is not known, so the byte is captured and reported
//! without being checked against anything.

use core::fmt;

/// Index of the header field whose final byte holds the checksum.
pub const CHECKSUM_FIELD: usize = 6;

/// Status of the header checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    /// A checksum byte was found, but not verified.
    Unverified(u8),
    /// The checksum field was missing or empty.
    Absent,
}

impl Checksum {
    /// Capture the checksum byte from the separated fields of a header block.
    pub fn capture(fields: &[&[u8]]) -> Self {
        match fields.get(CHECKSUM_FIELD).and_then(|f| f.last()) {
            Some(&b) => Self::Unverified(b),
            None => Self::Absent,
        }
    }

    /// The captured byte, if any.
    pub fn byte(&self) -> Option<u8> {
        match self {
            Self::Unverified(b) => Some(*b),
            Self::Absent => None,
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unverified(b) => write!(f, "unverified(0x{b:02x})"),
            Self::Absent => f.write_str("absent"),
        }
    }
}
