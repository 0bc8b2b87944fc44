//! Decoding of the document header block.

use thiserror::Error;

use super::check::Checksum;

/// Size of the header block at the start of every document.
pub const HEADER_SIZE: usize = 0x200;

/// Byte separating the text fields of the header block.
pub const HEADER_SEPARATOR: u8 = b'\r';

/// Expected content of the first header field.
pub const MAGIC: &str = "0201";

/// Header fields, by name and index into the separated header block.
pub const HEADER_FIELDS: [(&str, usize); 5] = [
    ("version", 0),
    ("filename", 1),
    ("serialnumber", 2),
    ("series", 3),
    ("model", 4),
];

/// An error decoding a header block.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The first field did not hold the magic number.
    #[error("0201 magic number not found (found {found:?}).")]
    MagicNotFound { found: String },
    /// The header block ended before a required field.
    #[error("Header field `{name}` (index {index}) is missing.")]
    MissingField { name: &'static str, index: usize },
}

/// A decoded document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: String,
    pub filename: String,
    pub serialnumber: String,
    pub series: String,
    pub model: String,
    /// Checksum byte found in the header. This is never verified.
    pub checksum: Checksum,
}

impl Header {
    /// Decode a header block.
    ///
    /// The magic number is checked before any other field is read, so a
    /// foreign file fails with [`HeaderError::MagicNotFound`] regardless of
    /// its length.
    pub fn decode(r: &[u8; HEADER_SIZE]) -> Result<Self, HeaderError> {
        let fields: Vec<&[u8]> = r.split(|b| *b == HEADER_SEPARATOR).collect();

        // `split` always yields at least one item.
        if fields[0] != MAGIC.as_bytes() {
            Err(HeaderError::MagicNotFound {
                found: String::from_utf8_lossy(fields[0]).into_owned(),
            })?;
        }

        let checksum = Checksum::capture(&fields);

        let [version, filename, serialnumber, series, model] =
            HEADER_FIELDS.map(|(name, index)| match fields.get(index) {
                Some(f) => Ok(String::from_utf8_lossy(f).into_owned()),
                None => Err(HeaderError::MissingField { name, index }),
            });

        let header = Self {
            version: version?,
            filename: filename?,
            serialnumber: serialnumber?,
            series: series?,
            model: model?,
            checksum,
        };

        log::debug!(
            "Decoded header for {:?} (serial {:?}, checksum {}).",
            header.filename,
            header.serialnumber,
            header.checksum
        );

        Ok(header)
    }

    /// Header field values, by name, in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            (HEADER_FIELDS[0].0, &self.version),
            (HEADER_FIELDS[1].0, &self.filename),
            (HEADER_FIELDS[2].0, &self.serialnumber),
            (HEADER_FIELDS[3].0, &self.series),
            (HEADER_FIELDS[4].0, &self.model),
        ]
    }
}
