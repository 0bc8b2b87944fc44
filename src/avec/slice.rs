//! Slice-based decoder implementation.

use thiserror::Error;

use crate::sans::{
    header::{HEADER_SIZE, Header, HeaderError},
    layout::{RecordError, Schema},
};

use super::{FromRecords, decode_record};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// The slice ended within the header block.
    #[error("Header truncated ({found} of 512 bytes).")]
    TruncatedHeader { found: usize },
    /// Incorrect file header.
    #[error("Incorrect file header: {0}")]
    Header(#[from] HeaderError),
    /// The slice ended within a record.
    #[error("Record {index} truncated ({found} of {expected} bytes).")]
    TruncatedRecord {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// A record field could not be decoded.
    #[error("Record {index}: {source}")]
    Record { index: usize, source: RecordError },
}

impl Error {
    fn record(index: usize, err: RecordError) -> Self {
        match err {
            RecordError::Truncated { expected, found } => Self::TruncatedRecord {
                index,
                expected,
                found,
            },
            source => Self::Record { index, source },
        }
    }
}

/// Decode a document from a slice, publishing `count` records of a layout to
/// a receiver.
///
/// Returns the document header. Bytes after the final record are ignored.
///
/// This method is also re-exported as `fph::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    schema: &Schema,
    count: usize,
    o: &mut impl FromRecords,
) -> Result<Header, Error> {
    let block = r
        .first_chunk::<HEADER_SIZE>()
        .ok_or(Error::TruncatedHeader { found: r.len() })?;

    let header = Header::decode(block)?;
    o.add_header(&header);

    let body = &r[HEADER_SIZE..];

    for index in 0..count {
        let start = index * schema.size();
        let record = body.get(start..).unwrap_or_default();

        decode_record(schema, record, o).map_err(|e| Error::record(index, e))?;
        log::trace!("Decoded {} record {index}.", schema.name());
    }

    log::debug!("Decoded {count} {} records from a slice.", schema.name());

    Ok(header)
}
