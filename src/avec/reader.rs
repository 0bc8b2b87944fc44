//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::Read;

use thiserror::Error;

use crate::sans::{
    header::{HEADER_SIZE, Header, HeaderError},
    layout::{RecordError, Schema},
};

use super::{FromRecords, decode_record};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The reader ended within the header block.
    #[error("Header truncated ({found} of 512 bytes).")]
    TruncatedHeader { found: usize },
    /// Incorrect file header.
    #[error("Incorrect file header: {0}")]
    Header(#[from] HeaderError),
    /// The reader ended within a record.
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

/// Decode a document from a reader, publishing `count` records of a layout
/// to a receiver.
///
/// Returns the document header. Exactly the header block and `count` records
/// are read; the reader is left positioned after the final record.
///
/// This method is also re-exported as `fph::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    schema: &Schema,
    count: usize,
    o: &mut impl FromRecords,
) -> Result<Header, Error> {
    let header = decode_header(r, o)?;

    let mut buf = vec![0; schema.size()];

    for index in 0..count {
        let found = take(r, &mut buf)?;

        decode_record(schema, &buf[..found], o).map_err(|e| Error::record(index, e))?;
        log::trace!("Decoded {} record {index}.", schema.name());
    }

    log::debug!("Decoded {count} {} records from a reader.", schema.name());

    Ok(header)
}

/// Decode only the header block from a reader, publishing it to a receiver.
///
/// The reader is left positioned at the start of the document body.
pub fn decode_header(r: &mut impl Read, o: &mut impl FromRecords) -> Result<Header, Error> {
    let mut block = [0; HEADER_SIZE];
    let found = take(r, &mut block)?;

    if found != HEADER_SIZE {
        Err(Error::TruncatedHeader { found })?;
    }

    let header = Header::decode(&block)?;
    o.add_header(&header);

    Ok(header)
}

/// Fill a buffer from a reader, stopping early only at the end of input.
///
/// Returns the number of bytes read.
fn take(r: &mut impl Read, buf: &mut [u8]) -> Result<usize, Error> {
    let mut found = 0;

    while found < buf.len() {
        match r.read(&mut buf[found..]) {
            Ok(0) => break,
            Ok(n) => found += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => Err(e)?,
        }
    }

    Ok(found)
}
