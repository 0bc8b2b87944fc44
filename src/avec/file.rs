//! Whole-file decoding, with the document variant chosen by file name.
//!
//! _Requires Cargo feature `std`._

use std::{fs::File, io::BufReader, path::Path};

use thiserror::Error;

use crate::sans::{
    header::Header,
    layout::{SUMMARY, SUMMARY_RECORD_COUNT, Schema},
    record::Record,
};

use super::{FromRecords, reader};

/// File name prefix marking a summary document.
pub const SUMMARY_PREFIX: &str = "SUM";

/// Errors occurring while decoding a file.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened.
    #[error("Could not open file: {0}")]
    Open(#[from] std::io::Error),
    /// The file contents could not be decoded.
    #[error(transparent)]
    Decode(#[from] reader::Error),
}

/// Document variant, as determined by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Daily summary records.
    Summary,
    /// A variant whose body layout is not known. Only the header is decoded.
    Unsupported,
}

impl Variant {
    /// Determine the variant of a file from the first characters of its name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let name = path.as_ref().file_name().and_then(|n| n.to_str());

        match name {
            Some(n) if n.starts_with(SUMMARY_PREFIX) => Self::Summary,
            _ => Self::Unsupported,
        }
    }

    /// Record layout and count of the document body, if known.
    pub fn layout(&self) -> Option<(&'static Schema, usize)> {
        match self {
            Self::Summary => Some((&SUMMARY, SUMMARY_RECORD_COUNT)),
            Self::Unsupported => None,
        }
    }
}

/// A decoded `.FPH` file.
#[derive(Debug, Clone, PartialEq)]
pub enum FphFile {
    Summary(SummaryFile),
    Unsupported(UnsupportedFile),
}

impl FphFile {
    /// Open and decode a file, choosing the variant from its name.
    ///
    /// The file is closed before returning, whether or not decoding
    /// succeeded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut records: Vec<Record> = Vec::new();

        let (variant, header) = decode(path, &mut records)?;

        Ok(match variant {
            Variant::Summary => Self::Summary(SummaryFile { header, records }),
            Variant::Unsupported => {
                log::warn!(
                    "Body of {} is not decoded; its layout is unknown.",
                    path.display()
                );
                Self::Unsupported(UnsupportedFile { header })
            }
        })
    }

    pub fn header(&self) -> &Header {
        match self {
            Self::Summary(f) => &f.header,
            Self::Unsupported(f) => &f.header,
        }
    }

    /// Decoded records. Empty for unsupported variants.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Summary(f) => &f.records,
            Self::Unsupported(_) => &[],
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Self::Summary(_) => Variant::Summary,
            Self::Unsupported(_) => Variant::Unsupported,
        }
    }
}

/// A summary file: a header and its daily summary records, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFile {
    pub header: Header,
    pub records: Vec<Record>,
}

/// A file of a variant whose body is not decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedFile {
    pub header: Header,
}

/// Decode a file into a receiver, choosing the variant from its name.
///
/// Returns the variant and header. Records are published only for variants
/// with a known layout.
pub fn decode(path: impl AsRef<Path>, o: &mut impl FromRecords) -> Result<(Variant, Header), Error> {
    let path = path.as_ref();
    let variant = Variant::from_path(path);

    log::debug!("Opening {} as {variant:?}.", path.display());

    let mut r = BufReader::new(File::open(path)?);
    let header = match variant.layout() {
        Some((schema, count)) => reader::decode(&mut r, schema, count, o)?,
        None => reader::decode_header(&mut r, o)?,
    };

    Ok((variant, header))
}
