//! Delimited text export of decoded records.
//!
//! _Requires Cargo feature `std`._

use std::io::Write;

use csv::WriterBuilder;

use crate::sans::{header::Header, record::Record};

use super::file::FphFile;

/// Field delimiter of exported text.
pub const CSV_SEPARATOR: u8 = b';';

/// Write records as delimited text.
///
/// Rows are written in this order:
///
/// - If `header` is supplied, a metadata row of `name=value` cells for each
///   header field, followed by the checksum status.
/// - If there are any records, a row of field names taken from the first
///   record, then one row of values per record.
pub fn write_csv(w: impl Write, header: Option<&Header>, records: &[Record]) -> Result<(), csv::Error> {
    let mut w = WriterBuilder::new()
        .delimiter(CSV_SEPARATOR)
        .flexible(true)
        .from_writer(w);

    if let Some(header) = header {
        let cells = header
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .chain([format!("checksum={}", header.checksum)]);

        w.write_record(cells)?;
    }

    if let Some(first) = records.first() {
        w.write_record(first.names())?;

        for record in records {
            w.write_record(record.values().map(|v| v.to_string()))?;
        }
    }

    w.flush()?;

    Ok(())
}

impl FphFile {
    /// Write this file's records as delimited text. See [`write_csv`].
    pub fn write_csv(&self, w: impl Write, show_header: bool) -> Result<(), csv::Error> {
        write_csv(w, show_header.then(|| self.header()), self.records())
    }
}
