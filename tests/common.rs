#![cfg(feature = "std")]

use std::{fs, path::Path};

use chrono::NaiveDate;
use csv::ReaderBuilder;
use fph::{
    avec::{self, FphFile, FromRecord, FromRecords, Variant, file::Error as FileError, reader},
    sans::{
        check::Checksum,
        header::{HEADER_SIZE, Header, HeaderError},
        layout::{SUMMARY, SUMMARY_RECORD_COUNT, SUMMARY_RECORD_SIZE},
        record::{Record, Value},
    },
};
use tempfile::TempDir;

/// A summary document with one record per day from 2014-03-01, each starting
/// at 22:30:00.
fn summary_document(records: usize) -> Vec<u8> {
    let mut r = vec![0; HEADER_SIZE];
    let text = b"0201\rSUM00001.FPH\r140512345678\rICON\rAUTO\r2014\r\x01\x02\x3c\r";
    r[..text.len()].copy_from_slice(text);

    for i in 0..records {
        let day = i as u16 + 1;
        let date: u16 = (14 << 9) | (3 << 5) | day;
        let time: u16 = (22 << 11) | (30 << 5);

        let mut record = [0xFF; SUMMARY_RECORD_SIZE];
        record[0..2].copy_from_slice(&date.to_le_bytes());
        record[2..4].copy_from_slice(&time.to_le_bytes());
        record[4] = 10 * day as u8;
        record[5] = 9 * day as u8;
        record[13..15].copy_from_slice(&(300 + day).to_le_bytes());
        record[15] = 40;
        record[16] = 100;
        record[18] = day as u8;
        record[19] = 2;
        record[20] = 0;
        record[24] = 80;
        record[25] = 90;
        record[28] = 3;
        r.extend_from_slice(&record);
    }

    r
}

fn write(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn decode_summary_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "SUM00001.FPH", &summary_document(SUMMARY_RECORD_COUNT));

    let FphFile::Summary(file) = FphFile::open(&path).unwrap() else {
        panic!("expected a summary file");
    };

    assert_eq!(file.header.version, "0201");
    assert_eq!(file.header.filename, "SUM00001.FPH");
    assert_eq!(file.header.serialnumber, "140512345678");
    assert_eq!(file.header.series, "ICON");
    assert_eq!(file.header.model, "AUTO");
    assert_eq!(file.header.checksum, Checksum::Unverified(0x3c));

    assert_eq!(file.records.len(), SUMMARY_RECORD_COUNT);

    for (i, record) in file.records.iter().enumerate() {
        let day = i as u32 + 1;
        let t = NaiveDate::from_ymd_opt(2014, 3, day)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();

        assert!(SUMMARY.field_names().eq(record.names()));
        assert_eq!(record.get("timestamp"), Some(&Value::Timestamp(t)));
        assert_eq!(
            record.get("runtime"),
            Some(&Value::Duration(f64::from(10 * day) * 3.6))
        );
        assert_eq!(
            record.get("leak90"),
            Some(&Value::Unsigned(300 + u64::from(day)))
        );
        assert_eq!(record.get("apneaEvents"), Some(&Value::Unsigned(day.into())));
        assert_eq!(record.get("humiditySetting"), Some(&Value::Unsigned(3)));
    }
}

#[test]
fn records_follow_file_order() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "SUM00002.FPH", &summary_document(SUMMARY_RECORD_COUNT));

    let file = FphFile::open(&path).unwrap();
    let days: Vec<_> = file
        .records()
        .iter()
        .map(|r| r.get("apneaEvents").cloned())
        .collect();

    let expected: Vec<_> = (1..=8).map(|d| Some(Value::Unsigned(d))).collect();
    assert_eq!(days, expected);
}

#[test]
fn decode_unsupported_variant() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "DET00001.FPH", &summary_document(0));

    let file = FphFile::open(&path).unwrap();

    assert_eq!(file.variant(), Variant::Unsupported);
    assert_eq!(file.header().model, "AUTO");
    assert!(file.records().is_empty());
}

#[test]
fn reject_foreign_file() {
    let dir = TempDir::new().unwrap();
    let mut data = summary_document(SUMMARY_RECORD_COUNT);
    data[..4].copy_from_slice(b"PK\x03\x04");
    let path = write(&dir, "SUM00003.FPH", &data);

    let err = FphFile::open(&path).unwrap_err();

    assert!(matches!(
        err,
        FileError::Decode(reader::Error::Header(HeaderError::MagicNotFound { .. }))
    ));
}

#[test]
fn reject_short_body() {
    let dir = TempDir::new().unwrap();
    let mut data = summary_document(SUMMARY_RECORD_COUNT);
    data.truncate(HEADER_SIZE + SUMMARY_RECORD_SIZE * 6 + 20);
    let path = write(&dir, "SUM00004.FPH", &data);

    let err = FphFile::open(&path).unwrap_err();

    assert!(matches!(
        err,
        FileError::Decode(reader::Error::TruncatedRecord {
            index: 6,
            expected: SUMMARY_RECORD_SIZE,
            found: 20,
        })
    ));
}

#[test]
fn reject_invalid_timestamp() {
    let dir = TempDir::new().unwrap();
    let mut data = summary_document(SUMMARY_RECORD_COUNT);
    let start = HEADER_SIZE + SUMMARY_RECORD_SIZE * 2;
    data[start..start + 4].fill(0);
    let path = write(&dir, "SUM00005.FPH", &data);

    let err = FphFile::open(&path).unwrap_err();

    assert!(matches!(
        err,
        FileError::Decode(reader::Error::Record { index: 2, .. })
    ));
}

#[test]
fn report_missing_file() {
    let err = FphFile::open(Path::new("/nonexistent/SUM00001.FPH")).unwrap_err();
    assert!(matches!(err, FileError::Open(_)));
}

#[test]
fn slice_and_reader_agree() {
    let data = summary_document(SUMMARY_RECORD_COUNT);

    let mut from_slice: Vec<Record> = Vec::new();
    let mut from_reader: Vec<Record> = Vec::new();

    let a = avec::decode_slice(&data, &SUMMARY, SUMMARY_RECORD_COUNT, &mut from_slice).unwrap();
    let b = avec::decode_reader(
        &mut data.as_slice(),
        &SUMMARY,
        SUMMARY_RECORD_COUNT,
        &mut from_reader,
    )
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(from_slice, from_reader);
}

#[test]
fn export_csv() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "SUM00006.FPH", &summary_document(SUMMARY_RECORD_COUNT));
    let file = FphFile::open(&path).unwrap();

    let mut out = Vec::new();
    file.write_csv(&mut out, false).unwrap();

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(out.as_slice());

    let headers = reader.headers().unwrap().clone();
    assert!(SUMMARY.field_names().eq(headers.iter()));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), SUMMARY_RECORD_COUNT);
    assert_eq!(&rows[0][0], "2014-03-01 22:30:00");
    assert_eq!(&rows[0][1], "36.0");
    assert_eq!(&rows[0][3], "301");
}

/// Counts records and keeps the header, ignoring field values.
#[derive(Default)]
struct Tally {
    header: Option<Header>,
    records: usize,
}

impl FromRecords for Tally {
    fn add_header(&mut self, header: &Header) {
        self.header = Some(header.clone());
    }

    fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
        self.records += 1;
        None
    }
}

#[test]
fn decode_into_custom_receiver() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "SUM00007.FPH", &summary_document(SUMMARY_RECORD_COUNT));

    let mut tally = Tally::default();
    let (variant, header) = avec::file::decode(&path, &mut tally).unwrap();

    assert_eq!(variant, Variant::Summary);
    assert_eq!(tally.records, SUMMARY_RECORD_COUNT);
    assert_eq!(tally.header, Some(header));
}

#[test]
fn decode_unsupported_header_only() {
    let dir = TempDir::new().unwrap();
    let mut data = summary_document(0);
    data.extend_from_slice(b"\x00\x01");
    let path = write(&dir, "DET00002.FPH", &data);

    let mut tally = Tally::default();
    let (variant, header) = avec::file::decode(&path, &mut tally).unwrap();

    assert_eq!(variant, Variant::Unsupported);
    assert_eq!(tally.records, 0);
    assert_eq!(tally.header, Some(header));
}
