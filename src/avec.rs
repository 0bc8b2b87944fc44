//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode whole documents from files, readers
//! and data slices, publishing to the [`FromRecords`] and [`FromRecord`]
//! traits. [`FphFile`] wraps these for the common case of opening a file and
//! collecting its records.
//!
//! When records should land in a type of their own, [`FromRecord`] can be
//! derived. See the [`FromRecord`](macro@FromRecord) macro for details.

#[cfg(feature = "std")]
pub mod export;
#[cfg(feature = "std")]
pub mod file;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use file::{FphFile, SummaryFile, UnsupportedFile, Variant};
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

use chrono::NaiveDateTime;

use crate::sans::{
    header::Header,
    layout::{RecordError, Schema},
    record::{Record, Value},
};

/// Produce record receivers for a document.
///
/// Implemented for `Vec<T>`, which collects one `T` per record.
pub trait FromRecords {
    /// Receive the document header. The default implementation ignores it.
    #[allow(unused_variables)]
    fn add_header(&mut self, header: &Header) {}

    /// Retrieve a receiver for the next record, if one exists.
    fn add_record(&mut self) -> Option<&mut dyn FromRecord>;
}

impl<T: FromRecord + Default> FromRecords for Vec<T> {
    fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
        self.push(Default::default());
        self.last_mut().map(|r| r as _)
    }
}

/// Derive [`FromRecord`] for a struct representing a single record.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a field, add the `field("name")` attribute to an `Option<T>`
/// struct field, where `name` is the field name in the record layout and `T`
/// is the type the field decodes to: `u64` for raw integers, `f64` for
/// durations or `NaiveDateTime` for timestamps.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Summary {
///     #[field("timestamp")]
///     timestamp: Option<NaiveDateTime>,
///     #[field("usage")]
///     usage: Option<f64>,
///     #[field("apneaEvents")]
///     apnea_events: Option<u64>,
/// }
/// ```
///
/// To convert on arrival, supply a handler closure. Since the value type
/// cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Summary {
///     #[field("leak90", |v, x: u64| *v = u16::try_from(x).ok())]
///     leak: Option<u16>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use fph_derive::FromRecord;

/// Receive field values for a record.
///
/// Values are published in layout order, after transforms have been applied.
/// Padding is never published.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromRecord`](macro@FromRecord) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromRecord {
    /// Add a raw unsigned integer for a field to the record.
    fn add_unsigned(&mut self, field: &'static str, _: u64) {}
    /// Add a duration for a field to the record.
    fn add_duration(&mut self, field: &'static str, _: f64) {}
    /// Add a timestamp for a field to the record.
    fn add_timestamp(&mut self, field: &'static str, _: NaiveDateTime) {}
}

impl FromRecord for Record {
    fn add_unsigned(&mut self, field: &'static str, value: u64) {
        self.push(field, Value::Unsigned(value));
    }
    fn add_duration(&mut self, field: &'static str, value: f64) {
        self.push(field, Value::Duration(value));
    }
    fn add_timestamp(&mut self, field: &'static str, value: NaiveDateTime) {
        self.push(field, Value::Timestamp(value));
    }
}

/// Publish a decoded value to a receiver.
fn publish(o: &mut dyn FromRecord, field: &'static str, value: Value) {
    match value {
        Value::Unsigned(v) => o.add_unsigned(field, v),
        Value::Duration(v) => o.add_duration(field, v),
        Value::Timestamp(v) => o.add_timestamp(field, v),
    }
}

/// Decode a record, publishing its fields to the next receiver of a document.
fn decode_record(schema: &Schema, r: &[u8], o: &mut impl FromRecords) -> Result<(), RecordError> {
    // Decode every field before asking for a receiver, so a failed record
    // leaves nothing behind.
    let fields = schema.fields(r)?.collect::<Result<Vec<_>, _>>()?;

    if let Some(o) = o.add_record() {
        for (name, value) in fields {
            publish(o, name, value);
        }
    }

    Ok(())
}
