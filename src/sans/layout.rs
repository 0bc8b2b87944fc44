//! Declarative record layouts.

use thiserror::Error;

use super::{
    record::{Record, Value},
    transform::{self, Transform, TransformError},
};

/// An error decoding a record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record bytes ended before the layout did.
    #[error("Record truncated ({found} of {expected} bytes).")]
    Truncated { expected: usize, found: usize },
    /// A field value could not be transformed.
    #[error("Field `{field}`: {source}")]
    Transform {
        field: &'static str,
        source: TransformError,
    },
}

/// Numeric kind of a field, stored as a little-endian unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    U8,
    U16,
    U32,
    U64,
}

impl Kind {
    /// Number of bytes occupied by a field of this kind.
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    /// Read a field of this kind from the start of a slice.
    ///
    /// The slice must hold at least [`Kind::width`] bytes.
    fn read(self, r: &[u8]) -> u64 {
        let n = self.width();
        let mut buf = [0; 8];
        buf[..n].copy_from_slice(&r[..n]);
        u64::from_le_bytes(buf)
    }
}

/// Description of a named field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: Kind,
    /// Reinterpretation of the raw integer. Without one, the field decodes to
    /// [`Value::Unsigned`].
    pub transform: Option<Transform>,
}

impl FieldDescriptor {
    pub const fn raw(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            transform: None,
        }
    }

    pub const fn with(name: &'static str, kind: Kind, transform: Transform) -> Self {
        Self {
            name,
            kind,
            transform: Some(transform),
        }
    }

    fn decode(&self, r: &[u8]) -> Result<Value, RecordError> {
        let raw = self.kind.read(r);

        match self.transform {
            Some(f) => f(raw).map_err(|source| RecordError::Transform {
                field: self.name,
                source,
            }),
            None => Ok(Value::Unsigned(raw)),
        }
    }
}

/// A slot in a record layout.
#[derive(Debug, Clone, Copy)]
pub enum Slot {
    Field(FieldDescriptor),
    /// Bytes to skip.
    Padding(usize),
}

impl Slot {
    pub const fn width(&self) -> usize {
        match self {
            Self::Field(f) => f.kind.width(),
            Self::Padding(n) => *n,
        }
    }
}

/// An ordered record layout.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    name: &'static str,
    slots: &'static [Slot],
    size: usize,
}

impl Schema {
    pub const fn new(name: &'static str, slots: &'static [Slot]) -> Self {
        let mut size = 0;
        let mut i = 0;

        while i < slots.len() {
            size += slots[i].width();
            i += 1;
        }

        Self { name, slots, size }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn slots(&self) -> &'static [Slot] {
        self.slots
    }

    /// Number of bytes in a record of this layout.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Names of the fields in a record of this layout, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Field(f) => Some(f.name),
            Slot::Padding(_) => None,
        })
    }

    /// Decode the named fields of a record, in layout order.
    ///
    /// Bytes beyond [`Schema::size`] are ignored.
    pub fn fields<'a>(&self, r: &'a [u8]) -> Result<Fields<'a>, RecordError> {
        if r.len() < self.size {
            Err(RecordError::Truncated {
                expected: self.size,
                found: r.len(),
            })?;
        }

        Ok(Fields {
            slots: self.slots.iter(),
            r: &r[..self.size],
        })
    }

    /// Decode a record.
    pub fn decode(&self, r: &[u8]) -> Result<Record, RecordError> {
        self.fields(r)?.collect()
    }
}

/// Iterator over the decoded fields of a record.
///
/// See [`Schema::fields`].
#[derive(Debug)]
pub struct Fields<'a> {
    slots: core::slice::Iter<'static, Slot>,
    r: &'a [u8],
}

impl Iterator for Fields<'_> {
    type Item = Result<(&'static str, Value), RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;
            let (bytes, rest) = self.r.split_at(slot.width());
            self.r = rest;

            match slot {
                Slot::Padding(_) => continue,
                Slot::Field(f) => return Some(f.decode(bytes).map(|v| (f.name, v))),
            }
        }
    }
}

/// Size of a summary record.
pub const SUMMARY_RECORD_SIZE: usize = 0x1D;

/// Number of records in the body of a summary document.
pub const SUMMARY_RECORD_COUNT: usize = 8;

/// Layout of a daily summary record.
pub const SUMMARY: Schema = Schema::new("summary", SUMMARY_SLOTS);

const SUMMARY_SLOTS: &[Slot] = &[
    Slot::Field(FieldDescriptor::with("timestamp", Kind::U32, transform::timestamp)),
    Slot::Field(FieldDescriptor::with("runtime", Kind::U8, transform::duration)),
    Slot::Field(FieldDescriptor::with("usage", Kind::U8, transform::duration)),
    Slot::Padding(7),
    Slot::Field(FieldDescriptor::raw("leak90", Kind::U16)),
    Slot::Field(FieldDescriptor::raw("lowPressure", Kind::U8)),
    Slot::Field(FieldDescriptor::raw("highPressure", Kind::U8)),
    Slot::Padding(1),
    Slot::Field(FieldDescriptor::raw("apneaEvents", Kind::U8)),
    Slot::Field(FieldDescriptor::raw("hypoapneaEvents", Kind::U8)),
    Slot::Field(FieldDescriptor::raw("flowlimitiationEvents", Kind::U8)),
    Slot::Padding(3),
    Slot::Field(FieldDescriptor::raw("pressure1", Kind::U8)),
    Slot::Field(FieldDescriptor::raw("pressure2", Kind::U8)),
    Slot::Padding(2),
    Slot::Field(FieldDescriptor::raw("humiditySetting", Kind::U8)),
];

const _: () = assert!(SUMMARY.size() == SUMMARY_RECORD_SIZE);
