//! Decoded values and records.

use core::fmt;

use chrono::NaiveDateTime;

/// A decoded field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A raw unsigned integer, such as a pressure or an event count.
    Unsigned(u64),
    /// A duration, scaled from a raw byte.
    Duration(f64),
    /// A calendar date and time, unpacked from a bit-packed field.
    Timestamp(NaiveDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            // `Debug` keeps the fractional part of integral floats (`36.0`).
            Self::Duration(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A decoded record: named values in layout order.
///
/// Padding never appears in a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    /// Append a field value.
    pub fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    /// Find the value of a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Field names, in layout order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    /// Field values, in layout order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    /// Named field values, in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(&'static str, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn render_values() {
        let t = NaiveDate::from_ymd_opt(2014, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 2)
            .unwrap();

        assert_eq!(Value::Unsigned(42).to_string(), "42");
        assert_eq!(Value::Duration(36.0).to_string(), "36.0");
        assert_eq!(Value::Duration(0.5).to_string(), "0.5");
        assert_eq!(Value::Timestamp(t).to_string(), "2014-03-09 07:05:02");
    }

    #[test]
    fn lookup_preserves_order() {
        let record: Record = [
            ("b", Value::Unsigned(2)),
            ("a", Value::Unsigned(1)),
            ("c", Value::Duration(3.6)),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.names().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(record.get("a"), Some(&Value::Unsigned(1)));
        assert_eq!(record.get("z"), None);
        assert_eq!(record.len(), 3);
    }
}
