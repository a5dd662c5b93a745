//! Value streams
//!
//! Turns an arbitrary model value into the sequence it stands for. Strings go
//! through the range grammar, sequences are walked element by element, and a
//! mapping becomes a [`Record`] whose marked fields hold their own streams.
//! Streams only move when [`ValueStream::advance`] is called, so sibling
//! fields stay aligned position by position.

use serde_yaml::{Mapping, Value};

use super::range::{expand_pattern, PatternSeq};
use crate::model::marked_name;

/// The sequence denoted by one model value
#[derive(Debug, Clone)]
pub enum ValueStream {
    /// Elements of a sequence, verbatim and in order
    Items(std::vec::IntoIter<Value>),
    /// A range pattern producing strings
    Pattern(PatternSeq),
    /// Scalar that repeats forever
    Constant(Value),
    /// Mapping with streamed fields, repeats forever
    Record(Record),
}

impl ValueStream {
    /// Whether this stream (or anything nested in it) can run out
    pub fn is_bounded(&self) -> bool {
        match self {
            ValueStream::Items(_) | ValueStream::Pattern(_) => true,
            ValueStream::Constant(_) => false,
            ValueStream::Record(record) => record.is_bounded(),
        }
    }

    /// Produce the next concrete value, `None` once a finite part is spent
    pub fn advance(&mut self) -> Option<Value> {
        match self {
            ValueStream::Items(items) => items.next(),
            ValueStream::Pattern(seq) => seq.next().map(Value::String),
            ValueStream::Constant(value) => Some(value.clone()),
            ValueStream::Record(record) => record.advance().map(Value::Mapping),
        }
    }
}

impl Iterator for ValueStream {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.advance()
    }
}

/// Build the stream for `value`
pub fn expand_value(value: &Value) -> ValueStream {
    match value {
        Value::Sequence(items) => ValueStream::Items(items.clone().into_iter()),
        Value::Mapping(mapping) => ValueStream::Record(Record::from_mapping(mapping)),
        Value::String(text) => match expand_pattern(text) {
            PatternSeq::Constant(_) => ValueStream::Constant(value.clone()),
            seq => ValueStream::Pattern(seq),
        },
        other => ValueStream::Constant(other.clone()),
    }
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone)]
enum Field {
    Fixed(Value),
    Stream(ValueStream),
}

/// A mapping being expanded field by field.
///
/// Marked keys (`=name`) lose their marker and hold a stream; other keys are
/// copied through on every step.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<(Value, Field)>,
}

impl Record {
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut record = Record {
            fields: Vec::with_capacity(mapping.len()),
        };
        for (key, value) in mapping {
            match marked_name(key) {
                Some(name) => {
                    record.set(Value::String(name.to_string()), Field::Stream(expand_value(value)))
                }
                None => record.set(key.clone(), Field::Fixed(value.clone())),
            }
        }
        record
    }

    // A marked field replaces an unmarked one of the same name, never the
    // other way round.
    fn set(&mut self, key: Value, field: Field) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => {
                if matches!(field, Field::Stream(_)) || matches!(slot, Field::Fixed(_)) {
                    *slot = field;
                }
            }
            None => self.fields.push((key, field)),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.fields.iter().any(|(_, field)| match field {
            Field::Fixed(_) => false,
            Field::Stream(stream) => stream.is_bounded(),
        })
    }

    /// Step every streamed field once, in key order, and assemble the result.
    ///
    /// Returns `None` as soon as one field is exhausted; whatever was already
    /// pulled for this step is dropped.
    pub fn advance(&mut self) -> Option<Mapping> {
        let mut out = Mapping::with_capacity(self.fields.len());
        for (key, field) in &mut self.fields {
            let value = match field {
                Field::Fixed(value) => value.clone(),
                Field::Stream(stream) => stream.advance()?,
            };
            out.insert(key.clone(), value);
        }
        Some(out)
    }
}
