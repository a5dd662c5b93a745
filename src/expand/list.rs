//! Model list expansion
//!
//! Expands one model mapping into the list of concrete records it denotes.
//! All marked fields advance together, so `=ip: 10.0.0.1-3` next to
//! `=hostname: node1-3` gives three records, not nine. The list ends when
//! the shortest finite field runs out.

use serde_yaml::Value;
use tracing::{debug, warn};

use super::range::is_range_pattern;
use super::value::Record;

/// Expand `model` into concrete records.
///
/// A mapping made only of plain strings with no range in them is returned
/// as-is. A non-mapping model is its own single record.
pub fn expand_list(model: &Value) -> Vec<Value> {
    let Some(mapping) = model.as_mapping() else {
        return vec![model.clone()];
    };

    let needs_expansion = mapping
        .values()
        .any(|value| value.as_str().map_or(true, is_range_pattern));
    if !needs_expansion {
        return vec![model.clone()];
    }

    let mut record = Record::from_mapping(mapping);
    if !record.is_bounded() {
        warn!("model has no finite range to expand; emitting a single record");
        return record
            .advance()
            .map(|first| vec![Value::Mapping(first)])
            .unwrap_or_default();
    }

    let records: Vec<Value> = std::iter::from_fn(|| record.advance())
        .map(Value::Mapping)
        .collect();
    debug!(count = records.len(), "expanded model");
    records
}
