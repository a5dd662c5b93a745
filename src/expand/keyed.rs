//! Keyed model expansion
//!
//! Expands a mapping whose marked keys are themselves patterns, e.g. a
//! `hosts` section written as `=compute01-03: {...}`. Each generated key is
//! paired with the matching record from [`expand_list`] on the key's value.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::list::expand_list;
use super::value::expand_value;
use crate::merge::merge;
use crate::model::marked_name;

/// Expand marked keys of `model` into one flat mapping.
///
/// Plain keys are copied, merging into an entry already stored under the
/// same key. For a marked key the stored entry looked up is the one under
/// the stripped pattern text (`compute01-03`), not under the generated key;
/// when that entry is missing, which is the usual case, the generated key
/// is simply assigned.
pub fn expand_keyed(model: &Mapping) -> Mapping {
    let mut result = Mapping::with_capacity(model.len());

    for (key, value) in model {
        let Some(base) = marked_name(key) else {
            store(&mut result, key, key.clone(), value.clone());
            continue;
        };

        let base_key = Value::String(base.to_string());
        let names = expand_value(&base_key);
        let records = expand_list(value);
        let mut generated = 0usize;
        for (name, record) in names.zip(records) {
            store(&mut result, &base_key, name, record);
            generated += 1;
        }
        debug!(pattern = base, generated, "expanded keyed entry");
    }

    result
}

fn store(result: &mut Mapping, lookup: &Value, target: Value, value: Value) {
    let merged = match result.get_mut(lookup) {
        Some(existing) => match (existing, value) {
            (Value::Mapping(ours), Value::Mapping(theirs)) => {
                let combined = merge(std::mem::take(ours), &theirs);
                *ours = combined.clone();
                Value::Mapping(combined)
            }
            (slot, other) => {
                *slot = other.clone();
                other
            }
        },
        None => value,
    };
    result.insert(target, merged);
}
