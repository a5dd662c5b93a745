//! Deep merge of two model mappings
//!
//! Precedence, applied at every depth:
//! - key only in `secondary`: added
//! - both mappings: merged recursively
//! - both sequences: `primary` items followed by `secondary` items
//! - anything else: `secondary` replaces `primary`
//!
//! So overrides passed as `secondary` win on scalar conflicts.

use serde_yaml::{Mapping, Value};

/// Merge `secondary` into `primary` and return the result
pub fn merge(mut primary: Mapping, secondary: &Mapping) -> Mapping {
    merge_into(&mut primary, secondary);
    primary
}

/// In-place form of [`merge`]; `secondary` is never modified
pub fn merge_into(primary: &mut Mapping, secondary: &Mapping) {
    for (key, incoming) in secondary {
        match primary.get_mut(key) {
            Some(existing) => merge_value(existing, incoming),
            None => {
                primary.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Apply the per-key precedence rule to one slot
pub fn merge_value(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Mapping(ours), Value::Mapping(theirs)) => merge_into(ours, theirs),
        (Value::Sequence(ours), Value::Sequence(theirs)) => ours.extend(theirs.iter().cloned()),
        (slot, _) => *slot = incoming.clone(),
    }
}
