//! Model vocabulary
//!
//! Models are plain `serde_yaml` values. This module holds the key names the
//! pipeline reads and the expansion marker convention.

use serde_yaml::{Mapping, Value};

/// Prefix marking a key for expansion
pub const EXPANSION_MARKER: char = '=';

pub const HOSTS_KEY: &str = "hosts";
pub const PROFILES_KEY: &str = "profiles";
pub const PROFILE_KEY: &str = "profile";
pub const ARITY_KEY: &str = "arity";
pub const STEPS_KEY: &str = "steps";
pub const STEP_KEY: &str = "step";
pub const MIN_STEP_KEY: &str = "min_step";
pub const INFRA_KEY: &str = "infra";
pub const NAME_KEY: &str = "name";

/// Name behind a marked key, `None` when the key is not marked
///
/// Only string keys can be marked.
pub fn marked_name(key: &Value) -> Option<&str> {
    key.as_str()?.strip_prefix(EXPANSION_MARKER)
}

/// Borrow `mapping[key]` as a mapping
pub fn get_mapping<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    mapping.get(key).and_then(Value::as_mapping)
}

/// Render a key for messages and host lists
pub fn key_label(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
