//! Schema-upgrading deep merge for loaded save documents.

use serde_json::{Map, Value};

/// Merge a loaded save document with the default schema.
///
/// The loaded document wins wherever it has a value; keys that exist only
/// in the defaults are backfilled. Nested objects merge recursively, while
/// arrays and scalars are taken whole from whichever side supplies them.
/// This is what lets old saves survive a schema that grew new fields.
pub fn merge_with_defaults(loaded: &Value, defaults: &Value) -> Value {
    match (loaded, defaults) {
        (Value::Null, _) => defaults.clone(),
        (Value::Object(loaded_map), Value::Object(default_map)) => {
            let mut merged: Map<String, Value> = loaded_map.clone();
            for (key, default_value) in default_map {
                match merged.get(key) {
                    None => {
                        merged.insert(key.clone(), default_value.clone());
                    }
                    Some(existing) if default_value.is_object() && existing.is_object() => {
                        let combined = merge_with_defaults(existing, default_value);
                        merged.insert(key.clone(), combined);
                    }
                    Some(_) => {}
                }
            }
            Value::Object(merged)
        }
        (_, Value::Object(_)) => defaults.clone(),
        (value, _) => value.clone(),
    }
}
