//! Path-addressed mutations of the state document.

use log::warn;
use serde_json::{Number, Value};

use super::{EffectSpec, Mutation};

/// Apply one mutation at a dotted path inside the document.
///
/// Misconfigured effects (unknown path, array op on a non-array) are
/// logged and skipped; they never abort the rest of the rule's effects.
pub fn apply(document: &mut Value, path: &str, spec: &EffectSpec) {
    let (parent, key) = match resolve_parent(document, path) {
        Some(target) => target,
        None => {
            warn!("effect path `{}` does not resolve, skipping", path);
            return;
        }
    };
    match spec {
        EffectSpec::Assign(value) | EffectSpec::Op(Mutation::Set(value)) => {
            parent.insert(key.to_string(), value.clone());
        }
        EffectSpec::Op(Mutation::Add(delta)) => {
            let current = parent.get(key).and_then(Value::as_f64).unwrap_or(0.0);
            parent.insert(key.to_string(), number_value(current + delta));
        }
        EffectSpec::Op(Mutation::Multiply(factor)) => {
            // A missing base multiplies from 0 and stays 0; that is the
            // documented policy for uninitialized fields.
            let current = parent.get(key).and_then(Value::as_f64).unwrap_or(0.0);
            parent.insert(key.to_string(), number_value(current * factor));
        }
        EffectSpec::Op(Mutation::Push(item)) => match parent.get_mut(key) {
            Some(Value::Array(items)) => items.push(item.clone()),
            _ => warn!("push effect at `{}` targets a non-array, skipping", path),
        },
        EffectSpec::Op(Mutation::Remove(item)) => match parent.get_mut(key) {
            Some(Value::Array(items)) => {
                if let Some(position) = items.iter().position(|existing| existing == item) {
                    items.remove(position);
                }
            }
            _ => warn!("remove effect at `{}` targets a non-array, skipping", path),
        },
        EffectSpec::Op(Mutation::Concat(extra)) => match parent.get(key) {
            Some(Value::Array(items)) => {
                let mut combined = items.clone();
                combined.extend(extra.iter().cloned());
                parent.insert(key.to_string(), Value::Array(combined));
            }
            _ => warn!("concat effect at `{}` targets a non-array, skipping", path),
        },
    }
}

/// Walk to the object that owns the path's final segment.
fn resolve_parent<'doc, 'path>(
    document: &'doc mut Value,
    path: &'path str,
) -> Option<(&'doc mut serde_json::Map<String, Value>, &'path str)> {
    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    };
    let mut current = document;
    if let Some(parent_path) = parent_path {
        for segment in parent_path.split('.') {
            current = current.as_object_mut()?.get_mut(segment)?;
        }
    }
    current.as_object_mut().map(|map| (map, key))
}

/// Prefer integer JSON numbers so the result still deserializes into the
/// integer-typed state fields.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn effect(spec: Value) -> EffectSpec {
        serde_json::from_value(spec).unwrap()
    }

    #[test]
    fn test_arithmetic_sequence() {
        let mut doc = json!({"gold": 10});
        apply(&mut doc, "gold", &effect(json!({"add": 5})));
        assert_eq!(doc["gold"], 15);
        apply(&mut doc, "gold", &effect(json!({"multiply": 2})));
        assert_eq!(doc["gold"], 30);
        apply(&mut doc, "gold", &effect(json!({"set": 0})));
        assert_eq!(doc["gold"], 0);
    }

    #[test]
    fn test_add_to_missing_field_starts_at_zero() {
        let mut doc = json!({});
        apply(&mut doc, "gold", &effect(json!({"add": 7})));
        assert_eq!(doc["gold"], 7);
    }

    #[test]
    fn test_multiply_missing_field_stays_zero() {
        let mut doc = json!({});
        apply(&mut doc, "gold", &effect(json!({"multiply": 9})));
        assert_eq!(doc["gold"], 0);
    }

    #[test]
    fn test_direct_assignment() {
        let mut doc = json!({"day_night_status": "daytime"});
        apply(&mut doc, "day_night_status", &effect(json!("night")));
        assert_eq!(doc["day_night_status"], "night");
    }

    #[test]
    fn test_array_effects() {
        let mut doc = json!({"party": ["A"]});
        apply(&mut doc, "party", &effect(json!({"push": "B"})));
        assert_eq!(doc["party"], json!(["A", "B"]));
        apply(&mut doc, "party", &effect(json!({"remove": "A"})));
        assert_eq!(doc["party"], json!(["B"]));
        apply(&mut doc, "party", &effect(json!({"remove": "Z"})));
        assert_eq!(doc["party"], json!(["B"]));
        apply(&mut doc, "party", &effect(json!({"concat": ["C", "D"]})));
        assert_eq!(doc["party"], json!(["B", "C", "D"]));
    }

    #[test]
    fn test_nested_path_assignment() {
        let mut doc = json!({"player_stats": {"武学": 20}});
        apply(&mut doc, "player_stats.武学", &effect(json!({"add": 3})));
        assert_eq!(doc["player_stats"]["武学"], 23);
    }

    #[test]
    fn test_array_op_on_non_array_is_a_no_op() {
        let mut doc = json!({"gold": 10});
        apply(&mut doc, "gold", &effect(json!({"push": "B"})));
        assert_eq!(doc["gold"], 10);
    }

    #[test]
    fn test_unresolvable_path_is_a_no_op() {
        let mut doc = json!({"a": 1});
        apply(&mut doc, "missing.deep.path", &effect(json!({"add": 1})));
        assert_eq!(doc, json!({"a": 1}));
    }
}
