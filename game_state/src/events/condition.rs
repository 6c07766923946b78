//! Path resolution and predicate evaluation over the state document.

use serde_json::Value;

use super::{EventRule, Predicate};

/// Walk a dotted path into the state document.
///
/// Returns `None` as soon as any segment is missing; never panics.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Evaluate one predicate against a resolved value. A missing value fails
/// every predicate.
pub fn evaluate(value: Option<&Value>, predicate: &Predicate) -> bool {
    let value = match value {
        Some(v) => v,
        None => return false,
    };
    if let Some(min) = predicate.min {
        match value.as_f64() {
            Some(n) if n >= min => {}
            _ => return false,
        }
    }
    if let Some(max) = predicate.max {
        match value.as_f64() {
            Some(n) if n <= max => {}
            _ => return false,
        }
    }
    if let Some(expected) = &predicate.equals {
        if value != expected {
            return false;
        }
    }
    if let Some(forbidden) = &predicate.not_equals {
        if value == forbidden {
            return false;
        }
    }
    if let Some(allowed) = &predicate.one_of {
        if !allowed.contains(value) {
            return false;
        }
    }
    true
}

/// Whether every condition of a rule holds against the document.
///
/// The rule's own triggered-set check lives in the registry; this is the
/// pure predicate part.
pub fn all_conditions_met(rule: &EventRule, document: &Value) -> bool {
    rule.conditions
        .iter()
        .all(|(path, predicate)| evaluate(resolve_path(document, path), predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn predicate(spec: Value) -> Predicate {
        serde_json::from_value(spec).unwrap()
    }

    #[test]
    fn test_resolve_nested_paths() {
        let doc = json!({"player_stats": {"武学": 35}, "companion_npcs": ["Cơ Tự"]});
        assert_eq!(resolve_path(&doc, "player_stats.武学"), Some(&json!(35)));
        assert_eq!(resolve_path(&doc, "companion_npcs.0"), Some(&json!("Cơ Tự")));
        assert_eq!(resolve_path(&doc, "player_stats.棋艺"), None);
        assert_eq!(resolve_path(&doc, "missing.deeper"), None);
    }

    #[test]
    fn test_min_max_bounds() {
        let pred = predicate(json!({"min": 10, "max": 20}));
        assert!(evaluate(Some(&json!(10)), &pred));
        assert!(evaluate(Some(&json!(20)), &pred));
        assert!(!evaluate(Some(&json!(9)), &pred));
        assert!(!evaluate(Some(&json!(21)), &pred));
    }

    #[test]
    fn test_equality_predicates() {
        let pred = predicate(json!({"equals": "winter"}));
        assert!(evaluate(Some(&json!("winter")), &pred));
        assert!(!evaluate(Some(&json!("spring")), &pred));

        let pred = predicate(json!({"notEquals": "winter"}));
        assert!(evaluate(Some(&json!("spring")), &pred));
        assert!(!evaluate(Some(&json!("winter")), &pred));
    }

    #[test]
    fn test_membership_predicate() {
        let pred = predicate(json!({"in": ["shanmen", "yanwuchang"]}));
        assert!(evaluate(Some(&json!("shanmen")), &pred));
        assert!(!evaluate(Some(&json!("houshan")), &pred));
    }

    #[test]
    fn test_missing_value_fails_everything() {
        assert!(!evaluate(None, &predicate(json!({"min": 0}))));
        assert!(!evaluate(None, &predicate(json!({"notEquals": "x"}))));
        assert!(!evaluate(None, &Predicate::default()));
    }

    #[test]
    fn test_non_numeric_fails_bounds() {
        let pred = predicate(json!({"min": 1}));
        assert!(!evaluate(Some(&json!("seven")), &pred));
    }

    #[test]
    fn test_all_conditions_anded() {
        let rule: EventRule = serde_json::from_value(json!({
            "id": "r", "name": "r",
            "conditions": {
                "current_week": {"min": 5},
                "season_status": {"equals": "winter"}
            }
        }))
        .unwrap();
        let doc = json!({"current_week": 6, "season_status": "winter"});
        assert!(all_conditions_met(&rule, &doc));
        let doc = json!({"current_week": 6, "season_status": "spring"});
        assert!(!all_conditions_met(&rule, &doc));
    }
}
