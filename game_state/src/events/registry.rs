//! The ordered rule table and trigger bookkeeping.

use log::debug;
use serde_json::Value;
use std::collections::BTreeSet;

use super::{condition, effect, EventError, EventRule};
use crate::state::{clamp_all, GameState};

/// All known special event rules, in registration order.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    rules: Vec<EventRule>,
}

impl EventRegistry {
    pub fn new(rules: Vec<EventRule>) -> Result<Self, EventError> {
        let registry = Self { rules };
        registry.validate()?;
        Ok(registry)
    }

    /// Load rules from a JSON array, failing fast on duplicate ids or
    /// paths that address state roots the schema does not have. Bad rule
    /// data should surface at load time, not as silently dead rules.
    pub fn from_json_str(raw: &str) -> Result<Self, EventError> {
        let rules: Vec<EventRule> = serde_json::from_str(raw)?;
        Self::new(rules)
    }

    fn validate(&self) -> Result<(), EventError> {
        let schema = GameState::default_document();
        let known_roots: BTreeSet<&str> = match &schema {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => BTreeSet::new(),
        };
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(EventError::DuplicateRule(rule.id.clone()));
            }
            let paths = rule.conditions.keys().chain(rule.effects.keys());
            for path in paths {
                let root = path.split('.').next().unwrap_or(path);
                if !known_roots.contains(root) {
                    return Err(EventError::UnknownRoot {
                        rule: rule.id.clone(),
                        root: root.to_string(),
                        path: path.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&EventRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Find the highest-priority eligible rule, if any.
    ///
    /// Priority descends; registration order breaks ties. Rules already in
    /// the triggered-set are never eligible again.
    pub fn check_special_events(&self, state: &GameState) -> Option<&EventRule> {
        let document = state.to_document();
        let mut ordered: Vec<&EventRule> = self.rules.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
        for rule in ordered {
            if state.has_triggered(&rule.id) {
                continue;
            }
            if condition::all_conditions_met(rule, &document) {
                debug!("special event `{}` is eligible", rule.id);
                return Some(rule);
            }
        }
        None
    }

    /// Apply a rule's effects to the state and clamp the result.
    ///
    /// The mutations run over the serialized document; if they somehow
    /// leave a document that no longer deserializes, the state is left
    /// untouched and the error is reported instead of half-applying.
    pub fn apply_effects(&self, rule: &EventRule, state: &mut GameState) -> Result<(), EventError> {
        let mut document = state.to_document();
        for (path, spec) in &rule.effects {
            effect::apply(&mut document, path, spec);
        }
        let mut updated: GameState =
            serde_json::from_value(document).map_err(|source| EventError::CorruptDocument {
                rule: rule.id.clone(),
                source,
            })?;
        clamp_all(&mut updated);
        *state = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry(rules: Value) -> EventRegistry {
        EventRegistry::from_json_str(&rules.to_string()).unwrap()
    }

    fn always_true(id: &str, priority: i64) -> Value {
        json!({
            "id": id,
            "name": id,
            "priority": priority,
            "conditions": {"current_week": {"min": 1}},
            "effects": {"player_mood": {"add": 1}}
        })
    }

    #[test]
    fn test_priority_ordering() {
        let registry = registry(json!([always_true("low", 50), always_true("high", 100)]));
        let state = GameState::new();
        assert_eq!(registry.check_special_events(&state).unwrap().id, "high");
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let registry = registry(json!([always_true("first", 10), always_true("second", 10)]));
        let state = GameState::new();
        assert_eq!(registry.check_special_events(&state).unwrap().id, "first");
    }

    #[test]
    fn test_triggered_rules_never_fire_again() {
        let registry = registry(json!([always_true("once", 10)]));
        let mut state = GameState::new();
        let rule = registry.check_special_events(&state).unwrap().clone();
        registry.apply_effects(&rule, &mut state).unwrap();
        state.mark_triggered(&rule.id);
        assert_eq!(state.player_mood, 101);
        assert!(registry.check_special_events(&state).is_none());
    }

    #[test]
    fn test_effects_then_clamp() {
        let registry = registry(json!([{
            "id": "windfall",
            "name": "windfall",
            "effects": {
                "player_stats.金钱": {"add": 5_000_000},
                "player_mood": {"multiply": 0}
            }
        }]));
        let mut state = GameState::new();
        let rule = registry.get("windfall").unwrap().clone();
        registry.apply_effects(&rule, &mut state).unwrap();
        assert_eq!(state.player_stats["金钱"], 999_999);
        assert_eq!(state.player_mood, 0);
    }

    #[test]
    fn test_unknown_root_rejected_at_load() {
        let raw = json!([{
            "id": "bad",
            "name": "bad",
            "conditions": {"player_karma": {"min": 1}}
        }])
        .to_string();
        let err = EventRegistry::from_json_str(&raw).unwrap_err();
        assert!(matches!(err, EventError::UnknownRoot { ref root, .. } if root == "player_karma"));
    }

    #[test]
    fn test_duplicate_ids_rejected_at_load() {
        let raw = json!([always_true("dup", 1), always_true("dup", 2)]).to_string();
        let err = EventRegistry::from_json_str(&raw).unwrap_err();
        assert!(matches!(err, EventError::DuplicateRule(ref id) if id == "dup"));
    }

    #[test]
    fn test_event_chain_condition() {
        let registry = registry(json!([
            {
                "id": "part_one",
                "name": "part one",
                "priority": 10,
                "conditions": {"current_week": {"min": 1}},
                "effects": {"current_special_event": {"set": "part_one"}}
            },
            {
                "id": "part_two",
                "name": "part two",
                "priority": 5,
                "conditions": {"current_special_event": {"equals": "part_one"}}
            }
        ]));
        let mut state = GameState::new();
        let first = registry.check_special_events(&state).unwrap().clone();
        assert_eq!(first.id, "part_one");
        registry.apply_effects(&first, &mut state).unwrap();
        state.current_special_event = first.id.clone();
        state.mark_triggered(&first.id);
        let second = registry.check_special_events(&state).unwrap();
        assert_eq!(second.id, "part_two");
    }
}
