//! The special event engine: declarative rules that watch the state
//! document and fire narrative branches at most once.
//!
//! A rule is pure data - a set of path-addressed predicates, a set of
//! path-addressed mutations, and a narrative payload. The engine sorts
//! rules by priority, finds the first eligible one, applies its mutations,
//! and records the trigger so the rule never fires again.

pub mod condition;
pub mod effect;
pub mod registry;

pub use registry::EventRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading rule data or applying effects.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid event rule data: {0}")]
    InvalidRules(#[from] serde_json::Error),
    #[error("rule `{rule}` addresses unknown state root `{root}` in path `{path}`")]
    UnknownRoot {
        rule: String,
        root: String,
        path: String,
    },
    #[error("duplicate rule id `{0}`")]
    DuplicateRule(String),
    #[error("effects for rule `{rule}` produced a document that no longer deserializes: {source}")]
    CorruptDocument {
        rule: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A single declarative event rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRule {
    /// Stable identifier, recorded in the triggered-set.
    pub id: String,
    /// Display name, woven into the derived player-action line.
    pub name: String,
    /// Higher priority fires first; registration order breaks ties.
    #[serde(default)]
    pub priority: i64,
    /// Path -> predicate, all ANDed.
    #[serde(default)]
    pub conditions: BTreeMap<String, Predicate>,
    /// Path -> mutation, applied in path order.
    #[serde(default)]
    pub effects: BTreeMap<String, EffectSpec>,
    /// Narrative payload queued for display when the rule fires.
    #[serde(default)]
    pub text: String,
}

/// Predicate over one resolved state value. Every present field must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Value>,
    #[serde(default, rename = "notEquals", skip_serializing_if = "Option::is_none")]
    pub not_equals: Option<Value>,
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,
}

/// One mutation of one state path.
///
/// Untagged so that rule JSON reads naturally: `{"add": 5}` is an
/// operation, while `"night"` or `42` is a direct assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectSpec {
    Op(Mutation),
    Assign(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutation {
    /// Numeric add; a missing current value counts as 0.
    Add(f64),
    /// Unconditional assignment of any value.
    Set(Value),
    /// Numeric multiply; a missing current value counts as 0, so
    /// multiplying an uninitialized field stays 0. That is policy, not an
    /// accident.
    Multiply(f64),
    /// Append to the array at the path.
    Push(Value),
    /// Remove the first occurrence from the array at the path.
    Remove(Value),
    /// Replace the array at the path with itself plus these elements.
    Concat(Vec<Value>),
}
