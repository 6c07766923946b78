//! The game state document - every variable the shell tracks between turns.
//!
//! The whole state serializes to a single JSON document. That document is
//! what the save store persists, what the deep-merge upgrades on load, and
//! what the event engine addresses through dotted paths (the path segments
//! are the serialized field names below).

mod merge;
mod ranges;

pub use merge::merge_with_defaults;
pub use ranges::clamp_all;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::npc::NpcRoster;

/// The complete, serializable game state.
///
/// Maps are `BTreeMap` so the serialized document is deterministic.
/// Numeric fields are `i64` throughout; fractional intermediate values can
/// appear while effects run but the clamp pass restores integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Current location id inside the sect grounds.
    pub user_location: String,
    /// Innate talents (根骨/悟性/心性/魅力), each 0-100.
    pub player_talents: BTreeMap<String, i64>,
    /// Earned stats (武学/学识/声望/金钱).
    pub player_stats: BTreeMap<String, i64>,
    /// Combat stats (攻击力/生命值).
    pub combat_stats: BTreeMap<String, i64>,
    /// Stamina, 0-120 (values over 100 are a temporary overcap).
    pub player_mood: i64,
    /// Martial art name -> mastery level.
    pub martial_arts: BTreeMap<String, i64>,
    /// NPC id -> favorability, 0-100.
    pub npc_favorability: BTreeMap<String, i64>,
    /// Favorability snapshot taken when the week started; the weekly gain
    /// cap is measured against this.
    pub week_start_favorability: BTreeMap<String, i64>,
    /// NPC id -> whether the NPC appears on the map.
    pub npc_visibility: BTreeMap<String, bool>,
    pub action_points: i64,
    pub current_week: i64,
    /// "daytime" or "night".
    pub day_night_status: String,
    /// Lowercase season name, kept in sync with the calendar.
    pub season_status: String,
    /// 0 = sect life, 1 = story (SLG) mode.
    pub game_mode: i64,
    pub difficulty: String,
    /// Item name -> count.
    pub inventory: BTreeMap<String, i64>,
    /// Equipment slot -> equipped item, if any.
    pub equipment: BTreeMap<String, Option<String>>,
    /// Canonical names of NPCs travelling with the player; the parser's
    /// allowed-speaker pool.
    pub companion_npcs: Vec<String>,
    /// Display name of the current overworld destination.
    pub map_location: String,
    pub new_week: i64,
    pub random_event: i64,
    pub battle_event: i64,
    /// The last derived player-action line handed to the model.
    pub last_user_message: String,
    /// Ids of special events that already fired. Append-only except for
    /// explicit debug resets.
    pub triggered_events: Vec<String>,
    /// Id of the most recently triggered special event; event chains
    /// condition on this.
    pub current_special_event: String,
    /// 1 = free-action input available, 0 = locked by a storyline.
    pub input_enable: i64,
}

impl Default for GameState {
    fn default() -> Self {
        let roster = NpcRoster::builtin();
        let per_npc = |v: i64| -> BTreeMap<String, i64> {
            roster.ids().map(|id| (id.to_string(), v)).collect()
        };
        Self {
            user_location: "shanmen".to_string(),
            player_talents: stat_map(&[("根骨", 25), ("悟性", 25), ("心性", 25), ("魅力", 25)]),
            player_stats: stat_map(&[("武学", 20), ("学识", 20), ("声望", 20), ("金钱", 500)]),
            combat_stats: stat_map(&[("攻击力", 20), ("生命值", 50)]),
            player_mood: 100,
            martial_arts: stat_map(&[
                ("太白仙迹", 0),
                ("岱宗如何", 0),
                ("掠风窃尘", 0),
                ("流云飞袖", 0),
                ("惊鸿照影", 0),
                ("踏雪无痕", 0),
                ("醉卧沙场", 0),
                ("万剑归宗", 0),
            ]),
            npc_favorability: per_npc(0),
            week_start_favorability: per_npc(0),
            npc_visibility: roster.ids().map(|id| (id.to_string(), true)).collect(),
            action_points: 3,
            current_week: 1,
            day_night_status: "daytime".to_string(),
            season_status: "winter".to_string(),
            game_mode: 0,
            difficulty: "normal".to_string(),
            inventory: stat_map(&[("肉包子", 5), ("制式铁剑", 1)]),
            equipment: BTreeMap::from([
                ("武器".to_string(), None),
                ("防具".to_string(), Some("普通弟子服".to_string())),
                ("饰品1".to_string(), None),
                ("饰品2".to_string(), None),
            ]),
            companion_npcs: Vec::new(),
            map_location: "Thiên Sơn Phái".to_string(),
            new_week: 0,
            random_event: 0,
            battle_event: 0,
            last_user_message: String::new(),
            triggered_events: Vec::new(),
            current_special_event: String::new(),
            input_enable: 1,
        }
    }
}

fn stat_map(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

impl GameState {
    /// A fresh first-run state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize into the JSON document the path engine addresses.
    ///
    /// Serialization of this struct cannot fail, so this is infallible.
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The default schema as a JSON document (deep-merge reference).
    pub fn default_document() -> Value {
        Self::default().to_document()
    }

    /// Record the current favorability values as the week-start snapshot.
    pub fn snapshot_week_favorability(&mut self) {
        self.week_start_favorability = self.npc_favorability.clone();
    }

    /// Whether an event id has already fired.
    pub fn has_triggered(&self, event_id: &str) -> bool {
        self.triggered_events.iter().any(|id| id == event_id)
    }

    /// Record an event id as fired (idempotent).
    pub fn mark_triggered(&mut self, event_id: &str) {
        if !self.has_triggered(event_id) {
            self.triggered_events.push(event_id.to_string());
        }
    }

    /// Debug/operator reset: make an event eligible again.
    pub fn reset_trigger(&mut self, event_id: &str) {
        self.triggered_events.retain(|id| id != event_id);
    }
}
