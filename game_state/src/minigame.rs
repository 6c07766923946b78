//! Typed result payloads posted by the embedded minigames, and how they
//! fold back into the game state.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::{clamp_all, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Win,
    Lose,
}

/// One exit message from a minigame.
///
/// The wire format is JSON with a `type` discriminator, matching what the
/// embedded frames post back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MinigameResult {
    /// Card table: the player's money after cashing out.
    BlackjackExit { money: i64 },
    /// Turn-based battle: consumables left over, plus loot on a win.
    BattleExit {
        outcome: BattleOutcome,
        #[serde(default)]
        remaining_items: BTreeMap<String, i64>,
        #[serde(default)]
        reward: BTreeMap<String, i64>,
    },
    /// Farming plot: coin earnings and harvested goods.
    FarmExit {
        #[serde(default)]
        money: i64,
        #[serde(default)]
        harvest: BTreeMap<String, i64>,
    },
    /// Alchemy furnace: refined elixirs (ingredients already consumed).
    AlchemyExit {
        #[serde(default)]
        money: i64,
        #[serde(default)]
        elixirs: BTreeMap<String, i64>,
    },
}

impl MinigameResult {
    /// Fold this result into the state; bounded fields re-clamp afterward.
    pub fn apply(&self, state: &mut GameState) {
        match self {
            MinigameResult::BlackjackExit { money } => {
                state.player_stats.insert("金钱".to_string(), *money);
            }
            MinigameResult::BattleExit {
                outcome,
                remaining_items,
                reward,
            } => {
                // consumable counts are authoritative from the battle frame
                for (item, count) in remaining_items {
                    state.inventory.insert(item.clone(), *count);
                }
                if *outcome == BattleOutcome::Win {
                    for (item, count) in reward {
                        *state.inventory.entry(item.clone()).or_insert(0) += count;
                    }
                }
                state.battle_event = 0;
                info!("battle finished: {:?}", outcome);
            }
            MinigameResult::FarmExit { money, harvest } => {
                *state.player_stats.entry("金钱".to_string()).or_insert(0) += money;
                for (item, count) in harvest {
                    *state.inventory.entry(item.clone()).or_insert(0) += count;
                }
            }
            MinigameResult::AlchemyExit { money, elixirs } => {
                *state.player_stats.entry("金钱".to_string()).or_insert(0) += money;
                for (item, count) in elixirs {
                    *state.inventory.entry(item.clone()).or_insert(0) += count;
                }
            }
        }
        state.inventory.retain(|_, count| *count > 0);
        clamp_all(state);
    }
}
