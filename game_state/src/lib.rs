//! # Game State
//!
//! The "single source of truth" crate - the save document, the NPC roster,
//! value ranges, the week-based calendar, and the special event engine.
//! This crate knows nothing about narrative text; it only tracks and
//! mutates state.

pub mod date;
pub mod events;
pub mod minigame;
pub mod npc;
pub mod progression;
pub mod save;
pub mod session;
pub mod state;

pub use date::{season_for_week, GameDate, Season};
pub use events::{EffectSpec, EventError, EventRegistry, EventRule, Mutation, Predicate};
pub use minigame::{BattleOutcome, MinigameResult};
pub use npc::{Npc, NpcRoster, RosterError};
pub use save::{LoadOutcome, SaveError, SaveStore};
pub use session::{GameSession, NarrativeSink, TriggerOutcome};
pub use state::{clamp_all, merge_with_defaults, GameState};
