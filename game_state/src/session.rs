//! Orchestration of one game session: the tick/skip-week loop, special
//! event triggering, and the collaborator boundaries.

use log::{error, info};

use crate::date::{season_for_week, GameDate};
use crate::events::{EventError, EventRegistry, EventRule};
use crate::save::{self, LoadOutcome, SaveStore};
use crate::state::GameState;

/// External renderer that receives narrative payloads for display.
pub trait NarrativeSink {
    fn deliver(&mut self, payload: &str) -> Result<(), String>;
}

/// What happened when a special event fired.
///
/// Effects and the trigger mark always land; `saved` and `delivered`
/// report whether the collaborators cooperated. State consistency wins
/// over guaranteed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub rule_id: String,
    pub action_line: String,
    pub saved: bool,
    pub delivered: bool,
}

/// One running game: state plus the rule table.
pub struct GameSession {
    state: GameState,
    registry: EventRegistry,
    load_outcome: LoadOutcome,
}

impl GameSession {
    /// Load (or initialize) the save document and start a session.
    pub fn start(store: &mut dyn SaveStore, registry: EventRegistry) -> Self {
        let (state, load_outcome) = save::load_or_init(store);
        Self {
            state,
            registry,
            load_outcome,
        }
    }

    /// Start from an already-loaded state (tests, debug tooling).
    pub fn with_state(state: GameState, registry: EventRegistry) -> Self {
        Self {
            state,
            registry,
            load_outcome: LoadOutcome::Loaded,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Advance to the next week: bump the calendar, refresh action points
    /// and the favorability snapshot, then look for an eligible event.
    pub fn skip_week(
        &mut self,
        store: &mut dyn SaveStore,
        sink: &mut dyn NarrativeSink,
    ) -> Option<TriggerOutcome> {
        self.state.current_week += 1;
        self.state.action_points = 3;
        self.state.new_week = 1;
        self.state.day_night_status = "daytime".to_string();
        let date = GameDate::from_week(self.state.current_week);
        self.state.season_status = season_for_week(self.state.current_week).as_str().to_string();
        info!("week advanced to {}", date);
        self.state.snapshot_week_favorability();
        self.run_event_check(store, sink, true)
    }

    /// Evaluate the rule table after a normal game tick.
    pub fn tick(
        &mut self,
        store: &mut dyn SaveStore,
        sink: &mut dyn NarrativeSink,
    ) -> Option<TriggerOutcome> {
        self.run_event_check(store, sink, false)
    }

    fn run_event_check(
        &mut self,
        store: &mut dyn SaveStore,
        sink: &mut dyn NarrativeSink,
        after_skip: bool,
    ) -> Option<TriggerOutcome> {
        let rule = self.registry.check_special_events(&self.state)?.clone();
        Some(self.trigger_special_event(&rule, store, sink, after_skip))
    }

    /// Fire one rule: derive the action line, apply effects, mark the
    /// trigger, then persist and deliver.
    ///
    /// Effects and the trigger mark are committed before the fallible
    /// collaborator calls, so a failed save or render never causes a rule
    /// to re-apply later.
    pub fn trigger_special_event(
        &mut self,
        rule: &EventRule,
        store: &mut dyn SaveStore,
        sink: &mut dyn NarrativeSink,
        after_skip: bool,
    ) -> TriggerOutcome {
        let action_line = self.compose_action_line(rule, after_skip);
        self.state.last_user_message = action_line.clone();

        if let Err(err) = self.registry.apply_effects(rule, &mut self.state) {
            match err {
                EventError::CorruptDocument { ref rule, .. } => {
                    error!("effects of `{}` rejected, state unchanged: {}", rule, err);
                }
                _ => error!("effects failed: {}", err),
            }
        }
        self.state.current_special_event = rule.id.clone();
        self.state.mark_triggered(&rule.id);

        let saved = match save::persist(store, &self.state) {
            Ok(()) => true,
            Err(err) => {
                error!("save failed after event `{}`: {}", rule.id, err);
                false
            }
        };
        let delivered = match sink.deliver(&rule.text) {
            Ok(()) => true,
            Err(err) => {
                error!("narrative delivery failed for `{}`: {}", rule.id, err);
                false
            }
        };
        info!("special event `{}` fired", rule.id);
        TriggerOutcome {
            rule_id: rule.id.clone(),
            action_line,
            saved,
            delivered,
        }
    }

    fn compose_action_line(&self, rule: &EventRule, after_skip: bool) -> String {
        let date = GameDate::from_week(self.state.current_week);
        let prefix = if after_skip { "A week passes. " } else { "" };
        format!(
            "{}{}, at {}: {}",
            prefix, date, self.state.map_location, rule.name
        )
    }
}
