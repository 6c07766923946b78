//! The persistence boundary: loading, upgrading, and writing the save
//! document through an external store.

use log::{error, info};
use serde_json::Value;
use thiserror::Error;

use crate::state::{merge_with_defaults, GameState};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("stored document is not valid JSON: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

/// External key-value store holding the one save document.
///
/// `load` returns `Ok(None)` on a genuine first run; an `Err` means the
/// store itself is unreachable.
pub trait SaveStore {
    fn load(&mut self) -> Result<Option<String>, SaveError>;
    fn store(&mut self, document: &str) -> Result<(), SaveError>;
}

/// How the state was obtained on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored document existed and was merged against the defaults.
    Loaded,
    /// No stored document; defaults were written back as the first save.
    Initialized,
    /// The store was unreachable; the game runs on defaults and nothing
    /// persists. Callers must surface this to the player, not hide it.
    LocalOnly,
}

/// Load the save document, upgrade it against the current schema, and
/// write it back if the upgrade changed anything.
///
/// A malformed stored document is treated like a first run rather than a
/// fatal error; the player keeps playing on defaults.
pub fn load_or_init(store: &mut dyn SaveStore) -> (GameState, LoadOutcome) {
    let raw = match store.load() {
        Ok(raw) => raw,
        Err(err) => {
            error!("save store unreachable, running local-only: {}", err);
            return (GameState::new(), LoadOutcome::LocalOnly);
        }
    };
    let defaults = GameState::default_document();
    match raw {
        Some(raw) => {
            let stored: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    error!("stored save is not valid JSON ({}), reinitializing", err);
                    Value::Null
                }
            };
            let merged = merge_with_defaults(&stored, &defaults);
            let state: GameState = match serde_json::from_value(merged.clone()) {
                Ok(state) => state,
                Err(err) => {
                    error!("merged save does not fit the schema ({}), reinitializing", err);
                    GameState::new()
                }
            };
            if merged != stored {
                info!("save document upgraded to the current schema");
                let _ = persist(store, &state);
            }
            (state, LoadOutcome::Loaded)
        }
        None => {
            info!("no save found, initializing defaults");
            let state = GameState::new();
            let _ = persist(store, &state);
            (state, LoadOutcome::Initialized)
        }
    }
}

/// Write the state back to the store.
pub fn persist(store: &mut dyn SaveStore, state: &GameState) -> Result<(), SaveError> {
    let document = serde_json::to_string(&state.to_document())?;
    store.store(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct MemoryStore {
        document: Option<String>,
        broken: bool,
    }

    impl SaveStore for MemoryStore {
        fn load(&mut self) -> Result<Option<String>, SaveError> {
            if self.broken {
                return Err(SaveError::StoreUnavailable("offline".to_string()));
            }
            Ok(self.document.clone())
        }

        fn store(&mut self, document: &str) -> Result<(), SaveError> {
            if self.broken {
                return Err(SaveError::StoreUnavailable("offline".to_string()));
            }
            self.document = Some(document.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_first_run_initializes_and_writes_back() {
        let mut store = MemoryStore::default();
        let (state, outcome) = load_or_init(&mut store);
        assert_eq!(outcome, LoadOutcome::Initialized);
        assert_eq!(state, GameState::new());
        assert!(store.document.is_some());
    }

    #[test]
    fn test_partial_save_backfilled_from_defaults() {
        let mut store = MemoryStore {
            document: Some(json!({"current_week": 30, "player_mood": 55}).to_string()),
            broken: false,
        };
        let (state, outcome) = load_or_init(&mut store);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(state.current_week, 30);
        assert_eq!(state.player_mood, 55);
        assert_eq!(state.action_points, 3);
        // upgraded document written back
        let stored: Value = serde_json::from_str(store.document.as_deref().unwrap()).unwrap();
        assert_eq!(stored["action_points"], 3);
    }

    #[test]
    fn test_unreachable_store_runs_local_only() {
        let mut store = MemoryStore {
            document: None,
            broken: true,
        };
        let (state, outcome) = load_or_init(&mut store);
        assert_eq!(outcome, LoadOutcome::LocalOnly);
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_corrupt_save_reinitializes() {
        let mut store = MemoryStore {
            document: Some("{not json".to_string()),
            broken: false,
        };
        let (state, outcome) = load_or_init(&mut store);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(state, GameState::new());
    }
}
