//! Legal ranges for every bounded stat, and the clamp pass that enforces
//! them after effects or minigame results land.

use super::GameState;

const TALENT_RANGE: (i64, i64) = (0, 100);
const MONEY_RANGE: (i64, i64) = (0, 999_999);
const STAT_RANGE: (i64, i64) = (0, 300);
const ATTACK_RANGE: (i64, i64) = (10, 300);
const HEALTH_RANGE: (i64, i64) = (25, 600);
const MOOD_RANGE: (i64, i64) = (0, 120);
const FAVORABILITY_RANGE: (i64, i64) = (0, 100);
const ACTION_POINT_RANGE: (i64, i64) = (0, 3);
const WEEK_RANGE: (i64, i64) = (1, 9_999);

fn clamp(value: i64, (min, max): (i64, i64)) -> i64 {
    value.clamp(min, max)
}

/// Force every bounded field back into its legal range.
///
/// Runs after every effect application, so individual effects are free to
/// overshoot without corrupting the state.
pub fn clamp_all(state: &mut GameState) {
    for value in state.player_talents.values_mut() {
        *value = clamp(*value, TALENT_RANGE);
    }
    for (name, value) in state.player_stats.iter_mut() {
        let range = if name == "金钱" { MONEY_RANGE } else { STAT_RANGE };
        *value = clamp(*value, range);
    }
    for (name, value) in state.combat_stats.iter_mut() {
        let range = if name == "攻击力" { ATTACK_RANGE } else { HEALTH_RANGE };
        *value = clamp(*value, range);
    }
    state.player_mood = clamp(state.player_mood, MOOD_RANGE);
    for value in state.npc_favorability.values_mut() {
        *value = clamp(*value, FAVORABILITY_RANGE);
    }
    state.action_points = clamp(state.action_points, ACTION_POINT_RANGE);
    state.current_week = clamp(state.current_week, WEEK_RANGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overshoot_clamped() {
        let mut state = GameState::new();
        state.player_mood = 400;
        state.action_points = 9;
        *state.player_stats.get_mut("金钱").unwrap() = -50;
        *state.npc_favorability.get_mut("C").unwrap() = 150;
        clamp_all(&mut state);
        assert_eq!(state.player_mood, 120);
        assert_eq!(state.action_points, 3);
        assert_eq!(state.player_stats["金钱"], 0);
        assert_eq!(state.npc_favorability["C"], 100);
    }

    #[test]
    fn test_lower_bounds_enforced() {
        let mut state = GameState::new();
        *state.combat_stats.get_mut("攻击力").unwrap() = 2;
        *state.combat_stats.get_mut("生命值").unwrap() = 0;
        state.current_week = -3;
        clamp_all(&mut state);
        assert_eq!(state.combat_stats["攻击力"], 10);
        assert_eq!(state.combat_stats["生命值"], 25);
        assert_eq!(state.current_week, 1);
    }

    #[test]
    fn test_values_in_range_untouched() {
        let mut state = GameState::new();
        let before = state.clone();
        clamp_all(&mut state);
        assert_eq!(state, before);
    }
}
