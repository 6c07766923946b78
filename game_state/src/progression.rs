//! Derived progression numbers: cultivation level and the weekly
//! favorability gain cap.

use crate::state::GameState;

/// Highest reachable cultivation level.
pub const MAX_LEVEL: i64 = 20;

/// Cultivation level implied by an accumulated 武学 (martial learning)
/// total. Level `n` costs `4 + n` points on top of the previous level, so
/// the curve steepens as the player climbs.
pub fn level_from_wuxue(wuxue: i64) -> i64 {
    let mut remaining = wuxue;
    let mut level = 0;
    for step in 1..=MAX_LEVEL {
        let cost = 4 + step;
        if remaining < cost {
            break;
        }
        remaining -= cost;
        level = step;
    }
    level
}

/// Total 武学 required to reach a level.
pub fn wuxue_for_level(level: i64) -> i64 {
    (1..=level.clamp(0, MAX_LEVEL)).map(|step| 4 + step).sum()
}

/// How much favorability a single NPC may gain within one week. Charm
/// raises the cap slowly.
pub fn weekly_favorability_limit(state: &GameState) -> i64 {
    let charm = state.player_talents.get("魅力").copied().unwrap_or(0);
    5 + charm / 20
}

/// Cap a proposed favorability value against the week-start snapshot.
///
/// Only gains are limited; losses pass through untouched. An NPC absent
/// from the snapshot is treated as starting the week at its current value.
pub fn clamp_favorability_gain(state: &GameState, npc_id: &str, proposed: i64) -> i64 {
    let current = state.npc_favorability.get(npc_id).copied().unwrap_or(0);
    let week_start = state
        .week_start_favorability
        .get(npc_id)
        .copied()
        .unwrap_or(current);
    if proposed <= week_start {
        return proposed;
    }
    let ceiling = week_start + weekly_favorability_limit(state);
    proposed.min(ceiling).max(current.min(ceiling))
}
