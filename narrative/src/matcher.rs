//! Tiered fuzzy resolution of free-text tags onto closed vocabularies.
//!
//! Upstream generation garbles tags freely, so each axis gets its own
//! tolerance: scenes match loosely (threshold 0.4, then keyword scan),
//! emotions moderately (0.5), NPC names cautiously (0.6), and CGs only by
//! exact or containment match - a wrong CG costs far more than a missing
//! one.

use log::debug;

use game_state::NpcRoster;

use crate::similarity::similarity;
use crate::vocabulary::{MatchVocabulary, VocabularySet};

pub const NONE: &str = "none";

const SCENE_THRESHOLD: f64 = 0.4;
const EMOTION_THRESHOLD: f64 = 0.5;
const NPC_THRESHOLD: f64 = 0.6;

/// Whether a normalized tag means "no value".
pub fn is_none_tag(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NONE) || trimmed == "无"
}

/// Generic tiered match against one vocabulary.
///
/// Tiers, first hit wins: exact member, exact synonym, member containment
/// in either direction, synonym-key containment, then best similarity over
/// members and synonym keys at the given threshold.
pub fn fuzzy_match<'a>(
    input: &str,
    vocabulary: &'a MatchVocabulary,
    threshold: f64,
) -> Option<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(member) = vocabulary.members.iter().find(|m| m.as_str() == input) {
        return Some(member);
    }
    if let Some(target) = vocabulary.synonym_target(input) {
        if vocabulary.contains(target) {
            debug!("`{}` resolved via exact synonym to `{}`", input, target);
            return Some(target);
        }
    }
    if let Some(member) = vocabulary
        .members
        .iter()
        .find(|m| input.contains(m.as_str()) || m.contains(input))
    {
        debug!("`{}` resolved via containment to `{}`", input, member);
        return Some(member);
    }
    if let Some(target) = vocabulary
        .synonyms
        .iter()
        .find(|(key, _)| input.contains(key.as_str()) || key.contains(input))
        .map(|(_, to)| to.as_str())
        .filter(|to| vocabulary.contains(to))
    {
        debug!("`{}` resolved via synonym containment to `{}`", input, target);
        return Some(target);
    }
    let members = vocabulary.members.iter().map(|m| (m.as_str(), m.as_str()));
    let synonyms = vocabulary
        .synonyms
        .iter()
        .map(|(key, to)| (key.as_str(), to.as_str()));
    let mut best: Option<(&str, f64)> = None;
    for (candidate_key, target) in members.chain(synonyms) {
        let score = similarity(input, candidate_key);
        // strictly greater keeps the first-found on ties
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((target, score));
        }
    }
    match best {
        Some((target, score)) if score >= threshold && vocabulary.contains(target) => {
            debug!("`{}` resolved via similarity {:.2} to `{}`", input, score, target);
            Some(target)
        }
        _ => None,
    }
}

/// The per-axis resolvers the parser uses, bundled with their data.
pub struct TagMatcher {
    vocabularies: VocabularySet,
    roster: NpcRoster,
}

impl TagMatcher {
    pub fn new(vocabularies: VocabularySet, roster: NpcRoster) -> Self {
        Self {
            vocabularies,
            roster,
        }
    }

    pub fn builtin() -> Self {
        Self::new(VocabularySet::builtin(), NpcRoster::builtin())
    }

    pub fn roster(&self) -> &NpcRoster {
        &self.roster
    }

    pub fn scene_vocabulary(&self) -> &MatchVocabulary {
        &self.vocabularies.scene
    }

    /// Resolve a scene tag; unresolvable scenes stay `none` and the record
    /// is rejected upstream.
    pub fn match_scene(&self, raw: &str) -> String {
        if is_none_tag(raw) {
            return NONE.to_string();
        }
        let raw = raw.trim();
        if let Some(member) = fuzzy_match(raw, &self.vocabularies.scene, SCENE_THRESHOLD) {
            return member.to_string();
        }
        if let Some(target) = self.vocabularies.scene.keyword_fallback(raw) {
            debug!("scene `{}` resolved via keyword fallback to `{}`", raw, target);
            return target.to_string();
        }
        NONE.to_string()
    }

    /// Resolve an emotion tag. The `特殊CG<digits>` escape bypasses the
    /// vocabulary entirely; it addresses reserved art directly.
    pub fn match_emotion(&self, raw: &str) -> String {
        if is_none_tag(raw) {
            return NONE.to_string();
        }
        let raw = raw.trim();
        if is_special_cg_escape(raw) {
            return raw.to_string();
        }
        if let Some(member) = fuzzy_match(raw, &self.vocabularies.emotion, EMOTION_THRESHOLD) {
            return member.to_string();
        }
        if let Some(target) = self.vocabularies.emotion.keyword_fallback(raw) {
            debug!("emotion `{}` resolved via keyword fallback to `{}`", raw, target);
            return target.to_string();
        }
        NONE.to_string()
    }

    /// Resolve a speaker tag to a canonical NPC name. Accepts full names,
    /// roster ids, containment, then similarity over names only.
    pub fn match_npc(&self, raw: &str) -> String {
        if is_none_tag(raw) {
            return NONE.to_string();
        }
        let raw = raw.trim();
        if self.roster.id_of(raw).is_some() {
            return raw.to_string();
        }
        if let Some(name) = self.roster.name_of(raw) {
            debug!("speaker id `{}` resolved to `{}`", raw, name);
            return name.to_string();
        }
        if let Some(name) = self
            .roster
            .names()
            .find(|name| raw.contains(name) || name.contains(raw))
        {
            debug!("speaker `{}` resolved via containment to `{}`", raw, name);
            return name.to_string();
        }
        let mut best: Option<(&str, f64)> = None;
        for name in self.roster.names() {
            let score = similarity(raw, name);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((name, score));
            }
        }
        match best {
            Some((name, score)) if score >= NPC_THRESHOLD => {
                debug!("speaker `{}` resolved via similarity {:.2} to `{}`", raw, score, name);
                name.to_string()
            }
            _ => NONE.to_string(),
        }
    }

    /// Resolve a CG tag. Exact or containment only; anything fuzzier risks
    /// showing the wrong illustration.
    pub fn match_cg(&self, raw: &str) -> String {
        if is_none_tag(raw) {
            return NONE.to_string();
        }
        let raw = raw.trim();
        if self.vocabularies.cg.contains(raw) {
            return raw.to_string();
        }
        if let Some(member) = self
            .vocabularies
            .cg
            .members
            .iter()
            .filter(|m| m.as_str() != NONE)
            .find(|m| raw.contains(m.as_str()) || m.contains(raw))
        {
            debug!("cg `{}` resolved via containment to `{}`", raw, member);
            return member.to_string();
        }
        if let Some(target) = self.vocabularies.cg.synonym_target(raw) {
            return target.to_string();
        }
        NONE.to_string()
    }
}

/// `特殊CG` followed by at least one ASCII digit.
fn is_special_cg_escape(raw: &str) -> bool {
    match raw.strip_prefix("特殊CG") {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::builtin_scene;

    fn matcher() -> TagMatcher {
        TagMatcher::builtin()
    }

    #[test]
    fn test_exact_tier_wins() {
        assert_eq!(matcher().match_scene("雪山"), "雪山");
        assert_eq!(matcher().match_emotion("平静"), "平静");
    }

    #[test]
    fn test_synonym_tier() {
        assert_eq!(matcher().match_scene("雪峰"), "雪山");
        assert_eq!(matcher().match_emotion("愤怒"), "生气");
    }

    #[test]
    fn test_containment_tier() {
        assert_eq!(matcher().match_scene("破败的废墟深处"), "废墟");
        assert_eq!(matcher().match_npc("弟子Cơ Tự上前"), "Cơ Tự");
    }

    #[test]
    fn test_similarity_tier_respects_threshold() {
        let scene = builtin_scene();
        // one edit away from a two-char member clears 0.4
        assert_eq!(fuzzy_match("邪教祭壇", &scene, SCENE_THRESHOLD), Some("邪教祭坛"));
        assert_eq!(fuzzy_match("xyz", &scene, SCENE_THRESHOLD), None);
    }

    #[test]
    fn test_keyword_fallback_after_all_tiers() {
        assert_eq!(matcher().match_scene("曲折栈桥通往悬崖"), "山道");
    }

    #[test]
    fn test_none_inputs_normalize() {
        let m = matcher();
        for raw in ["", "  ", "无", "none", "NONE"] {
            assert_eq!(m.match_scene(raw), NONE);
            assert_eq!(m.match_emotion(raw), NONE);
            assert_eq!(m.match_npc(raw), NONE);
            assert_eq!(m.match_cg(raw), NONE);
        }
    }

    #[test]
    fn test_special_cg_escape_passes_through() {
        let m = matcher();
        assert_eq!(m.match_emotion("特殊CG12"), "特殊CG12");
        assert_eq!(m.match_emotion("特殊CG"), NONE);
        assert_ne!(m.match_emotion("特殊CGx"), "特殊CGx");
    }

    #[test]
    fn test_npc_id_and_name_lookup() {
        let m = matcher();
        assert_eq!(m.match_npc("Cơ Tự"), "Cơ Tự");
        assert_eq!(m.match_npc("E"), "Cơ Tự");
        assert_eq!(m.match_npc("某个路人"), NONE);
    }

    #[test]
    fn test_members_match_themselves() {
        let m = matcher();
        for member in &builtin_scene().members {
            assert_eq!(m.match_scene(member), *member);
            assert_eq!(fuzzy_match(member, &builtin_scene(), 1.0), Some(member.as_str()));
        }
    }

    #[test]
    fn test_resolvers_are_total_and_closed() {
        let m = matcher();
        let garbage = ["???", "!!!", "☃", "平", "LinH", "山水之间有人家", "đâu đó"];
        for raw in garbage {
            let scene = m.match_scene(raw);
            assert!(scene == NONE || m.scene_vocabulary().contains(&scene), "{}", scene);
            let emotion = m.match_emotion(raw);
            assert!(emotion == NONE || !emotion.is_empty());
            let npc = m.match_npc(raw);
            assert!(npc == NONE || m.roster().id_of(&npc).is_some(), "{}", npc);
            let cg = m.match_cg(raw);
            assert!(cg == NONE || !cg.is_empty());
        }
    }

    #[test]
    fn test_cg_has_no_similarity_tier() {
        let m = matcher();
        assert_eq!(m.match_cg("拥抱"), "拥抱");
        assert_eq!(m.match_cg("紧紧拥抱"), "拥抱");
        // a near-miss that would clear any similarity threshold still fails
        assert_eq!(m.match_cg("擁抱"), NONE);
    }
}
