//! The closed vocabularies tags resolve into, with their synonym and
//! keyword fallback tables.
//!
//! Tables are ordered vectors, not maps: when several entries could
//! claim an input, the first one authored wins, and keyword tables rely
//! on multi-character entries being listed before single-character ones.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("invalid vocabulary data: {0}")]
    InvalidToml(#[from] toml::de::Error),
}

/// One closed vocabulary: its members plus resolution tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchVocabulary {
    /// Valid output values, in authoring order.
    pub members: Vec<String>,
    /// Alias -> member; exact-synonym and synonym-containment tiers.
    #[serde(default)]
    pub synonyms: Vec<(String, String)>,
    /// Substring -> member; last-resort fallback scan.
    #[serde(default)]
    pub keywords: Vec<(String, String)>,
}

impl MatchVocabulary {
    pub fn contains(&self, value: &str) -> bool {
        self.members.iter().any(|member| member == value)
    }

    pub fn synonym_target(&self, alias: &str) -> Option<&str> {
        self.synonyms
            .iter()
            .find(|(from, _)| from == alias)
            .map(|(_, to)| to.as_str())
    }

    /// First keyword whose text occurs anywhere in the input.
    pub fn keyword_fallback(&self, raw: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(keyword, _)| raw.contains(keyword.as_str()))
            .map(|(_, target)| target.as_str())
    }
}

/// The three tag vocabularies the parser needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularySet {
    pub scene: MatchVocabulary,
    pub emotion: MatchVocabulary,
    pub cg: MatchVocabulary,
}

impl VocabularySet {
    /// The shipped vocabularies.
    pub fn builtin() -> Self {
        Self {
            scene: builtin_scene(),
            emotion: builtin_emotion(),
            cg: builtin_cg(),
        }
    }

    /// Load replacement vocabularies from TOML config.
    pub fn from_toml_str(raw: &str) -> Result<Self, VocabularyError> {
        Ok(toml::from_str(raw)?)
    }
}

fn table(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

fn members(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|member| member.to_string()).collect()
}

/// Scene backgrounds the renderer has art for.
pub fn builtin_scene() -> MatchVocabulary {
    MatchVocabulary {
        members: members(&[
            "沙漠", "山道", "雪山", "山谷", "冰川", "水边", "树林", "绿洲", "村落", "山洞",
            "客房", "酒肆", "商铺", "街道", "浴室", "市集", "废墟", "寺庙", "石窟", "熔岩洞",
            "地牢", "邪教祭坛", "武侠门派", "山门", "演武场", "宫殿", "庭院", "府邸", "军营",
        ]),
        synonyms: table(&[
            ("戈壁", "沙漠"),
            ("山路", "山道"),
            ("雪峰", "雪山"),
            ("峡谷", "山谷"),
            ("冰原", "冰川"),
            ("河边", "水边"),
            ("林间", "树林"),
            ("绿地", "绿洲"),
            ("小镇", "村落"),
            ("洞穴", "山洞"),
            ("旅店", "客房"),
            ("酒楼", "酒肆"),
            ("店铺", "商铺"),
            ("大街", "街道"),
            ("集市", "市集"),
            ("遗迹", "废墟"),
            ("佛寺", "寺庙"),
            ("祭坛", "邪教祭坛"),
            ("门派", "武侠门派"),
            ("大殿", "宫殿"),
            ("庭园", "庭院"),
            ("府宅", "府邸"),
            ("兵营", "军营"),
        ]),
        // multi-character keywords first; single characters are the very
        // last resort and must not shadow them
        keywords: table(&[
            ("悬崖", "山道"),
            ("峭壁", "山道"),
            ("山顶", "雪山"),
            ("冰雪", "冰川"),
            ("监狱", "地牢"),
            ("火山", "熔岩洞"),
            ("佛洞", "石窟"),
            ("练武", "演武场"),
            ("比武", "演武场"),
            ("擂台", "演武场"),
            ("皇城", "宫殿"),
            ("峰", "雪山"),
            ("巅", "雪山"),
            ("岭", "雪山"),
            ("崖", "山道"),
            ("坡", "山道"),
            ("径", "山道"),
            ("河", "水边"),
            ("湖", "水边"),
            ("溪", "水边"),
            ("泉", "水边"),
            ("潭", "水边"),
            ("瀑", "水边"),
            ("江", "水边"),
            ("林", "树林"),
            ("森", "树林"),
            ("洞", "山洞"),
            ("穴", "山洞"),
            ("窟", "石窟"),
            ("牢", "地牢"),
            ("狱", "地牢"),
            ("窖", "地牢"),
            ("派", "武侠门派"),
            ("宗", "武侠门派"),
            ("帮", "武侠门派"),
            ("庄", "府邸"),
            ("府", "府邸"),
            ("宅", "府邸"),
            ("院", "庭院"),
            ("园", "庭院"),
            ("殿", "宫殿"),
            ("宫", "宫殿"),
            ("房", "客房"),
            ("室", "客房"),
            ("店", "商铺"),
            ("铺", "商铺"),
            ("市", "市集"),
            ("坊", "市集"),
            ("寺", "寺庙"),
            ("庙", "寺庙"),
            ("观", "寺庙"),
            ("祠", "寺庙"),
            ("坛", "邪教祭坛"),
            ("城", "街道"),
            ("镇", "村落"),
            ("村", "村落"),
            ("寨", "村落"),
            ("营", "军营"),
            ("帐", "军营"),
            ("谷", "山谷"),
            ("峡", "山谷"),
            ("漠", "沙漠"),
            ("沙", "沙漠"),
            ("荒", "沙漠"),
            ("冰", "冰川"),
            ("雪", "雪山"),
            ("草", "绿洲"),
            ("山", "山道"),
        ]),
    }
}

/// Portrait expressions the renderer has sprites for.
pub fn builtin_emotion() -> MatchVocabulary {
    MatchVocabulary {
        members: members(&[
            "大笑", "平静", "生气", "兴奋", "微笑", "不满", "严肃", "害羞", "尴尬", "为难",
            "惊讶", "紧张", "害怕", "悲伤", "哭泣", "得意", "发情", "none",
        ]),
        synonyms: table(&[
            ("狂笑", "大笑"),
            ("开心", "大笑"),
            ("浅笑", "微笑"),
            ("温柔", "微笑"),
            ("冷静", "平静"),
            ("淡然", "平静"),
            ("愤怒", "生气"),
            ("激动", "兴奋"),
            ("嫌弃", "不满"),
            ("认真", "严肃"),
            ("羞涩", "害羞"),
            ("脸红", "害羞"),
            ("窘迫", "尴尬"),
            ("犹豫", "为难"),
            ("震惊", "惊讶"),
            ("不安", "紧张"),
            ("恐惧", "害怕"),
            ("难过", "悲伤"),
            ("流泪", "哭泣"),
            ("自豪", "得意"),
            ("渴望", "发情"),
        ]),
        keywords: table(&[
            ("乐", "大笑"),
            ("喜", "大笑"),
            ("笑", "微笑"),
            ("怒", "生气"),
            ("愤", "生气"),
            ("气", "生气"),
            ("哭", "哭泣"),
            ("泪", "哭泣"),
            ("泣", "哭泣"),
            ("悲", "悲伤"),
            ("伤", "悲伤"),
            ("哀", "悲伤"),
            ("忧", "悲伤"),
            ("怕", "害怕"),
            ("惧", "害怕"),
            ("恐", "害怕"),
            ("慌", "紧张"),
            ("急", "紧张"),
            ("焦", "紧张"),
            ("羞", "害羞"),
            ("臊", "害羞"),
            ("红", "害羞"),
            ("惊", "惊讶"),
            ("讶", "惊讶"),
            ("愕", "惊讶"),
            ("傲", "得意"),
            ("骄", "得意"),
            ("媚", "发情"),
            ("欲", "发情"),
            ("情", "发情"),
            ("静", "平静"),
            ("淡", "平静"),
            ("肃", "严肃"),
            ("正", "严肃"),
        ]),
    }
}

/// Event illustrations. No keyword table; a CG either names itself or the
/// tag stays `none`.
pub fn builtin_cg() -> MatchVocabulary {
    MatchVocabulary {
        members: members(&["拥抱", "牵手", "接吻", "并肩而坐", "抚琴", "对饮", "none"]),
        synonyms: table(&[
            ("相拥", "拥抱"),
            ("执手", "牵手"),
            ("亲吻", "接吻"),
            ("共饮", "对饮"),
        ]),
        keywords: Vec::new(),
    }
}
