//! Turns a raw multi-line story string into display pages.
//!
//! Each input line is either plain prose or a pipe-delimited record
//! `text|speaker|scene|emotion|cg`. The stream may arrive truncated
//! mid-record, so prose accumulates until the next valid record absorbs
//! it, and whatever is left at the end still becomes a page.

use log::debug;

use crate::matcher::{is_none_tag, TagMatcher, NONE};

/// One renderable page: narration plus its resolved display tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativePage {
    pub text: String,
    pub speaker: String,
    pub scene: String,
    pub emotion: String,
    pub cg: String,
}

#[derive(Debug, Clone, Default)]
struct DisplayTags {
    speaker: String,
    scene: String,
    emotion: String,
    cg: String,
}

/// The story-text parser, bound to a tag matcher and an allowed-speaker
/// pool (usually the current party).
pub struct NarrativeLineParser<'a> {
    matcher: &'a TagMatcher,
    allowed_speakers: Vec<String>,
}

impl<'a> NarrativeLineParser<'a> {
    pub fn new(matcher: &'a TagMatcher, allowed_speakers: Vec<String>) -> Self {
        Self {
            matcher,
            allowed_speakers,
        }
    }

    /// Parse a complete raw story string into ordered pages.
    pub fn parse(&self, raw: &str) -> Vec<NarrativePage> {
        let mut pages = Vec::new();
        let mut pending_prose: Vec<String> = Vec::new();
        let mut last_valid: Option<DisplayTags> = None;

        for line in raw.trim().split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() != 5 {
                // untagged prose, or a record truncated mid-stream; keep
                // the text part and wait for the next full record
                let text = fields[0].trim();
                if !text.is_empty() {
                    pending_prose.push(text.to_string());
                }
                continue;
            }

            let text = fields[0].trim();
            let speaker = self.matcher.match_npc(&clean_tag(fields[1]));
            let scene = self.matcher.match_scene(&clean_tag(fields[2]));
            let emotion = self.matcher.match_emotion(&clean_tag(fields[3]));
            let cg = self.matcher.match_cg(&clean_tag(fields[4]));

            if !self.speaker_allowed(&speaker) || scene == NONE {
                // a bad directive degrades to narration instead of being
                // dropped
                debug!("rejected record (speaker `{}`, scene `{}`)", speaker, scene);
                if !text.is_empty() {
                    pending_prose.push(text.to_string());
                }
                continue;
            }

            let mut parts = std::mem::take(&mut pending_prose);
            if !text.is_empty() {
                parts.push(text.to_string());
            }
            let tags = DisplayTags {
                speaker,
                scene,
                emotion,
                cg,
            };
            pages.push(page_from(parts.join("\n\n"), &tags));
            last_valid = Some(tags);
        }

        if !pending_prose.is_empty() {
            let tags = last_valid.unwrap_or_else(|| DisplayTags {
                speaker: NONE.to_string(),
                scene: NONE.to_string(),
                emotion: NONE.to_string(),
                cg: NONE.to_string(),
            });
            pages.push(page_from(pending_prose.join("\n\n"), &tags));
        }
        pages
    }

    fn speaker_allowed(&self, speaker: &str) -> bool {
        if speaker == NONE {
            return true;
        }
        self.allowed_speakers.iter().any(|allowed| {
            allowed == speaker
                || self.matcher.roster().name_of(allowed) == Some(speaker)
                || self.matcher.roster().id_of(speaker) == Some(allowed.as_str())
        })
    }
}

fn page_from(text: String, tags: &DisplayTags) -> NarrativePage {
    NarrativePage {
        text,
        speaker: tags.speaker.clone(),
        scene: tags.scene.clone(),
        emotion: tags.emotion.clone(),
        cg: tags.cg.clone(),
    }
}

/// Strip a tag field to the characters a tag can legally contain: CJK,
/// Latin letters and digits, Vietnamese diacritics, and spaces. Anything
/// that cleans to a "no value" spelling becomes `none`.
fn clean_tag(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| {
            ('\u{4e00}'..='\u{9fff}').contains(&c)
                || ('\u{3400}'..='\u{4dbf}').contains(&c)
                || c.is_ascii_alphanumeric()
                || ('\u{00C0}'..='\u{1EF9}').contains(&c)
                || c == ' '
        })
        .collect();
    let cleaned = cleaned.trim().to_string();
    if is_none_tag(&cleaned) || cleaned.eq_ignore_ascii_case("không") {
        NONE.to_string()
    } else {
        cleaned
    }
}
