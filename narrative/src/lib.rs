//! # Narrative
//!
//! Turns raw story output from an upstream generator into displayable
//! pages: tagged-line parsing, fuzzy tag resolution against closed
//! vocabularies, and the similarity scoring underneath.

pub mod matcher;
pub mod parser;
pub mod similarity;
pub mod vocabulary;

pub use matcher::{fuzzy_match, TagMatcher, NONE};
pub use parser::{NarrativeLineParser, NarrativePage};
pub use similarity::{levenshtein, similarity};
pub use vocabulary::{MatchVocabulary, VocabularyError, VocabularySet};
