use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single vocabulary entry.
///
/// Owned by the caller (typically loaded through a [`crate::store::WordSource`]) and only
/// referenced by the engine; nothing in the core ever mutates a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    /// Opaque identifier, unique within a session.
    pub id: String,

    /// The target vocabulary string: what gets spoken and quizzed.
    pub text: String,

    /// The prompt shown during quizzing (the word's meaning).
    pub meaning: String,

    /// Difficulty bucket used when loading the day's list.
    #[serde(default)]
    pub grade_level: u8,
}

impl WordItem {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meaning: meaning.into(),
            grade_level: 0,
        }
    }
}

/// Count distinct `text` values in a pool.
///
/// Quiz preconditions are phrased in terms of *distinct* words so that a pool padded
/// with duplicates can't produce a question with repeated choices.
pub fn distinct_text_count(words: &[WordItem]) -> usize {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<HashSet<_>>()
        .len()
}
