//! Quiz construction: one 4-choice question per word in the active set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distractor::build_choices;
use crate::error::{Error, Result};
use crate::word::{WordItem, distinct_text_count};

/// A quiz needs at least this many distinct words so every question has 3 distractors.
pub const MIN_QUIZ_WORDS: usize = 4;

/// One multiple-choice question, derived from a [`WordItem`]. Built once per quiz start
/// and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Id of the source word.
    pub id: String,
    /// The prompt shown to the learner (the word's meaning).
    pub prompt: String,
    /// The correct choice.
    pub answer: String,
    /// 4 unique choices containing `answer` exactly once.
    pub choices: Vec<String>,
}

/// Build a full quiz from an ordered word set, one question per word.
///
/// The distinct-word precondition is checked once, up front, so failure is atomic:
/// no partial quiz is ever produced.
pub fn build_quiz(words: &[WordItem]) -> Result<Vec<QuizQuestion>> {
    build_quiz_with(words, &mut rand::thread_rng())
}

/// [`build_quiz`] with a caller-supplied RNG.
pub fn build_quiz_with<R: Rng + ?Sized>(
    words: &[WordItem],
    rng: &mut R,
) -> Result<Vec<QuizQuestion>> {
    let found = distinct_text_count(words);
    if found < MIN_QUIZ_WORDS {
        return Err(Error::TooFewWords { found });
    }

    words
        .iter()
        .map(|word| {
            let choices = build_choices(words, word, rng)?;
            Ok(QuizQuestion {
                id: word.id.clone(),
                prompt: if word.meaning.is_empty() {
                    "(no meaning)".to_owned()
                } else {
                    word.meaning.clone()
                },
                answer: word.text.clone(),
                choices,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn words(texts: &[&str]) -> Vec<WordItem> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| WordItem::new(i.to_string(), *t, format!("{t}-meaning")))
            .collect()
    }

    #[test]
    fn one_question_per_word_with_four_unique_choices() {
        let pool = words(&["apple", "banana", "cherry", "durian", "elder", "fig"]);
        let mut rng = StdRng::seed_from_u64(11);

        let quiz = build_quiz_with(&pool, &mut rng).unwrap();
        assert_eq!(quiz.len(), pool.len());

        for (word, question) in pool.iter().zip(&quiz) {
            assert_eq!(question.id, word.id);
            assert_eq!(question.prompt, word.meaning);
            assert_eq!(question.answer, word.text);
            assert_eq!(question.choices.len(), 4);
            assert_eq!(
                question
                    .choices
                    .iter()
                    .filter(|c| **c == question.answer)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn fails_atomically_below_four_distinct_words() {
        let pool = words(&["apple", "banana", "cherry"]);
        let err = build_quiz(&pool).unwrap_err();
        assert!(matches!(err, Error::TooFewWords { found: 3 }));
    }

    #[test]
    fn duplicate_texts_do_not_count_toward_the_minimum() {
        let pool = words(&["apple", "apple", "banana", "cherry"]);
        let err = build_quiz(&pool).unwrap_err();
        assert!(matches!(err, Error::TooFewWords { found: 3 }));
    }

    #[test]
    fn missing_meaning_falls_back_to_a_placeholder() {
        let mut pool = words(&["apple", "banana", "cherry", "durian"]);
        pool[0].meaning = String::new();

        let quiz = build_quiz(&pool).unwrap();
        assert_eq!(quiz[0].prompt, "(no meaning)");
    }
}
