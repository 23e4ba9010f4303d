//! Multiple-choice distractor selection.
//!
//! A question's choice set is built in two steps: pick 3 distinct wrong texts from the
//! pool (excluding the target), then shuffle them together with the correct answer.
//! Both shuffles are plain Fisher-Yates (`rand`'s slice shuffle); nothing here needs to
//! be cryptographically strong.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::word::WordItem;

/// Every question offers exactly this many choices.
pub const CHOICES_PER_QUESTION: usize = 4;

/// Wrong options per question.
pub const DISTRACTORS_PER_QUESTION: usize = CHOICES_PER_QUESTION - 1;

/// Pick 3 distinct incorrect texts from `pool`, excluding `target`, in random order.
///
/// Fails with [`Error::InsufficientPool`] when fewer than 3 distinct other texts exist.
pub fn pick_distractors<R: Rng + ?Sized>(
    pool: &[WordItem],
    target: &WordItem,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut others: Vec<&str> = pool
        .iter()
        .map(|w| w.text.as_str())
        .filter(|text| *text != target.text)
        .collect();
    others.sort_unstable();
    others.dedup();

    if others.len() < DISTRACTORS_PER_QUESTION {
        return Err(Error::InsufficientPool {
            target: target.text.clone(),
            found: others.len(),
        });
    }

    others.shuffle(rng);
    Ok(others
        .into_iter()
        .take(DISTRACTORS_PER_QUESTION)
        .map(str::to_owned)
        .collect())
}

/// Combine `target`'s answer with 3 distractors into a shuffled 4-choice set.
///
/// The returned set contains the answer exactly once and no duplicate values.
pub fn build_choices<R: Rng + ?Sized>(
    pool: &[WordItem],
    target: &WordItem,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut choices = pick_distractors(pool, target, rng)?;
    choices.push(target.text.clone());
    choices.shuffle(rng);
    Ok(choices)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn pool(texts: &[&str]) -> Vec<WordItem> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| WordItem::new(i.to_string(), *t, format!("meaning of {t}")))
            .collect()
    }

    #[test]
    fn choices_contain_answer_once_and_no_duplicates() {
        let words = pool(&["apple", "banana", "cherry", "durian", "elder"]);
        let mut rng = StdRng::seed_from_u64(7);

        for target in &words {
            let choices = build_choices(&words, target, &mut rng).unwrap();
            assert_eq!(choices.len(), CHOICES_PER_QUESTION);
            assert_eq!(choices.iter().filter(|c| **c == target.text).count(), 1);
            let unique: HashSet<&str> = choices.iter().map(String::as_str).collect();
            assert_eq!(unique.len(), CHOICES_PER_QUESTION);
        }
    }

    #[test]
    fn duplicate_pool_entries_never_duplicate_a_choice() {
        // "banana" appears twice in the pool but may appear at most once as a choice.
        let words = pool(&["apple", "banana", "banana", "cherry", "durian"]);
        let mut rng = StdRng::seed_from_u64(42);

        let choices = build_choices(&words, &words[0], &mut rng).unwrap();
        let unique: HashSet<&str> = choices.iter().map(String::as_str).collect();
        assert_eq!(unique.len(), CHOICES_PER_QUESTION);
    }

    #[test]
    fn fails_when_fewer_than_three_other_words_exist() {
        let words = pool(&["apple", "banana", "cherry"]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = pick_distractors(&words, &words[0], &mut rng).unwrap_err();
        assert!(matches!(err, Error::InsufficientPool { found: 2, .. }));
    }

    #[test]
    fn target_is_never_a_distractor() {
        let words = pool(&["apple", "banana", "cherry", "durian"]);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let distractors = pick_distractors(&words, &words[1], &mut rng).unwrap();
            assert!(!distractors.contains(&"banana".to_owned()));
            assert_eq!(distractors.len(), DISTRACTORS_PER_QUESTION);
        }
    }
}
