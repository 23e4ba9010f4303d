//! The quiz session state machine: Learning → Quizzing → Result → Learning.
//!
//! Feedback timing: this implementation uses the explicit submit-then-next style. After
//! `submit_choice` the learner can review the graded feedback for as long as they like;
//! nothing advances until `next_question` is called. (The alternative, auto-advancing on
//! a timer after submit, is deliberately not implemented.)
//!
//! Every guard failure is an ordinary error value and leaves the state untouched, so
//! rapid or out-of-order input can never corrupt a session. The one invariant that
//! matters most: once a choice is submitted it is frozen; neither the submitted choice
//! nor the score can change until the session moves on.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::quiz::{QuizQuestion, build_quiz};
use crate::word::WordItem;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum View {
    #[default]
    Learning,
    Quizzing,
    Result,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Learning => write!(f, "learning"),
            Self::Quizzing => write!(f, "quizzing"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// One quiz attempt's mutable state.
///
/// Exclusively owned by the engine; mutated only through the operations below.
#[derive(Debug, Default)]
pub struct QuizSession {
    view: View,
    questions: Vec<QuizQuestion>,
    cursor: usize,
    selected: Option<String>,
    submitted: Option<String>,
    correct_count: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The fixed question sequence (empty outside a quiz).
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the current question. Stays on the last question once the session
    /// reaches `Result`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.cursor)
    }

    /// The chosen-but-unsubmitted choice for the current question.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The committed choice for the current question.
    pub fn submitted(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Build a quiz from `words` and enter `Quizzing`. Valid only from `Learning`.
    ///
    /// Quiz building is atomic: on failure (fewer than 4 distinct words) the session is
    /// left exactly as it was.
    pub fn start_quiz(&mut self, words: &[WordItem]) -> Result<()> {
        if self.view != View::Learning {
            return Err(Error::WrongView(self.view));
        }
        let questions = build_quiz(words)?;
        debug!(questions = questions.len(), "quiz session started");

        self.questions = questions;
        self.cursor = 0;
        self.selected = None;
        self.submitted = None;
        self.correct_count = 0;
        self.view = View::Quizzing;
        Ok(())
    }

    /// Pick (or re-pick) a choice for the current question.
    ///
    /// A no-op once the question has been submitted: the answer is frozen after grading
    /// so rapid taps can't change a graded answer.
    pub fn select_choice(&mut self, choice: &str) -> Result<()> {
        if self.view != View::Quizzing {
            return Err(Error::WrongView(self.view));
        }
        if self.submitted.is_some() {
            return Err(Error::AlreadySubmitted);
        }
        self.selected = Some(choice.to_owned());
        Ok(())
    }

    /// Commit the selected choice and grade it. Returns whether it was correct.
    ///
    /// The correct-count increment happens at most once per question, enforced by the
    /// submit-once guard.
    pub fn submit_choice(&mut self) -> Result<bool> {
        if self.view != View::Quizzing {
            return Err(Error::WrongView(self.view));
        }
        if self.submitted.is_some() {
            return Err(Error::AlreadySubmitted);
        }
        let Some(choice) = self.selected.clone() else {
            return Err(Error::NoChoiceSelected);
        };

        let correct = self
            .current_question()
            .is_some_and(|q| q.answer == choice);
        self.submitted = Some(choice);
        if correct {
            self.correct_count += 1;
        }
        debug!(cursor = self.cursor, correct, "choice submitted");
        Ok(correct)
    }

    /// Move to the next question, or to `Result` after the last one.
    ///
    /// Valid only after the current question was submitted. Returns the view the
    /// session ends up in.
    pub fn next_question(&mut self) -> Result<View> {
        if self.view != View::Quizzing {
            return Err(Error::WrongView(self.view));
        }
        if self.submitted.is_none() {
            return Err(Error::NotSubmitted);
        }

        if self.cursor + 1 >= self.questions.len() {
            self.view = View::Result;
        } else {
            self.cursor += 1;
            self.selected = None;
            self.submitted = None;
        }
        Ok(self.view)
    }

    /// Discard the session entirely and return to `Learning`.
    pub fn back_to_learning(&mut self) {
        debug!("session discarded, back to learning");
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordItem;

    fn four_words() -> Vec<WordItem> {
        [
            ("a", "apple", "사과"),
            ("b", "banana", "바나나"),
            ("c", "cherry", "체리"),
            ("d", "durian", "두리안"),
        ]
        .into_iter()
        .map(|(id, text, meaning)| WordItem::new(id, text, meaning))
        .collect()
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new();
        session.start_quiz(&four_words()).unwrap();
        session
    }

    #[test]
    fn perfect_run_ends_in_result_with_full_score() {
        let mut session = started();
        assert_eq!(session.total_questions(), 4);

        for i in 0..4 {
            let answer = session.current_question().unwrap().answer.clone();
            session.select_choice(&answer).unwrap();
            assert!(session.submit_choice().unwrap());

            let view = session.next_question().unwrap();
            if i < 3 {
                assert_eq!(view, View::Quizzing);
                assert_eq!(session.cursor(), i + 1);
            } else {
                assert_eq!(view, View::Result);
            }
        }

        assert_eq!(session.correct_count(), 4);
        // The cursor parks on the last question.
        assert_eq!(session.cursor(), 3);
    }

    #[test]
    fn start_quiz_fails_without_enough_words_and_stays_learning() {
        let mut session = QuizSession::new();
        let too_few = four_words()[..3].to_vec();

        let err = session.start_quiz(&too_few).unwrap_err();
        assert!(matches!(err, Error::TooFewWords { found: 3 }));
        assert_eq!(session.view(), View::Learning);
        assert!(session.questions().is_empty());
    }

    #[test]
    fn start_quiz_is_rejected_outside_learning() {
        let mut session = started();
        let err = session.start_quiz(&four_words()).unwrap_err();
        assert!(matches!(err, Error::WrongView(View::Quizzing)));
    }

    #[test]
    fn selection_is_frozen_after_submit() {
        let mut session = started();
        let question = session.current_question().unwrap().clone();
        let wrong = question
            .choices
            .iter()
            .find(|c| **c != question.answer)
            .unwrap()
            .clone();

        session.select_choice(&question.answer).unwrap();
        session.submit_choice().unwrap();

        let err = session.select_choice(&wrong).unwrap_err();
        assert!(matches!(err, Error::AlreadySubmitted));
        assert_eq!(session.submitted(), Some(question.answer.as_str()));
        assert_eq!(session.correct_count(), 1);
    }

    #[test]
    fn double_submit_does_not_double_score() {
        let mut session = started();
        let answer = session.current_question().unwrap().answer.clone();

        session.select_choice(&answer).unwrap();
        session.submit_choice().unwrap();
        let err = session.submit_choice().unwrap_err();

        assert!(matches!(err, Error::AlreadySubmitted));
        assert_eq!(session.correct_count(), 1);
    }

    #[test]
    fn submit_without_selection_is_a_no_op() {
        let mut session = started();
        let err = session.submit_choice().unwrap_err();
        assert!(matches!(err, Error::NoChoiceSelected));
        assert!(session.submitted().is_none());
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn next_without_submit_is_a_no_op() {
        let mut session = started();
        let err = session.next_question().unwrap_err();
        assert!(matches!(err, Error::NotSubmitted));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn reselecting_before_submit_scores_the_final_selection_only() {
        let mut session = started();
        let question = session.current_question().unwrap().clone();
        let wrong = question
            .choices
            .iter()
            .find(|c| **c != question.answer)
            .unwrap()
            .clone();

        session.select_choice(&wrong).unwrap();
        session.select_choice(&question.answer).unwrap();
        session.select_choice(&wrong).unwrap();
        assert!(!session.submit_choice().unwrap());
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn next_question_in_result_view_is_a_no_op() {
        let mut session = started();
        for _ in 0..4 {
            let answer = session.current_question().unwrap().answer.clone();
            session.select_choice(&answer).unwrap();
            session.submit_choice().unwrap();
            session.next_question().unwrap();
        }
        assert_eq!(session.view(), View::Result);

        let err = session.next_question().unwrap_err();
        assert!(matches!(err, Error::WrongView(View::Result)));
        assert_eq!(session.view(), View::Result);
        assert_eq!(session.correct_count(), 4);
    }

    #[test]
    fn back_to_learning_discards_everything() {
        let mut session = started();
        let answer = session.current_question().unwrap().answer.clone();
        session.select_choice(&answer).unwrap();
        session.submit_choice().unwrap();

        session.back_to_learning();

        assert_eq!(session.view(), View::Learning);
        assert!(session.questions().is_empty());
        assert_eq!(session.cursor(), 0);
        assert!(session.selected().is_none());
        assert!(session.submitted().is_none());
        assert_eq!(session.correct_count(), 0);
    }
}
