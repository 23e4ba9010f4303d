//! The high-level drill engine.
//!
//! We expose a single, ergonomic entry point (`DrillEngine`) that wires together the
//! lower-level playback, quiz-building, and session-state logic.
//!
//! The intent is:
//! - The engine owns the long-lived pieces: the playback controller, the session state
//!   machine, the current learner selection, and the day's word list.
//! - External capabilities (speech synthesis, score persistence, word loading, the
//!   local preference cache) come in through trait seams so any frontend can supply
//!   its own.
//! - The two audio consumers never overlap: starting a quiz always silences playback,
//!   since both would otherwise fight over the one speaker.
//!
//! Playback operations are only honored in the `Learning` view; anywhere else they are
//! silent no-ops, which keeps stray UI events from a stale screen harmless.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::learner::Learner;
use crate::opts::Opts;
use crate::playback::PlaybackController;
use crate::session::{QuizSession, View};
use crate::store::{
    LEARNER_ID_KEY, LearnerStore, PreferenceCache, SavedAttempt, ScoreRecord, ScoreRecorder,
    WordSource,
};
use crate::synthesizer::Synthesizer;
use crate::word::WordItem;

/// The main entry point: one instance per device-local drill session.
///
/// Typical usage:
/// - Construct once with a synthesizer and a score recorder.
/// - Load words, select (or restore) a learner.
/// - Drive playback from the learn screen; start a quiz when ready.
/// - Walk the select → submit → next cycle; save the score from the result screen.
pub struct DrillEngine<S: Synthesizer + 'static, R: ScoreRecorder> {
    playback: PlaybackController<S>,
    session: QuizSession,
    recorder: R,
    cache: Option<Arc<dyn PreferenceCache>>,
    learner: Option<Learner>,
    words: Vec<WordItem>,
    opts: Opts,
}

impl<S: Synthesizer + 'static, R: ScoreRecorder> DrillEngine<S, R> {
    pub fn new(synthesizer: S, recorder: R, opts: Opts) -> Self {
        Self {
            playback: PlaybackController::new(synthesizer, &opts),
            session: QuizSession::new(),
            recorder,
            cache: None,
            learner: None,
            words: Vec::new(),
            opts,
        }
    }

    /// Attach a preference cache so the learner selection survives restarts.
    pub fn with_preference_cache(mut self, cache: Arc<dyn PreferenceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    // --- words ---

    /// Load the day's word list through `source`, replacing the current list.
    pub async fn load_words(&mut self, source: &dyn WordSource) -> Result<usize> {
        let words = source
            .load_words(self.opts.grade_level, self.opts.word_limit)
            .await
            .map_err(|err| Error::Storage(format!("{err:#}")))?;
        info!(count = words.len(), "word list loaded");
        self.words = words;
        Ok(self.words.len())
    }

    /// Replace the word list directly (useful for tests and offline word packs).
    pub fn set_words(&mut self, words: Vec<WordItem>) {
        self.words = words;
    }

    pub fn words(&self) -> &[WordItem] {
        &self.words
    }

    // --- learner selection ---

    pub fn select_learner(&mut self, learner: Learner) {
        if let Some(cache) = &self.cache {
            cache.set(LEARNER_ID_KEY, &learner.id);
        }
        info!(nickname = %learner.nickname, "learner selected");
        self.learner = Some(learner);
    }

    pub fn clear_learner(&mut self) {
        if let Some(cache) = &self.cache {
            cache.remove(LEARNER_ID_KEY);
        }
        self.learner = None;
    }

    pub fn learner(&self) -> Option<&Learner> {
        self.learner.as_ref()
    }

    /// Re-select the learner remembered in the preference cache, if any.
    ///
    /// A cached id that no longer exists in the store is dropped from the cache so we
    /// don't retry it forever. Returns whether a learner ended up selected.
    pub async fn restore_learner(&mut self, store: &dyn LearnerStore) -> Result<bool> {
        let Some(cache) = &self.cache else {
            return Ok(false);
        };
        let Some(id) = cache.get(LEARNER_ID_KEY) else {
            return Ok(false);
        };

        match store
            .get(&id)
            .await
            .map_err(|err| Error::Storage(format!("{err:#}")))?
        {
            Some(learner) => {
                debug!(nickname = %learner.nickname, "restored cached learner");
                self.learner = Some(learner);
                Ok(true)
            }
            None => {
                cache.remove(LEARNER_ID_KEY);
                Ok(false)
            }
        }
    }

    // --- playback (learn view only) ---

    /// Handle a "listen" press for the word with this id. No-op outside the learn view
    /// or for an unknown id.
    pub fn listen_word(&mut self, word_id: &str) {
        if self.session.view() != View::Learning {
            return;
        }
        let Some(word) = self.words.iter().find(|w| w.id == word_id).cloned() else {
            return;
        };
        self.playback.listen_word(&word);
    }

    /// Handle a "listen to all" press over the current word list. No-op outside the
    /// learn view.
    pub fn listen_all(&mut self) {
        if self.session.view() != View::Learning {
            return;
        }
        let words = self.words.clone();
        self.playback.listen_all(&words);
    }

    pub fn set_repeat_enabled(&mut self, on: bool) {
        self.playback.set_repeat_enabled(on);
    }

    pub fn stop_audio(&mut self) {
        self.playback.stop();
    }

    /// Access the playback controller directly.
    pub fn playback(&self) -> &PlaybackController<S> {
        &self.playback
    }

    /// Access the playback controller directly, mutably.
    pub fn playback_mut(&mut self) -> &mut PlaybackController<S> {
        &mut self.playback
    }

    // --- quiz lifecycle ---

    /// Start a quiz over the current word list.
    ///
    /// Requires a selected learner and at least 4 distinct words; on failure the
    /// session stays in `Learning` and playback is left untouched. On success any
    /// active playback is stopped before the first question is shown.
    pub fn start_quiz(&mut self) -> Result<()> {
        if self.learner.is_none() {
            return Err(Error::NoLearnerSelected);
        }
        self.session.start_quiz(&self.words)?;

        // Quizzing and playback share the speaker; silence the learn screen's audio.
        self.playback.stop();
        info!(questions = self.session.total_questions(), "quiz started");
        Ok(())
    }

    pub fn select_choice(&mut self, choice: &str) -> Result<()> {
        self.session.select_choice(choice)
    }

    pub fn submit_choice(&mut self) -> Result<bool> {
        self.session.submit_choice()
    }

    pub fn next_question(&mut self) -> Result<View> {
        self.session.next_question()
    }

    pub fn back_to_learning(&mut self) {
        self.session.back_to_learning();
    }

    /// Persist the finished session's score and return the refreshed recent attempts,
    /// newest first, so the result screen's scoreboard is current without a second call.
    ///
    /// Valid only in the `Result` view. The view never changes here: on failure the
    /// caller may retry, on success the result screen stays up until the learner
    /// chooses to leave.
    pub async fn save_result(&self) -> Result<Vec<SavedAttempt>> {
        if self.session.view() != View::Result {
            return Err(Error::WrongView(self.session.view()));
        }
        let learner = self.learner.as_ref().ok_or(Error::NoLearnerSelected)?;

        let record = ScoreRecord {
            learner_id: learner.id.clone(),
            score: self.session.correct_count(),
            total: self.session.total_questions(),
        };
        self.recorder
            .record(&record)
            .await
            .map_err(|err| Error::Storage(format!("{err:#}")))?;

        info!(score = record.score, total = record.total, "score saved");
        self.recent_attempts().await
    }

    /// Access the score recorder.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// The selected learner's most recent attempts, newest first.
    pub async fn recent_attempts(&self) -> Result<Vec<SavedAttempt>> {
        let learner = self.learner.as_ref().ok_or(Error::NoLearnerSelected)?;
        self.recorder
            .recent(&learner.id, self.opts.recent_limit)
            .await
            .map_err(|err| Error::Storage(format!("{err:#}")))
    }

    // --- session accessors ---

    pub fn view(&self) -> View {
        self.session.view()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn opts(&self) -> &Opts {
        &self.opts
    }
}
