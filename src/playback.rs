//! Cancellable, repeatable text-to-speech playback over a word list.
//!
//! The controller guarantees that at most one speech sequence is audibly active at any
//! time, no matter how quickly the caller switches between one-shot playback, single-word
//! repeat, and whole-list repeat. The only synchronization primitive is a monotonically
//! increasing cancellation token:
//!
//! - every stop/switch bumps the token,
//! - every loop captures the token value at start,
//! - every loop re-checks the captured value immediately after *each* await point
//!   (utterance completion and the inter-utterance pause),
//! - a mismatch means a newer intent superseded the loop, which then exits without
//!   emitting further audio or touching the playing marker.
//!
//! Token transitions and marker writes happen together under the marker's mutex, so a
//! loop can only claim or release the marker while its token is verifiably current. On
//! a multi-thread runtime this closes the window where a loop reads a still-current
//! token, a concurrent `stop` bumps it and clears the marker, and the loop then writes
//! a marker nobody will ever clear.
//!
//! Cancellation is cooperative: a loop can't be interrupted mid-utterance, so `stop`
//! additionally asks the synthesizer to silence in-flight audio. The stale loop's
//! completion signal still fires later and is ignored via the token check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::opts::Opts;
use crate::synthesizer::{Synthesizer, UtteranceRequest};
use crate::word::WordItem;

/// Which repeat sequence is currently requested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    None,
    /// Repeat a single word (by id) until stopped.
    Word(String),
    /// Cycle through the whole list, wrapping at the end, until stopped.
    All,
}

/// State shared between the controller and its spawned loop tasks.
struct Shared {
    /// The cancellation token. Never reset, never reused: strictly increasing for the
    /// life of the controller.
    token: AtomicU64,
    /// Id of the word whose utterance is currently in flight (or pausing before the
    /// next iteration), if any.
    playing: Mutex<Option<String>>,
}

impl Shared {
    fn lock_playing(&self) -> MutexGuard<'_, Option<String>> {
        self.playing.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_token(&self) -> u64 {
        self.token.load(Ordering::SeqCst)
    }

    /// Bump the token and clear the marker as one step under the marker lock, so no
    /// loop holding the old token can claim the marker afterwards.
    fn invalidate(&self) -> u64 {
        let mut playing = self.lock_playing();
        *playing = None;
        self.token.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the playing marker, but only while `token` is still current.
    fn claim_playing(&self, id: &str, token: u64) -> bool {
        let mut playing = self.lock_playing();
        if self.current_token() != token {
            return false;
        }
        *playing = Some(id.to_owned());
        true
    }

    /// Clear the playing marker, but only while `token` is still current. A stale loop
    /// must never wipe a successor's marker.
    fn release_playing(&self, token: u64) {
        let mut playing = self.lock_playing();
        if self.current_token() == token {
            *playing = None;
        }
    }

    fn playing(&self) -> Option<String> {
        self.lock_playing().clone()
    }
}

/// Drives zero, one, or many sequential speech-synthesis calls over a word list.
///
/// All operations return immediately; the actual playback runs on spawned Tokio tasks,
/// so the controller must be used from within a Tokio runtime. Operations never fail:
/// synthesis errors are absorbed and treated as utterance completion.
pub struct PlaybackController<S: Synthesizer + 'static> {
    synth: Arc<S>,
    shared: Arc<Shared>,
    repeat_on: bool,
    mode: RepeatMode,
    pause: Duration,
    language: String,
    rate: f32,
}

impl<S: Synthesizer + 'static> PlaybackController<S> {
    pub fn new(synth: S, opts: &Opts) -> Self {
        Self {
            synth: Arc::new(synth),
            shared: Arc::new(Shared {
                token: AtomicU64::new(0),
                playing: Mutex::new(None),
            }),
            repeat_on: false,
            mode: RepeatMode::None,
            pause: opts.utterance_pause,
            language: opts.language.clone(),
            rate: opts.rate,
        }
    }

    /// Invalidate any running loop and silence in-flight audio immediately.
    pub fn stop(&mut self) {
        let token = self.supersede();
        debug!(token, "playback stopped");
    }

    /// Play exactly one utterance for `word`, superseding any running loop.
    pub fn speak_once(&mut self, word: &WordItem) {
        let token = self.supersede();
        let synth = Arc::clone(&self.synth);
        let shared = Arc::clone(&self.shared);
        let request = self.request_for(word);
        let id = word.id.clone();

        tokio::spawn(async move {
            if !speak_step(&*synth, &shared, &request, &id, token).await {
                return;
            }
            shared.release_playing(token);
        });
    }

    /// Repeat `word` (speak, pause, speak, ...) until superseded.
    pub fn start_word_repeat(&mut self, word: &WordItem) {
        let token = self.supersede();
        self.mode = RepeatMode::Word(word.id.clone());

        let synth = Arc::clone(&self.synth);
        let shared = Arc::clone(&self.shared);
        let request = self.request_for(word);
        let id = word.id.clone();
        let pause = self.pause;
        debug!(word = %request.text, token, "word repeat started");

        tokio::spawn(async move {
            loop {
                if !speak_step(&*synth, &shared, &request, &id, token).await {
                    return;
                }
                if !pause_step(&shared, pause, token).await {
                    return;
                }
            }
        });
    }

    /// Advance through `words` in order, wrapping at the end, until superseded.
    ///
    /// An empty list is a no-op beyond stopping whatever was playing before.
    pub fn start_list_repeat(&mut self, words: &[WordItem]) {
        let token = self.supersede();
        if words.is_empty() {
            return;
        }
        self.mode = RepeatMode::All;

        let synth = Arc::clone(&self.synth);
        let shared = Arc::clone(&self.shared);
        let requests: Vec<(UtteranceRequest, String)> = words
            .iter()
            .map(|w| (self.request_for(w), w.id.clone()))
            .collect();
        let pause = self.pause;
        debug!(count = requests.len(), token, "list repeat started");

        tokio::spawn(async move {
            let mut i = 0usize;
            loop {
                let (request, id) = &requests[i];
                if !speak_step(&*synth, &shared, request, id, token).await {
                    return;
                }
                if !pause_step(&shared, pause, token).await {
                    return;
                }
                i = (i + 1) % requests.len();
            }
        });
    }

    /// Play each word exactly once in order, then go idle.
    ///
    /// An empty list is a no-op beyond stopping whatever was playing before.
    pub fn play_once_through(&mut self, words: &[WordItem]) {
        let token = self.supersede();
        if words.is_empty() {
            return;
        }

        let synth = Arc::clone(&self.synth);
        let shared = Arc::clone(&self.shared);
        let requests: Vec<(UtteranceRequest, String)> = words
            .iter()
            .map(|w| (self.request_for(w), w.id.clone()))
            .collect();
        let pause = self.pause;
        debug!(count = requests.len(), token, "once-through playback started");

        tokio::spawn(async move {
            for (request, id) in &requests {
                if !speak_step(&*synth, &shared, request, id, token).await {
                    return;
                }
                if !pause_step(&shared, pause, token).await {
                    return;
                }
            }
            shared.release_playing(token);
        });
    }

    /// Set the repeat preference. Turning it off always stops active playback,
    /// regardless of which mode was running.
    pub fn set_repeat_enabled(&mut self, on: bool) {
        self.repeat_on = on;
        if !on {
            self.stop();
        }
    }

    /// The "listen" button for one word.
    ///
    /// Repeat off: play the word once. Repeat on: toggle single-word repeat. Pressing
    /// the word that is already repeating stops it, pressing any other word (or pressing
    /// while list repeat runs) switches to that word's repeat.
    pub fn listen_word(&mut self, word: &WordItem) {
        if !self.repeat_on {
            self.speak_once(word);
            return;
        }
        if matches!(&self.mode, RepeatMode::Word(id) if *id == word.id) {
            self.stop();
            return;
        }
        self.start_word_repeat(word);
    }

    /// The "listen to all" button.
    ///
    /// Repeat off: play the list once through. Repeat on: toggle whole-list repeat.
    pub fn listen_all(&mut self, words: &[WordItem]) {
        if !self.repeat_on {
            self.play_once_through(words);
            return;
        }
        if self.mode == RepeatMode::All {
            self.stop();
            return;
        }
        self.start_list_repeat(words);
    }

    pub fn repeat_enabled(&self) -> bool {
        self.repeat_on
    }

    pub fn repeat_mode(&self) -> &RepeatMode {
        &self.mode
    }

    /// Id of the word whose utterance is currently in flight, if any.
    pub fn playing_word(&self) -> Option<String> {
        self.shared.playing()
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing().is_some()
    }

    /// Current cancellation token value.
    ///
    /// This is primarily intended for diagnostics and debugging.
    pub fn token(&self) -> u64 {
        self.shared.current_token()
    }

    /// Access the underlying synthesizer.
    pub fn synthesizer(&self) -> &S {
        &self.synth
    }

    /// Invalidate the current loop, silence in-flight audio, and clear the marker.
    /// Returns the fresh token under which a successor loop may run.
    fn supersede(&mut self) -> u64 {
        let token = self.shared.invalidate();
        self.synth.cancel();
        self.mode = RepeatMode::None;
        token
    }

    fn request_for(&self, word: &WordItem) -> UtteranceRequest {
        UtteranceRequest {
            text: word.text.clone(),
            language: self.language.clone(),
            rate: self.rate,
        }
    }
}

/// One utterance within a loop: claim the playing marker, speak, re-check the token.
///
/// Returns `false` when the loop is stale and must exit. A synthesis failure counts as
/// a completed utterance so a broken synthesizer can never wedge the loop in "playing".
async fn speak_step<S: Synthesizer + ?Sized>(
    synth: &S,
    shared: &Shared,
    request: &UtteranceRequest,
    word_id: &str,
    token: u64,
) -> bool {
    if !shared.claim_playing(word_id, token) {
        return false;
    }
    if let Err(err) = synth.speak(request).await {
        warn!(word = %request.text, error = %format!("{err:#}"), "synthesis failed, treating as completed");
    }
    shared.current_token() == token
}

/// The fixed inter-utterance pause, with the mandatory token re-check after resuming.
async fn pause_step(shared: &Shared, pause: Duration, token: u64) -> bool {
    sleep(pause).await;
    shared.current_token() == token
}
