//! `worddrill` is the session engine behind a children's vocabulary drill.
//!
//! This crate provides:
//! - A cancellation-token based playback controller for repeatable text-to-speech
//!   word playback (one-shot, single-word repeat, whole-list repeat)
//! - A multiple-choice quiz builder with distractor selection
//! - A quiz session state machine (learn → quiz → result → learn)
//! - Trait seams for the speech synthesizer and the persistence layer
//!
//! The engine is UI-agnostic: it sits behind whatever frontend renders the drill and
//! turns button presses into the small set of operations defined here, with an emphasis
//! on never letting rapid or overlapping input corrupt a session.

// High-level API (most consumers should start here).
pub mod engine;
pub mod opts;

// Playback: cancellable text-to-speech loops.
pub mod playback;
pub mod synthesizer;

// Quiz construction and the session state machine.
pub mod distractor;
pub mod quiz;
pub mod session;

// Identities, words, and the external persistence seams.
pub mod learner;
pub mod store;
pub mod word;

// Logging configuration and control.
pub mod logging;

pub mod error;

pub use engine::DrillEngine;
pub use error::{Error, Result};
pub use learner::Learner;
pub use opts::Opts;
pub use playback::{PlaybackController, RepeatMode};
pub use quiz::QuizQuestion;
pub use session::{QuizSession, View};
pub use synthesizer::{Synthesizer, UtteranceRequest};
pub use word::WordItem;
