use std::time::Duration;

/// Options that control how a drill session behaves.
///
/// This struct represents *library-level configuration*, not UI controls directly.
/// The frontend is responsible for mapping user input into this type so that:
/// - the engine remains reusable outside of any particular UI
/// - other frontends (tests, bots, batch drills) can construct options programmatically
#[derive(Debug, Clone)]
pub struct Opts {
    /// Pause between utterances inside every playback sequence.
    ///
    /// Long enough for a child to echo the word, short enough to keep the drill moving.
    pub utterance_pause: Duration,

    /// BCP 47 language tag passed to the synthesizer.
    pub language: String,

    /// Speech rate, where `1.0` is the synthesizer's natural rate. Slightly below
    /// natural speed works better for young learners.
    pub rate: f32,

    /// Grade level used when loading the day's word list.
    pub grade_level: u8,

    /// Maximum number of words in the day's list.
    pub word_limit: usize,

    /// How many recent attempts to fetch for the scoreboard.
    pub recent_limit: usize,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            utterance_pause: Duration::from_millis(900),
            language: "en-US".to_owned(),
            rate: 0.95,
            grade_level: 3,
            word_limit: 10,
            recent_limit: 10,
        }
    }
}
