use async_trait::async_trait;

/// One speech request handed to the synthesis capability.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    /// The text to speak.
    pub text: String,
    /// BCP 47 language tag (e.g. `en-US`).
    pub language: String,
    /// Speech rate, where `1.0` is the synthesizer's natural rate.
    pub rate: f32,
}

/// Pluggable speech-synthesis capability used by [`crate::playback::PlaybackController`].
///
/// A synthesizer turns an [`UtteranceRequest`] into audible output and resolves the
/// `speak` future exactly once, when the utterance has either finished or failed.
/// The controller treats both outcomes identically (the loop advances either way),
/// so implementations may surface errors freely without stalling playback.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Play one utterance to completion (or failure).
    async fn speak(&self, request: &UtteranceRequest) -> anyhow::Result<()>;

    /// Silence any in-flight utterance immediately.
    ///
    /// A pending `speak` future must still resolve on its own afterwards; callers that
    /// no longer care about it are expected to ignore the late completion.
    fn cancel(&self);
}
