use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize structured JSON logging.
///
/// Defaults to `warn` level unless overridden by `WORDDRILL_LOG`. Playback loops log
/// their starts/stops at `debug`, which is handy when chasing a loop that should have
/// gone silent.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("WORDDRILL_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .try_init();
}
