//! Logging setup for the CLI.
//!
//! Logs go to stderr through a `tracing` fmt subscriber. Resolution runs under
//! a bootstrap subscriber (WARN, or DEBUG with `--verbose`); once the config is
//! known its `server.log_level` becomes the level of the global subscriber.
//! `RUST_LOG` overrides either level.

use tracing::{Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Convert a configured log level name to a tracing level.
///
/// Case-insensitive. Unknown names fall back to INFO.
pub fn level_from_str(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level used while the configuration itself is being resolved.
pub fn bootstrap_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

/// A stderr subscriber at `level`, unless `RUST_LOG` says otherwise.
pub fn subscriber(level: Level) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(level: Level) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber(level))
}
