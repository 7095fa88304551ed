//! Backend construction.
//!
//! Builds a ready-to-use [`Logger`] from a [`LogConfig`]: an `EnvFilter`
//! threshold in front of a [`JsonLayer`] writing to the configured sink.
//! Nothing process-global is touched here; installing the result as the
//! singleton is up to [`crate::global`].

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use crate::layer::JsonLayer;
use crate::{Error, LogConfig, LogOutput, Logger, Result};

/// Construct a logger writing to the stream named by `config.output`.
pub fn construct(config: &LogConfig) -> Result<Logger> {
    match config.output {
        LogOutput::Stdout => construct_with_writer(config, std::io::stdout),
        LogOutput::Stderr => construct_with_writer(config, std::io::stderr),
    }
}

/// Construct a logger writing to `make_writer`.
pub fn construct_with_writer<W>(config: &LogConfig, make_writer: W) -> Result<Logger>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_new(effective_level(config)).map_err(|e| Error::Config(e.to_string()))?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonLayer::new(config, make_writer));

    Ok(Logger::new(Dispatch::new(subscriber), &config.keys.trace_id))
}

/// The filter directive to use, falling back to "info" when unset.
fn effective_level(config: &LogConfig) -> &str {
    let level = config.level.trim();
    if level.is_empty() { "info" } else { level }
}
