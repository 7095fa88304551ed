//! Builder pattern for constructing loggers.
//!
//! This module provides a convenient builder API for configuring a
//! [`Logger`] and, optionally, installing it as the global logger in a
//! single chain of method calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use ctxlog::{Context, LogOutput};
//!
//! ctxlog::builder()
//!     .with_level("debug")
//!     .with_output(LogOutput::Stderr)
//!     .init()
//!     .expect("Failed to initialize logging");
//!
//! ctxlog::debug(&Context::new(), "now visible", &[]);
//! ```

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::backend::{construct, construct_with_writer};
use crate::global::init_global_logger;
use crate::{FieldKeys, LogConfig, LogOutput, Logger, Result};

/// A builder for configuring and constructing a [`Logger`].
#[derive(Debug)]
pub struct LoggerBuilder {
    config: LogConfig,
    writer: Option<BoxMakeWriter>,
}

impl LoggerBuilder {
    /// Create a new LoggerBuilder with default configuration.
    pub fn new() -> Self {
        Self {
            config: LogConfig::new(),
            writer: None,
        }
    }

    /// Create a LoggerBuilder from an existing configuration.
    pub fn from_config(config: LogConfig) -> Self {
        Self {
            config,
            writer: None,
        }
    }

    /// Set the level directive (e.g., "debug", "info", "ctxlog=error").
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config = self.config.with_level(level);
        self
    }

    /// Write to standard output or standard error.
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.config = self.config.with_output(output);
        self
    }

    /// Write to a custom sink instead of the configured output stream.
    pub fn with_writer<W>(mut self, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(make_writer));
        self
    }

    /// Rename the keys of the emitted records.
    pub fn with_keys(mut self, keys: FieldKeys) -> Self {
        self.config = self.config.with_keys(keys);
        self
    }

    /// Enable or disable call-site capture.
    pub fn with_caller(mut self, caller: bool) -> Self {
        self.config = self.config.with_caller(caller);
        self
    }

    /// Enable or disable stack traces on error and fatal records.
    pub fn with_stacktrace(mut self, stacktrace: bool) -> Self {
        self.config = self.config.with_stacktrace(stacktrace);
        self
    }

    /// Get the current configuration without constructing anything.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Construct the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if the level directive is invalid.
    pub fn build(self) -> Result<Logger> {
        match self.writer {
            Some(writer) => construct_with_writer(&self.config, writer),
            None => construct(&self.config),
        }
    }

    /// Construct the logger and install it as the global logger.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The level directive is invalid
    /// - A global logger already exists
    pub fn init(self) -> Result<()> {
        init_global_logger(self.build()?)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::sink::MemorySink;

    #[test]
    fn test_builder_new() {
        let builder = LoggerBuilder::new();
        assert_eq!(builder.config(), &LogConfig::default());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = LoggerBuilder::new()
            .with_level("debug")
            .with_output(LogOutput::Stderr)
            .with_caller(false)
            .with_stacktrace(false);

        let config = builder.config();
        assert_eq!(config.level, "debug");
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(!config.caller);
        assert!(!config.stacktrace);
    }

    #[test]
    fn test_builder_from_config() {
        let original = LogConfig::new().with_level("error");
        let builder = LoggerBuilder::from_config(original.clone());
        assert_eq!(builder.config(), &original);
    }

    #[test]
    fn test_builder_with_writer() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .with_writer(sink.clone())
            .build()
            .unwrap();
        logger.info("into the sink", &[]);
        assert_eq!(sink.records()[0]["message"], "into the sink");
    }

    #[test]
    fn test_builder_with_keys() {
        let sink = MemorySink::new();
        let keys = FieldKeys {
            trace_id: "trace_id".to_string(),
            ..FieldKeys::default()
        };
        let logger = LoggerBuilder::new()
            .with_keys(keys)
            .with_writer(sink.clone())
            .build()
            .unwrap();
        logger
            .with_context(&crate::Context::new().with_trace_id("t"))
            .info("renamed", &[]);
        let record = &sink.records()[0];
        assert_eq!(record["trace_id"], "t");
        assert!(record.get("traceID").is_none());
    }

    #[test]
    fn test_builder_invalid_level() {
        let result = LoggerBuilder::new().with_level("ctxlog=loud").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
