//! # Ctxlog
//!
//! A process-wide structured logging facade.
//!
//! ## Features
//!
//! - One JSON object per record on standard output
//! - Lazy global logger, no setup required
//! - Trace identifiers propagated through an explicit [`Context`]
//! - Field and formatted forms for every level
//! - Built on the `tracing` ecosystem
//!
//! ## Example
//!
//! ```rust,no_run
//! use ctxlog::{Context, Field};
//!
//! let ctx = Context::new().with_trace_id("abc-123");
//!
//! ctxlog::info(&ctx, "started", &[Field::uint("workers", 4)]);
//! ctxlog::errorf!(&ctx, "failed: {}", "disk full");
//! ```
//!
//! Each call writes a line such as
//!
//! ```text
//! {"dt":"2026-01-09T10:11:12.123456789+01:00","level":"info","caller":"src/main.rs:6","message":"started","traceID":"abc-123","workers":4}
//! ```
//!
//! `debug` records are dropped by the default `info` threshold, and `fatal`
//! exits the process after writing its record.

pub mod backend;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod global;
pub mod layer;
pub mod logger;
pub mod sink;

pub use builder::LoggerBuilder;
pub use config::{FieldKeys, LogConfig, LogOutput};
pub use context::{Context, TraceId, trace_id_from_context};
pub use error::{Error, Result};
pub use field::Field;
pub use global::{
    debug, debugf, error, errorf, fatal, fatalf, global_logger, info, infof, init_global_logger,
    start_logger, with_context,
};
pub use layer::JsonLayer;
pub use logger::{Logger, Severity};
pub use sink::MemorySink;

/// Create a new [`LoggerBuilder`].
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}

/// Log a formatted message at debug level through the global logger.
///
/// ```rust,no_run
/// # let ctx = ctxlog::Context::new();
/// ctxlog::debugf!(&ctx, "cache size={}", 12);
/// ```
#[macro_export]
macro_rules! debugf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::debugf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at info level through the global logger.
#[macro_export]
macro_rules! infof {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::infof($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at error level through the global logger.
#[macro_export]
macro_rules! errorf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::errorf($ctx, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at fatal level through the global logger, then
/// exit the process.
#[macro_export]
macro_rules! fatalf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::fatalf($ctx, ::std::format_args!($($arg)+))
    };
}
