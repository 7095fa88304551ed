//! The process-wide logger and the context-first logging functions.
//!
//! The singleton is created lazily on first use with the default
//! [`LogConfig`]. Concurrent first callers are serialized by the cell, so at
//! most one construction succeeds. If construction fails the cell stays
//! empty, the call degrades to a no-op, and the next call retries; logging
//! callers never see the error. [`start_logger`] is the explicit variant that
//! does report it.
//!
//! Every leveled function derives a logger carrying the context's trace
//! identifier and forwards to it. Call-site locations in records point at
//! the caller of these functions.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::backend::construct;
use crate::logger::terminate;
use crate::{Context, Error, Field, LogConfig, Logger, Result};

static GLOBAL_LOGGER: OnceCell<Logger> = OnceCell::new();

/// Initialize the global logger with the default configuration.
///
/// Idempotent: returns `Ok(())` without doing anything when a global
/// logger already exists.
pub fn start_logger() -> Result<()> {
    GLOBAL_LOGGER
        .get_or_try_init(default_logger)
        .map(|_| ())
}

/// Install `logger` as the global logger.
///
/// # Errors
///
/// Returns [`Error::Init`] if a global logger already exists, either from a
/// previous install or from lazy initialization.
pub fn init_global_logger(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| Error::Init("global logger already initialized".to_string()))
}

/// The global logger, constructing it on first use.
///
/// Returns `None` when construction failed; a later call retries.
pub fn global_logger() -> Option<&'static Logger> {
    ensure_initialized(&GLOBAL_LOGGER, default_logger)
}

fn default_logger() -> Result<Logger> {
    construct(&LogConfig::default())
}

/// Return the logger in `cell`, building it with `make` if the cell is
/// empty. A failed build is dropped and leaves the cell empty.
fn ensure_initialized<F>(cell: &OnceCell<Logger>, make: F) -> Option<&Logger>
where
    F: FnOnce() -> Result<Logger>,
{
    cell.get_or_try_init(make).ok()
}

/// The global logger derived with the trace identifier of `ctx`.
pub fn with_context(ctx: &Context) -> Option<Logger> {
    global_logger().map(|logger| logger.with_context(ctx))
}

/// Log `message` with `fields` at debug level.
#[track_caller]
pub fn debug(ctx: &Context, message: &str, fields: &[Field]) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).debug(message, fields);
    }
}

/// Log `message` with `fields` at info level.
#[track_caller]
pub fn info(ctx: &Context, message: &str, fields: &[Field]) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).info(message, fields);
    }
}

/// Log `message` with `fields` at error level, with a stack trace.
#[track_caller]
pub fn error(ctx: &Context, message: &str, fields: &[Field]) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).error(message, fields);
    }
}

/// Log at fatal level, then exit the process with status 1.
///
/// Exits even when no global logger could be constructed.
#[track_caller]
pub fn fatal(ctx: &Context, message: &str, fields: &[Field]) -> ! {
    match global_logger() {
        Some(logger) => logger.with_context(ctx).fatal(message, fields),
        None => terminate(),
    }
}

/// Formatted form of [`debug`]; see also the [`debugf!`](crate::debugf!) macro.
#[track_caller]
pub fn debugf(ctx: &Context, args: fmt::Arguments<'_>) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).debugf(args);
    }
}

/// Formatted form of [`info`]; see also [`infof!`](crate::infof!).
#[track_caller]
pub fn infof(ctx: &Context, args: fmt::Arguments<'_>) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).infof(args);
    }
}

/// Formatted form of [`error`]; see also [`errorf!`](crate::errorf!).
#[track_caller]
pub fn errorf(ctx: &Context, args: fmt::Arguments<'_>) {
    if let Some(logger) = global_logger() {
        logger.with_context(ctx).errorf(args);
    }
}

/// Formatted form of [`fatal`]; exits the process after logging.
#[track_caller]
pub fn fatalf(ctx: &Context, args: fmt::Arguments<'_>) -> ! {
    match global_logger() {
        Some(logger) => logger.with_context(ctx).fatalf(args),
        None => terminate(),
    }
}
