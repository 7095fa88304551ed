//! Logger handles.
//!
//! A [`Logger`] wraps the backend dispatch plus a list of fields attached to
//! every record it emits. Deriving (`with`, `with_context`) returns a new
//! handle sharing the same dispatch; the original is never changed.

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use tracing::{Dispatch, Level};

use crate::context::{Context, trace_id_from_context};
use crate::field::{Field, FieldsJson};
use crate::layer::short_caller;

/// Target of every event emitted through a [`Logger`].
pub const TARGET: &str = "ctxlog";

/// Record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Error,
    /// Emitted, then the process exits.
    Fatal,
}

impl Severity {
    /// Lowercase name as written to the `level` key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// The tracing level used for filtering. Fatal filters as error.
    pub fn level(&self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Error | Severity::Fatal => Level::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! emit_event {
    ($level:expr, $severity:expr, $caller:expr, $fields:expr, $message:expr) => {
        tracing::event!(
            target: TARGET,
            $level,
            ctxlog.severity = $severity.as_str(),
            ctxlog.caller = %$caller,
            ctxlog.fields = %$fields,
            "{}",
            $message
        )
    };
}

/// Handle to the structured backend.
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
    trace_key: Arc<str>,
    fields: Arc<[Field]>,
}

impl Logger {
    pub(crate) fn new(dispatch: Dispatch, trace_key: &str) -> Self {
        Self {
            dispatch,
            trace_key: Arc::from(trace_key),
            fields: Arc::from(Vec::new()),
        }
    }

    /// Derive a handle that also attaches `field` to every record.
    pub fn with(&self, field: Field) -> Self {
        self.with_fields([field])
    }

    /// Derive a handle that also attaches `fields` to every record.
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let merged: Vec<Field> = self.fields.iter().cloned().chain(fields).collect();
        Self {
            dispatch: self.dispatch.clone(),
            trace_key: Arc::clone(&self.trace_key),
            fields: Arc::from(merged),
        }
    }

    /// Derive a handle carrying the trace identifier of `ctx`.
    ///
    /// The trace field is always attached; it is the empty string when the
    /// context carries no identifier.
    pub fn with_context(&self, ctx: &Context) -> Self {
        let key = self.trace_key.to_string();
        self.with(Field::string(key, trace_id_from_context(ctx)))
    }

    /// Fields attached by derivation, oldest first.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The backend dispatch, e.g. for `tracing::dispatcher::set_global_default`.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger's backend as the thread's default dispatcher,
    /// so plain `tracing` macros inside render through it. Fields attached to
    /// this handle are not applied to those events.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Whether a record at `severity` would be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        tracing::dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Debug => tracing::enabled!(target: TARGET, Level::DEBUG),
            Severity::Info => tracing::enabled!(target: TARGET, Level::INFO),
            Severity::Error | Severity::Fatal => tracing::enabled!(target: TARGET, Level::ERROR),
        })
    }

    /// Emit `message` with `fields` at `severity`. Fatal records are emitted
    /// without terminating; use [`Logger::fatal`] for that.
    ///
    /// A field named like a record key (`dt`, `level`, `caller`, `message`,
    /// `stack_trace` by default) is written as `fields.<key>`.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: &str, fields: &[Field]) {
        self.emit(severity, Location::caller(), format_args!("{message}"), fields);
    }

    /// Emit a formatted message at `severity`.
    #[track_caller]
    pub fn log_fmt(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.emit(severity, Location::caller(), args, &[]);
    }

    /// Emit `message` with `fields` at debug level.
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Debug, message, fields);
    }

    /// Emit `message` with `fields` at info level.
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Info, message, fields);
    }

    /// Emit `message` with `fields` at error level.
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Error, message, fields);
    }

    /// Emit at fatal level, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log(Severity::Fatal, message, fields);
        terminate()
    }

    /// Emit a formatted message at debug level.
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Severity::Debug, args);
    }

    /// Emit a formatted message at info level.
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Severity::Info, args);
    }

    /// Emit a formatted message at error level.
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Severity::Error, args);
    }

    /// Emit a formatted message at fatal level, then exit with status 1.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.log_fmt(Severity::Fatal, args);
        terminate()
    }

    fn emit(
        &self,
        severity: Severity,
        caller: &'static Location<'static>,
        message: fmt::Arguments<'_>,
        fields: &[Field],
    ) {
        let caller = Caller(caller);
        let chain: [&[Field]; 2] = [&self.fields, fields];
        let fields = FieldsJson(&chain);
        tracing::dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Debug => emit_event!(Level::DEBUG, severity, caller, fields, message),
            Severity::Info => emit_event!(Level::INFO, severity, caller, fields, message),
            Severity::Error | Severity::Fatal => {
                emit_event!(Level::ERROR, severity, caller, fields, message)
            }
        });
    }
}

/// Flush the standard streams and exit with status 1.
pub(crate) fn terminate() -> ! {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    std::process::exit(1)
}

struct Caller(&'static Location<'static>);

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_caller(self.0.file(), self.0.line()))
    }
}
