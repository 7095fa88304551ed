//! JSON record rendering.
//!
//! [`JsonLayer`] turns every tracing event it sees into exactly one JSON
//! object followed by a newline, written with a single `write_all` so that
//! concurrent records do not interleave within a line.
//!
//! Record layout (default key names):
//!
//! ```text
//! {"dt":"2026-01-09T10:11:12.123456789+00:00","level":"info","caller":"src/main.rs:42",
//!  "message":"started","traceID":"abc-123", ...fields, "stack_trace":"..."}
//! ```
//!
//! `stack_trace` is present for error and fatal records only. A field whose
//! key collides with one of the record keys above is kept under
//! `fields.<key>`.

use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;

use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context as LayerContext, Layer};

use crate::config::{FieldKeys, LogConfig};

/// Field names the facade uses to hand data to the layer.
pub(crate) mod internal {
    pub(crate) const MESSAGE: &str = "message";
    pub(crate) const SEVERITY: &str = "ctxlog.severity";
    pub(crate) const CALLER: &str = "ctxlog.caller";
    pub(crate) const FIELDS: &str = "ctxlog.fields";
}

/// Prefix for fields whose key collides with a key the layer writes itself.
pub const RESERVED_PREFIX: &str = "fields.";

/// A layer that writes one JSON object per event.
pub struct JsonLayer<W> {
    keys: FieldKeys,
    caller: bool,
    stacktrace: bool,
    make_writer: W,
}

impl<W> JsonLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    pub fn new(config: &LogConfig, make_writer: W) -> Self {
        Self {
            keys: config.keys.clone(),
            caller: config.caller,
            stacktrace: config.stacktrace,
            make_writer,
        }
    }

    fn render(&self, event: &Event<'_>) -> Option<Vec<u8>> {
        let meta = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let level = visitor
            .severity
            .take()
            .unwrap_or_else(|| meta.level().as_str().to_ascii_lowercase());

        let mut record = Map::new();
        record.insert(self.keys.time.clone(), Value::String(timestamp()));
        record.insert(self.keys.level.clone(), Value::String(level));
        if self.caller {
            let caller = visitor.caller.take().or_else(|| {
                meta.file()
                    .map(|file| short_caller(file, meta.line().unwrap_or(0)))
            });
            if let Some(caller) = caller {
                record.insert(self.keys.caller.clone(), Value::String(caller));
            }
        }
        record.insert(
            self.keys.message.clone(),
            Value::String(visitor.message.take().unwrap_or_default()),
        );
        for (key, value) in visitor.fields {
            if self.keys.is_reserved(&key) {
                record.insert(format!("{RESERVED_PREFIX}{key}"), value);
            } else {
                record.insert(key, value);
            }
        }
        if self.stacktrace && *meta.level() == Level::ERROR {
            record.insert(
                self.keys.stacktrace.clone(),
                Value::String(Backtrace::force_capture().to_string()),
            );
        }

        let mut line = serde_json::to_vec(&record).ok()?;
        line.push(b'\n');
        Some(line)
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let Some(line) = self.render(event) else {
            return;
        };
        let mut writer = self.make_writer.make_writer_for(event.metadata());
        // Sink failures are not surfaced to the logging caller.
        let _ = writer.write_all(&line);
    }
}

/// Collects the values of one event.
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    severity: Option<String>,
    caller: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn put(&mut self, name: &str, value: Value) {
        match name {
            internal::MESSAGE => self.message = Some(value_to_string(value)),
            internal::SEVERITY => self.severity = Some(value_to_string(value)),
            internal::CALLER => self.caller = Some(value_to_string(value)),
            internal::FIELDS => match value {
                Value::String(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
                    Ok(map) => self.fields.extend(map),
                    Err(_) => {
                        self.fields.insert(name.to_string(), Value::String(text));
                    }
                },
                other => {
                    self.fields.insert(name.to_string(), other);
                }
            },
            _ => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        self.put(field.name(), Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.put(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.put(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.put(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.put(field.name(), Value::Bool(value));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.put(field.name(), Value::String(format!("{value:?}")));
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// RFC 3339 with nanoseconds, local offset when known.
fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&Rfc3339).unwrap_or_default()
}

/// Last directory plus file name, e.g. `src/main.rs:42`.
pub(crate) fn short_caller(file: &str, line: u32) -> String {
    let file = file.replace('\\', "/");
    let short = match file.rmatch_indices('/').nth(1) {
        Some((idx, _)) => &file[idx + 1..],
        None => file.as_str(),
    };
    format!("{short}:{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use tracing_subscriber::layer::SubscriberExt;

    fn with_layer(config: &LogConfig, f: impl FnOnce()) -> Vec<Value> {
        let sink = MemorySink::new();
        let subscriber =
            tracing_subscriber::registry().with(JsonLayer::new(config, sink.clone()));
        tracing::subscriber::with_default(subscriber, f);
        sink.records()
    }

    #[test]
    fn test_short_caller() {
        assert_eq!(short_caller("src/main.rs", 42), "src/main.rs:42");
        assert_eq!(short_caller("/home/u/app/src/lib.rs", 7), "src/lib.rs:7");
        assert_eq!(short_caller("main.rs", 1), "main.rs:1");
        assert_eq!(short_caller(r"C:\app\src\lib.rs", 3), "src/lib.rs:3");
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = timestamp();
        let (date, time_of_day) = ts.split_once('T').expect("date/time separator");
        assert_eq!(date.len(), 10, "{ts}");
        assert!(time_of_day.matches(':').count() >= 2, "{ts}");
    }

    #[test]
    fn test_plain_event_shape() {
        let records = with_layer(&LogConfig::default(), || {
            tracing::info!(user_id = 123, action = "login", "User logged in");
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "info");
        assert_eq!(record["message"], "User logged in");
        assert_eq!(record["user_id"], 123);
        assert_eq!(record["action"], "login");
        assert!(record["dt"].is_string());
        assert!(
            record["caller"]
                .as_str()
                .is_some_and(|c| c.starts_with("src/layer.rs:"))
        );
        assert!(record.get("stack_trace").is_none());
    }

    #[test]
    fn test_error_event_has_stack_trace() {
        let records = with_layer(&LogConfig::default(), || {
            tracing::error!("boom");
        });
        assert_eq!(records[0]["level"], "error");
        assert!(records[0]["stack_trace"].is_string());
    }

    #[test]
    fn test_stacktrace_and_caller_can_be_disabled() {
        let config = LogConfig::new().with_stacktrace(false).with_caller(false);
        let records = with_layer(&config, || {
            tracing::error!("boom");
        });
        assert!(records[0].get("stack_trace").is_none());
        assert!(records[0].get("caller").is_none());
    }

    #[test]
    fn test_internal_fields_are_unpacked() {
        let records = with_layer(&LogConfig::default(), || {
            tracing::error!(
                ctxlog.severity = "fatal",
                ctxlog.caller = "app/handler.rs:9",
                ctxlog.fields = r#"{"traceID":"t-9","attempt":2}"#,
                "{}",
                "going down"
            );
        });
        let record = &records[0];
        assert_eq!(record["level"], "fatal");
        assert_eq!(record["caller"], "app/handler.rs:9");
        assert_eq!(record["traceID"], "t-9");
        assert_eq!(record["attempt"], 2);
        assert_eq!(record["message"], "going down");
        assert!(record.get("ctxlog.fields").is_none());
    }

    #[test]
    fn test_colliding_fields_are_prefixed() {
        let records = with_layer(&LogConfig::default(), || {
            tracing::info!(ctxlog.fields = r#"{"level":"debug","dt":"x"}"#, "kept");
        });
        assert_eq!(records[0]["level"], "info");
        assert_ne!(records[0]["dt"], "x");
        assert_eq!(records[0]["fields.level"], "debug");
        assert_eq!(records[0]["fields.dt"], "x");
    }

    #[test]
    fn test_custom_keys() {
        let keys = FieldKeys {
            time: "ts".to_string(),
            message: "msg".to_string(),
            ..FieldKeys::default()
        };
        let records = with_layer(&LogConfig::new().with_keys(keys), || {
            tracing::info!("renamed");
        });
        assert_eq!(records[0]["msg"], "renamed");
        assert!(records[0]["ts"].is_string());
        assert!(records[0].get("message").is_none());
    }

    #[test]
    fn test_key_order() {
        let sink = MemorySink::new();
        let subscriber = tracing_subscriber::registry()
            .with(JsonLayer::new(&LogConfig::default(), sink.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(extra = true, "ordered");
        });
        let line = sink.lines().remove(0);
        let keys = [
            "\"dt\"",
            "\"level\"",
            "\"caller\"",
            "\"message\"",
            "\"extra\"",
            "\"stack_trace\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| line.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{line}");
    }
}
