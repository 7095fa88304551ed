use serde::{Deserialize, Serialize};

/// Configuration for the backend logger
///
/// The global logger always uses [`LogConfig::default`]; ctxlog reads no
/// config file or environment. `Deserialize` is provided so applications can
/// embed this struct in their own configuration and pass the result to
/// [`crate::LoggerBuilder::from_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level directive (e.g., "info", "debug", "ctxlog=debug,info")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Where records are written
    #[serde(default)]
    pub output: LogOutput,
    /// Key names of the emitted JSON record
    #[serde(default)]
    pub keys: FieldKeys,
    /// Attach the call-site location to every record
    #[serde(default = "default_true")]
    pub caller: bool,
    /// Attach a stack trace to error and fatal records
    #[serde(default = "default_true")]
    pub stacktrace: bool,
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self {
            level: default_log_level(),
            output: LogOutput::default(),
            keys: FieldKeys::default(),
            caller: true,
            stacktrace: true,
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set output stream
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Set record key names
    pub fn with_keys(mut self, keys: FieldKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Enable or disable call-site capture
    pub fn with_caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    /// Enable or disable stack traces on error and fatal records
    pub fn with_stacktrace(mut self, stacktrace: bool) -> Self {
        self.stacktrace = stacktrace;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Output stream for emitted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// Key names used in every JSON record.
///
/// Downstream log processors match on these names, so the defaults are part
/// of the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub time: String,
    pub level: String,
    pub message: String,
    pub caller: String,
    pub stacktrace: String,
    pub trace_id: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            time: "dt".to_string(),
            level: "level".to_string(),
            message: "message".to_string(),
            caller: "caller".to_string(),
            stacktrace: "stack_trace".to_string(),
            trace_id: "traceID".to_string(),
        }
    }
}

impl FieldKeys {
    /// Whether `key` is written by the backend itself.
    ///
    /// The trace key is not reserved: it travels as an ordinary field.
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.time
            || key == self.level
            || key == self.message
            || key == self.caller
            || key == self.stacktrace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_new() {
        let config = LogConfig::new();
        assert_eq!(config.level, "info");
        assert_eq!(config.output, LogOutput::Stdout);
        assert_eq!(config.keys, FieldKeys::default());
        assert!(config.caller);
        assert!(config.stacktrace);
    }

    #[test]
    fn test_log_config_default() {
        assert_eq!(LogConfig::default(), LogConfig::new());
    }

    #[test]
    fn test_log_config_with_level() {
        let config = LogConfig::new().with_level("debug");
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_log_config_with_output() {
        let config = LogConfig::new().with_output(LogOutput::Stderr);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_log_config_toggles() {
        let config = LogConfig::new().with_caller(false).with_stacktrace(false);
        assert!(!config.caller);
        assert!(!config.stacktrace);
    }

    #[test]
    fn test_default_keys() {
        let keys = FieldKeys::default();
        assert_eq!(keys.time, "dt");
        assert_eq!(keys.level, "level");
        assert_eq!(keys.message, "message");
        assert_eq!(keys.caller, "caller");
        assert_eq!(keys.stacktrace, "stack_trace");
        assert_eq!(keys.trace_id, "traceID");
    }

    #[test]
    fn test_reserved_keys() {
        let keys = FieldKeys::default();
        assert!(keys.is_reserved("dt"));
        assert!(keys.is_reserved("stack_trace"));
        assert!(!keys.is_reserved("traceID"));
        assert!(!keys.is_reserved("user_id"));
    }

    #[test]
    fn test_deserialize_toml_partial() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "debug"
            output = "stderr"

            [keys]
            time = "ts"
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "debug");
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.keys.time, "ts");
        assert_eq!(config.keys.message, "message");
        assert!(config.caller);
    }

    #[test]
    fn test_deserialize_yaml_empty_uses_defaults() {
        let config: LogConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(super::default_log_level(), "info");
        assert!(super::default_true());
    }
}
