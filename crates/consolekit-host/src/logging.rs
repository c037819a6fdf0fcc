//! Configuration-driven structured logger.
//!
//! The logger is built from the `Logging` section of the resolved
//! configuration and tags every record with the application name. It is
//! installed once as the `log` backend before any other component logs.

use crate::context::current_properties;
use crate::error::HostError;
use chrono::{DateTime, SecondsFormat, Utc};
use consolekit_config::{AppSettings, ConfigError, ResolvedConfiguration, SettingEnum};
use log::kv::{self, Key, VisitSource};
use log::{LevelFilter, Record};
use serde_json::{Map, Value, json};
use std::io::{self, Write};
use std::sync::Arc;

/// Field added to every record.
pub const APPLICATION_CONTEXT: &str = "ApplicationContext";

const MINIMUM_LEVEL_KEY: &str = "Logging:MinimumLevel";
const DEFAULT_LEVEL_KEY: &str = "Logging:MinimumLevel:Default";
const OVERRIDE_KEY: &str = "Logging:MinimumLevel:Override";
const TARGET_KEY: &str = "Logging:Target";
const FORMAT_KEY: &str = "Logging:Format";

/// Minimum severity names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Verbose => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Information => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::Error,
        }
    }
}

impl SettingEnum for LogLevel {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Verbose", LogLevel::Verbose),
        ("Debug", LogLevel::Debug),
        ("Information", LogLevel::Information),
        ("Warning", LogLevel::Warning),
        ("Error", LogLevel::Error),
        ("Fatal", LogLevel::Fatal),
    ];
}

/// Output stream for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

impl SettingEnum for LogTarget {
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("Stdout", LogTarget::Stdout), ("Stderr", LogTarget::Stderr)];
}

/// Rendering of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl SettingEnum for LogFormat {
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("Text", LogFormat::Text), ("Json", LogFormat::Json)];
}

/// Logger settings read from the `Logging` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSettings {
    pub minimum_level: LogLevel,
    /// Per-module minimum levels, module paths in `::` form.
    pub overrides: Vec<(String, LogLevel)>,
    pub target: LogTarget,
    pub format: LogFormat,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            minimum_level: LogLevel::Information,
            overrides: Vec::new(),
            target: LogTarget::Stderr,
            format: LogFormat::Text,
        }
    }
}

impl LoggerSettings {
    /// Read logger settings, falling back to defaults for absent keys.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = settings.configuration();
        let level_key = if config.contains_key(MINIMUM_LEVEL_KEY) {
            MINIMUM_LEVEL_KEY
        } else {
            DEFAULT_LEVEL_KEY
        };
        let minimum_level = settings.get_enum_value(level_key, defaults.minimum_level)?;

        let mut overrides = Vec::new();
        for (module, raw) in config.children(OVERRIDE_KEY) {
            let key = format!("{OVERRIDE_KEY}:{module}");
            let level = LogLevel::parse_setting(&key, &raw)?;
            overrides.push((module.replace('.', "::"), level));
        }

        Ok(Self {
            minimum_level,
            overrides,
            target: settings.get_enum_value(TARGET_KEY, defaults.target)?,
            format: settings.get_enum_value(FORMAT_KEY, defaults.format)?,
        })
    }
}

/// Logger built for one application, not yet installed.
pub struct ConsoleLogger {
    app_name: String,
    inner: env_logger::Logger,
}

impl ConsoleLogger {
    pub fn new(app_name: impl Into<String>, settings: LoggerSettings) -> Self {
        let app_name = app_name.into();
        let mut builder = env_logger::Builder::new();
        builder.filter_level(settings.minimum_level.to_filter());
        for (module, level) in &settings.overrides {
            builder.filter_module(module, level.to_filter());
        }
        builder.target(match settings.target {
            LogTarget::Stdout => env_logger::Target::Stdout,
            LogTarget::Stderr => env_logger::Target::Stderr,
        });
        let format = settings.format;
        let context = app_name.clone();
        builder.format(move |buf, record| write_record(buf, format, &context, Utc::now(), record));

        Self {
            app_name,
            inner: builder.build(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Most verbose level any module will emit.
    pub fn max_level(&self) -> LevelFilter {
        self.inner.filter()
    }

    /// Install as the process-wide `log` backend. Fails if one already exists.
    pub fn install(self) -> Result<(), HostError> {
        let max_level = self.inner.filter();
        log::set_boxed_logger(Box::new(self.inner))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

/// Build the application logger from resolved configuration.
pub fn create_logger(
    config: &Arc<ResolvedConfiguration>,
    app_name: &str,
) -> Result<ConsoleLogger, HostError> {
    let settings = LoggerSettings::from_settings(&AppSettings::new(config.clone()))?;
    Ok(ConsoleLogger::new(app_name, settings))
}

/// Render one record as a single line.
pub fn write_record<W: Write>(
    out: &mut W,
    format: LogFormat,
    app_name: &str,
    timestamp: DateTime<Utc>,
    record: &Record<'_>,
) -> io::Result<()> {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let fields = record_fields(record)?;
    match format {
        LogFormat::Text => {
            write!(
                out,
                "{timestamp} {:<5} [{}] {} {{{APPLICATION_CONTEXT}={app_name}",
                record.level().as_str(),
                record.target(),
                record.args()
            )?;
            for (key, value) in &fields {
                write!(out, ", {key}={value}")?;
            }
            writeln!(out, "}}")
        }
        LogFormat::Json => {
            let mut line = Map::new();
            line.insert("timestamp".to_string(), json!(timestamp));
            line.insert("level".to_string(), json!(record.level().as_str()));
            line.insert("target".to_string(), json!(record.target()));
            line.insert("message".to_string(), json!(record.args().to_string()));
            line.insert(APPLICATION_CONTEXT.to_string(), json!(app_name));
            for (key, value) in fields {
                line.entry(key).or_insert(Value::String(value));
            }
            writeln!(out, "{}", Value::Object(line))
        }
    }
}

/// Ambient properties followed by pairs attached at the call site. A call-site
/// pair hides an ambient property with the same key.
fn record_fields(record: &Record<'_>) -> io::Result<Vec<(String, String)>> {
    let mut collector = FieldCollector(Vec::new());
    record
        .key_values()
        .visit(&mut collector)
        .map_err(|err| io::Error::other(err.to_string()))?;

    let mut fields: Vec<(String, String)> = current_properties()
        .into_iter()
        .filter(|(key, _)| !collector.0.iter().any(|(own, _)| own == key))
        .collect();
    fields.extend(collector.0);
    Ok(fields)
}

struct FieldCollector(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for FieldCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::push_property;
    use chrono::TimeZone;
    use consolekit_config::HostEnvironment;
    use log::Level;
    use pretty_assertions::assert_eq;

    fn settings(value: Value) -> AppSettings {
        let config = ResolvedConfiguration::from_value(value, HostEnvironment::Development)
            .expect("config");
        AppSettings::new(Arc::new(config))
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn defaults_apply_without_logging_section() {
        let parsed = LoggerSettings::from_settings(&settings(json!({}))).unwrap();
        assert_eq!(parsed, LoggerSettings::default());
    }

    #[test]
    fn reads_levels_overrides_target_and_format() {
        let parsed = LoggerSettings::from_settings(&settings(json!({
            "Logging": {
                "MinimumLevel": {
                    "Default": "Debug",
                    "Override": { "consolekit_host.registry": "Warning" }
                },
                "Target": "Stdout",
                "Format": "Json"
            }
        })))
        .unwrap();
        assert_eq!(parsed.minimum_level, LogLevel::Debug);
        assert_eq!(
            parsed.overrides,
            vec![("consolekit_host::registry".to_string(), LogLevel::Warning)]
        );
        assert_eq!(parsed.target, LogTarget::Stdout);
        assert_eq!(parsed.format, LogFormat::Json);
    }

    #[test]
    fn scalar_minimum_level_is_accepted() {
        let parsed = LoggerSettings::from_settings(&settings(json!({
            "Logging": { "MinimumLevel": "Verbose" }
        })))
        .unwrap();
        assert_eq!(parsed.minimum_level.to_filter(), LevelFilter::Trace);
    }

    #[test]
    fn unknown_level_name_is_a_parse_error() {
        let err = LoggerSettings::from_settings(&settings(json!({
            "Logging": { "MinimumLevel": { "Default": "info" } }
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn logger_filter_follows_settings() {
        let logger = ConsoleLogger::new(
            "Sample",
            LoggerSettings {
                minimum_level: LogLevel::Warning,
                ..LoggerSettings::default()
            },
        );
        assert_eq!(logger.app_name(), "Sample");
        assert_eq!(logger.max_level(), LevelFilter::Warn);
    }

    #[test]
    fn text_records_carry_application_context_and_fields() {
        let kvs: &[(&str, &str)] = &[("user", "alice")];
        let mut out = Vec::new();
        write_record(
            &mut out,
            LogFormat::Text,
            "Sample",
            fixed_time(),
            &Record::builder()
                .args(format_args!("hello {}", "world"))
                .level(Level::Info)
                .target("sample")
                .key_values(&kvs)
                .build(),
        )
        .expect("write");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2026-01-02T03:04:05.000Z INFO  [sample] hello world {ApplicationContext=Sample, user=alice}\n"
        );
    }

    #[test]
    fn json_records_are_one_object_per_line() {
        let mut out = Vec::new();
        write_record(
            &mut out,
            LogFormat::Json,
            "Sample",
            fixed_time(),
            &Record::builder()
                .args(format_args!("warned"))
                .level(Level::Warn)
                .target("sample")
                .build(),
        )
        .expect("write");
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let value: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["ApplicationContext"], "Sample");
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["message"], "warned");
        assert_eq!(value["timestamp"], "2026-01-02T03:04:05.000Z");
    }

    #[test]
    fn scoped_properties_enrich_text_records() {
        let _operation = push_property("Operation", "import");
        let _user = push_property("user", "ambient");
        let kvs: &[(&str, &str)] = &[("user", "alice")];
        let mut out = Vec::new();
        write_record(
            &mut out,
            LogFormat::Text,
            "Sample",
            fixed_time(),
            &Record::builder()
                .args(format_args!("step"))
                .level(Level::Debug)
                .target("sample")
                .key_values(&kvs)
                .build(),
        )
        .expect("write");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2026-01-02T03:04:05.000Z DEBUG [sample] step {ApplicationContext=Sample, Operation=import, user=alice}\n"
        );
    }

    #[test]
    fn scoped_properties_enrich_json_records() {
        let mut out = Vec::new();
        {
            let _operation = push_property("Operation", "import");
            write_record(
                &mut out,
                LogFormat::Json,
                "Sample",
                fixed_time(),
                &Record::builder()
                    .args(format_args!("inside"))
                    .level(Level::Info)
                    .target("sample")
                    .build(),
            )
            .expect("write");
        }
        write_record(
            &mut out,
            LogFormat::Json,
            "Sample",
            fixed_time(),
            &Record::builder()
                .args(format_args!("outside"))
                .level(Level::Info)
                .target("sample")
                .build(),
        )
        .expect("write");

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines[0]["Operation"], "import");
        assert_eq!(lines[0]["ApplicationContext"], "Sample");
        assert!(lines[1].get("Operation").is_none());
    }
}
