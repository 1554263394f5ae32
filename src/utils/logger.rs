use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Event fields as JSON. Our events carry strings, counters and millisecond floats;
/// anything else (including `%display` fields) lands in `record_debug`.
#[derive(Default)]
struct Fields(Map<String, Value>);

impl Visit for Fields {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value).into());
    }
}

#[derive(Serialize, Clone)]
struct Resource {
    #[serde(rename = "service.name")]
    service_name: String,
    #[serde(rename = "service.version")]
    service_version: String,
}

#[derive(Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    severity_text: &'static str,
    body: String,
    resource: &'a Resource,
    attributes: Map<String, Value>,
}

/// One JSON object per line, shaped after the OpenTelemetry log data model.
struct JsonLines {
    resource: Resource,
}

impl JsonLines {
    fn record<'a>(&'a self, event: &Event<'_>) -> LogRecord<'a> {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let mut attributes = fields.0;

        let body = match attributes.remove("message") {
            Some(Value::String(s)) => s,
            _ => event.metadata().name().to_string(),
        };

        LogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            severity_text: event.metadata().level().as_str(),
            body,
            resource: &self.resource,
            attributes,
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonLines
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let line = serde_json::to_string(&self.record(event)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        // Config validation rejects anything else before we get here.
        _ => LevelFilter::INFO,
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` directives still apply on top.
pub fn init_logging(logging_config: &LoggingConfig) {
    let filter = EnvFilter::from_default_env()
        .add_directive(level_filter(&logging_config.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging_config.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().event_format(JsonLines {
                resource: Resource {
                    service_name: logging_config.service_name.clone(),
                    service_version: logging_config.service_version.clone(),
                },
            }))
            .init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(level_filter("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(level_filter(" warn "), LevelFilter::WARN);
        assert_eq!(level_filter("info"), LevelFilter::INFO);
    }

    #[test]
    fn resource_uses_otel_attribute_names() {
        let resource = Resource {
            service_name: "deal-proxy".to_string(),
            service_version: "0.1.0".to_string(),
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["service.name"], "deal-proxy");
        assert_eq!(json["service.version"], "0.1.0");
    }
}
