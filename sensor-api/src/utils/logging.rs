use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const DEFAULT_DIRECTIVES: &str = "sensor_api=info,tower_http=info";

/// Span fields recorded by request handlers, kept on the span so formatters can read them.
#[derive(Debug, Clone, Default)]
pub struct CustomSpanFields {
    pub raw_fields: HashMap<String, String>,
}

impl CustomSpanFields {
    fn add_field(&mut self, name: &str, value: String) {
        self.raw_fields.insert(name.to_string(), value);
    }

    /// `database.collection` when both are known, the database alone, or `-`.
    pub fn namespace(&self) -> String {
        match (self.raw_fields.get("database"), self.raw_fields.get("collection")) {
            (Some(db), Some(coll)) => format!("{}.{}", db, coll),
            (Some(db), None) => db.clone(),
            _ => "-".to_string(),
        }
    }
}

struct SpanFieldCollector {
    fields: CustomSpanFields,
}

// Integer and bool values fall back to `record_debug`, whose output matches their `Display`.
impl Visit for SpanFieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields.add_field(field.name(), format!("{:?}", value).trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.add_field(field.name(), value.to_string());
    }
}

/// Collects span fields, including those recorded after the span was created
/// (handlers record `database`/`collection` once the query is validated).
pub struct FieldCollectorLayer;

impl<S> Layer<S> for FieldCollectorLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &tracing::span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };

        let mut collector = SpanFieldCollector { fields: CustomSpanFields::default() };
        attrs.record(&mut collector);
        span.extensions_mut().insert(collector.fields);
    }

    fn on_record(&self, id: &tracing::span::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };

        let mut extensions = span.extensions_mut();
        let fields = extensions.remove::<CustomSpanFields>().unwrap_or_default();
        let mut collector = SpanFieldCollector { fields };
        values.record(&mut collector);
        extensions.insert(collector.fields);
    }
}

/// Finds the namespace recorded on the innermost span that has one.
fn current_namespace<S, N>(ctx: &FmtContext<'_, S, N>) -> String
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    ctx.event_scope()
        .and_then(|scope| {
            scope.into_iter().find_map(|span| {
                let extensions = span.extensions();
                let fields = extensions.get::<CustomSpanFields>()?;
                fields.raw_fields.contains_key("database").then(|| fields.namespace())
            })
        })
        .unwrap_or_else(|| "-".to_string())
}

mod ansi {
    pub const CYAN: &str = "\x1b[96m";
    pub const GREEN: &str = "\x1b[92m";
    pub const WHITE: &str = "\x1b[97m";
    pub const GREY: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";

    pub fn level(level: &tracing::Level) -> &'static str {
        match *level {
            tracing::Level::TRACE => GREY,
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::ERROR => "\x1b[31m",
        }
    }
}

/// Column-aligned console output:
/// `time | LEVEL | database.collection | SERVICE | message (field=value, ...)`
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        use ansi::*;

        let meta = event.metadata();
        let mut visitor = PrettyFieldVisitor::default();
        event.record(&mut visitor);

        let separator = format!("{GREY}|{RESET}");
        write!(writer, "{CYAN}{}{RESET} {separator} ", Utc::now().format("%y-%m-%d %H:%M:%S"))?;
        write!(writer, "{}{:<5}{RESET} {separator} ", ansi::level(meta.level()), meta.level())?;
        write!(writer, "{GREEN}{:<28}{RESET} {separator} ", current_namespace(ctx))?;
        write!(writer, "{GREEN}{:<10}{RESET} {separator} ", extract_service_name(meta.target()))?;
        write!(writer, "{WHITE}{}{RESET}", visitor.message)?;
        if !visitor.fields.is_empty() {
            let fields: Vec<String> =
                visitor.fields.iter().map(|(name, value)| format!("{GREY}{name}={value}{RESET}")).collect();
            write!(writer, " ({})", fields.join(", "))?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct PrettyFieldVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for PrettyFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let value = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "message" => self.message = value,
            name => self.fields.push((name, value)),
        }
    }
}

/// One JSON object per line, for log shippers.
pub struct JsonEventFormatter;

#[derive(Default)]
struct JsonFieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonFieldVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, format!("{:?}", value).trim_matches('"'));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.put(field, Value::from(value));
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }
}

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        // Event fields win over span fields of the same name
        let mut fields = Map::new();
        if let Some(span) = ctx.lookup_current() {
            fields.insert("span_name".to_string(), Value::from(span.metadata().name()));
            if let Some(span_fields) = span.extensions().get::<CustomSpanFields>() {
                fields.extend(span_fields.raw_fields.iter().map(|(k, v)| (k.clone(), Value::from(v.as_str()))));
            }
        }
        fields.extend(visitor.fields);

        let mut line = json!({
            "timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "level": meta.level().to_string(),
            "target": meta.target(),
            "service": extract_service_name(meta.target()),
            "filename": meta.file(),
            "line_number": meta.line(),
            "message": visitor.message,
        });
        if !fields.is_empty() {
            line["fields"] = Value::Object(fields);
        }

        let line = serde_json::to_string(&line).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` filters (default `sensor_api=info,tower_http=info`); `LOG_FORMAT=json` switches
/// from the pretty console format to JSON lines. Also installs `color_eyre` for panic reports.
pub fn init_logging() {
    color_eyre::install().expect("Unable to install color_eyre");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(FieldCollectorLayer)
        .with(json.then(|| fmt::layer().event_format(JsonEventFormatter)))
        .with((!json).then(|| fmt::layer().event_format(PrettyFormatter)))
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global default subscriber");
}

/// Short name shown in the service column.
fn extract_service_name(target: &str) -> &'static str {
    const SERVICES: [(&str, &str); 5] = [
        ("sensor_api::server", "HTTP"),
        ("sensor_api::core::client::database", "DATABASE"),
        ("sensor_api", "-"),
        ("tower_http", "TOWER"),
        ("mongodb", "DRIVER"),
    ];
    SERVICES.iter().find(|(prefix, _)| target.starts_with(*prefix)).map_or("EXTERNAL", |(_, name)| *name)
}
