use nu_protocol::{LabeledError, PipelineData, Record, Span, Value};

use crate::config::TrendsConfig;
use crate::error::TrendError;

/// Convert a Nushell value into JSON so it can go through `ops`.
///
/// Dates become unix milliseconds; values with no JSON counterpart are
/// rendered as strings where possible and `null` otherwise.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nothing { .. } => serde_json::Value::Null,
        Value::Bool { val, .. } => serde_json::Value::Bool(*val),
        Value::Int { val, .. } => serde_json::Value::from(*val),
        Value::Float { val, .. } => serde_json::Number::from_f64(*val)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String { val, .. } => serde_json::Value::String(val.clone()),
        Value::Date { val, .. } => serde_json::Value::from(val.timestamp_millis()),
        Value::List { vals, .. } => serde_json::Value::Array(vals.iter().map(to_json).collect()),
        Value::Record { val, .. } => serde_json::Value::Object(
            val.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
        other => other
            .coerce_string()
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    }
}

/// Convert JSON produced by `ops` back into a Nushell value.
pub fn from_json(json: &serde_json::Value, span: Span) -> Value {
    match json {
        serde_json::Value::Null => Value::nothing(span),
        serde_json::Value::Bool(b) => Value::bool(*b, span),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::int(i, span),
            None => Value::float(n.as_f64().unwrap_or(0.0), span),
        },
        serde_json::Value::String(s) => Value::string(s.clone(), span),
        serde_json::Value::Array(items) => {
            Value::list(items.iter().map(|v| from_json(v, span)).collect(), span)
        }
        serde_json::Value::Object(map) => {
            let mut record = Record::new();
            for (k, v) in map {
                record.push(k.clone(), from_json(v, span));
            }
            Value::record(record, span)
        }
    }
}

/// Collect pipeline input into a list of JSON rows.
///
/// Handles a table, a list of strings, a single record or string, and
/// empty input.
pub fn input_rows(input: PipelineData, span: Span) -> Result<Vec<serde_json::Value>, LabeledError> {
    let value = input.into_value(span)?;
    Ok(match to_json(&value) {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Null => vec![],
        single => vec![single],
    })
}

/// Resolve config from an optional `--config` flag.
pub fn load_config(path: Option<String>, span: Span) -> Result<TrendsConfig, LabeledError> {
    TrendsConfig::load(path.as_deref().map(std::path::Path::new)).map_err(|e| labeled(e, span))
}

pub fn labeled(err: TrendError, span: Span) -> LabeledError {
    let label = match &err {
        TrendError::UnknownMetric(_) | TrendError::UnknownMomentum(_) => "invalid flag value",
        TrendError::Config { .. } => "while loading config",
        _ => "while processing input",
    };
    LabeledError::new(err.to_string()).with_label(label, span)
}
