//! Shared operation wrappers for all interfaces (CLI, MCP, plugin).
//!
//! Each `op_*` function is a pure, synchronous wrapper around one or more
//! `algo` modules. Input and output are `serde_json::Value`, so no front end
//! needs to know about the others.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::algo::aggregate::{self, AggregateOptions};
use crate::algo::filters::TrendQuery;
use crate::algo::momentum::classify_momentum;
use crate::algo::normalize::normalize;
use crate::algo::score::average_volume;
use crate::algo::string_distance::{self, Metric};
use crate::algo::tokenizer;
use crate::algo::types::{AggregatedTrend, AggregationResult, Momentum, RawTrendInput, VolumeSample};
use crate::algo::url_normalize;
use crate::error::{Result, TrendError};

// ── Parsing helpers ──────────────────────────────────────────────────────────

pub fn parse_metric(name: &str) -> Result<Metric> {
    Metric::from_str(name).ok_or_else(|| TrendError::UnknownMetric(name.to_string()))
}

pub fn parse_momentum(name: &str) -> Result<Momentum> {
    Momentum::from_str(name).ok_or_else(|| TrendError::UnknownMomentum(name.to_string()))
}

fn get_str(row: &Map<String, Value>, field: &str) -> Option<String> {
    row.get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn get_f64(row: &Map<String, Value>, field: &str) -> Option<f64> {
    match row.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Like `get_f64`, but `inf`/`NaN` count as absent.
fn get_finite(row: &Map<String, Value>, field: &str) -> Option<f64> {
    get_f64(row, field).filter(|v| v.is_finite())
}

/// Lenient record parsing: optional fields of the wrong type are dropped,
/// a bare string becomes a topic from an unknown source.
pub fn parse_raw(row: &Value) -> Option<RawTrendInput> {
    match row {
        Value::Object(obj) => Some(RawTrendInput {
            topic: get_str(obj, "topic").unwrap_or_default(),
            source: get_str(obj, "source").unwrap_or_else(|| "unknown".into()),
            volume: get_finite(obj, "volume"),
            timestamp: get_finite(obj, "timestamp").map(|v| v as i64),
            url: get_str(obj, "url"),
            region: get_str(obj, "region"),
        }),
        Value::String(s) => Some(RawTrendInput::new(s.clone(), "unknown")),
        _ => None,
    }
}

pub fn parse_raw_records(rows: &[Value]) -> Result<Vec<RawTrendInput>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parse_raw(row).ok_or_else(|| {
                TrendError::InvalidInput(format!(
                    "record {i} must be an object or a string, got {row}"
                ))
            })
        })
        .collect()
}

/// Accept either a full aggregation result or a bare list of trends.
pub fn parse_trends(input: &Value) -> Result<Vec<AggregatedTrend>> {
    match input {
        Value::Null => Ok(vec![]),
        Value::Array(_) => Ok(serde_json::from_value(input.clone())?),
        Value::Object(obj) if obj.contains_key("trends") => {
            let result: AggregationResult = serde_json::from_value(input.clone())?;
            Ok(result.trends)
        }
        Value::Object(_) => Ok(vec![serde_json::from_value(input.clone())?]),
        other => Err(TrendError::InvalidInput(format!(
            "expected a list of trends or an aggregation result, got {other}"
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

// ── Operations ───────────────────────────────────────────────────────────────

pub fn op_aggregate(rows: &[Value], opts: &AggregateOptions) -> Result<Value> {
    let raw = parse_raw_records(rows)?;
    let result = aggregate::aggregate(&raw, opts);
    to_json(&result)
}

pub fn op_aggregate_at(rows: &[Value], opts: &AggregateOptions, now: i64) -> Result<Value> {
    let raw = parse_raw_records(rows)?;
    let result = aggregate::aggregate_at(&raw, opts, now);
    to_json(&result)
}

pub fn op_query(input: &Value, query: &TrendQuery) -> Result<Value> {
    let trends = parse_trends(input)?;
    let total = trends.len();
    let kept = query.apply(&trends);
    debug!(total, kept = kept.len(), "queried trends");
    to_json(&kept)
}

pub fn op_similarity(a: &str, b: &str, metric_name: &str, all: bool) -> Result<Value> {
    let mut out = Map::new();
    out.insert("a".into(), Value::String(a.into()));
    out.insert("b".into(), Value::String(b.into()));

    if all {
        let na = normalize(a);
        let nb = normalize(b);
        for name in Metric::all_names() {
            let metric = parse_metric(name)?;
            let score = string_distance::similarity_normalized(&na, &nb, metric);
            out.insert((*name).into(), json!(score));
        }
    } else {
        let metric = parse_metric(metric_name)?;
        out.insert("metric".into(), Value::String(metric.as_str().into()));
        out.insert(
            "similarity".into(),
            json!(string_distance::similarity(a, b, metric)),
        );
    }

    Ok(Value::Object(out))
}

pub fn op_normalize(topic: &str) -> Value {
    json!({
        "original": topic,
        "normalized": normalize(topic),
        "keywords": tokenizer::keywords(topic),
    })
}

/// Classify a bare volume history (`[{timestamp, volume}, ...]`).
pub fn op_momentum(rows: &[Value]) -> Result<Value> {
    let mut history = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            TrendError::InvalidInput(format!("sample {i} must be an object, got {row}"))
        })?;
        let (Some(timestamp), Some(volume)) =
            (get_finite(obj, "timestamp"), get_finite(obj, "volume"))
        else {
            warn!(index = i, "sample without finite timestamp and volume skipped");
            continue;
        };
        history.push(VolumeSample {
            timestamp: timestamp as i64,
            volume,
        });
    }

    Ok(json!({
        "momentum": classify_momentum(&history),
        "samples": history.len(),
        "average_volume": average_volume(&history),
    }))
}

pub fn op_normalize_url(url: &str) -> Result<Value> {
    let normalized =
        url_normalize::normalize(url).ok_or_else(|| TrendError::InvalidUrl(url.to_string()))?;
    let canonical = url_normalize::canonical_key(url).unwrap_or_default();
    Ok(json!({
        "original": url,
        "normalized": normalized,
        "canonical_key": canonical,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_raw_is_lenient() {
        let raw = parse_raw(&json!({
            "topic": "AI chatbots",
            "volume": "not a number",
            "timestamp": 1234.9,
            "region": 42
        }))
        .unwrap();
        assert_eq!(raw.topic, "AI chatbots");
        assert_eq!(raw.source, "unknown");
        assert!(raw.volume.is_none());
        assert_eq!(raw.timestamp, Some(1234));
        assert!(raw.region.is_none());
    }

    #[test]
    fn parse_raw_accepts_numeric_strings_and_bare_topics() {
        let raw = parse_raw(&json!({"topic": "x", "source": "hn", "volume": " 250 "})).unwrap();
        assert_eq!(raw.volume, Some(250.0));
        let bare = parse_raw(&json!("quantum chips")).unwrap();
        assert_eq!(bare.topic, "quantum chips");
        assert!(parse_raw(&json!(7)).is_none());
    }

    #[test]
    fn parse_trends_accepts_result_or_list() {
        let result = aggregate::aggregate_at(
            &[RawTrendInput::new("rust", "hn")],
            &AggregateOptions::default(),
            0,
        );
        let as_result = serde_json::to_value(&result).unwrap();
        let as_list = serde_json::to_value(&result.trends).unwrap();
        assert_eq!(parse_trends(&as_result).unwrap(), result.trends);
        assert_eq!(parse_trends(&as_list).unwrap(), result.trends);
        assert!(parse_trends(&json!("nope")).is_err());
    }
}
