use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One trend mention as reported by a single content source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrendInput {
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_source() -> String {
    "unknown".into()
}

impl RawTrendInput {
    pub fn new(topic: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// A single (timestamp, volume) observation in a cluster's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    pub timestamp: i64,
    pub volume: f64,
}

/// Momentum buckets. Variant order is the filter ordering:
/// `Falling < Stable < Rising < Exploding`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Falling,
    #[default]
    Stable,
    Rising,
    Exploding,
}

impl Momentum {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Falling => "falling",
            Self::Stable => "stable",
            Self::Rising => "rising",
            Self::Exploding => "exploding",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "falling" => Some(Self::Falling),
            "stable" => Some(Self::Stable),
            "rising" => Some(Self::Rising),
            "exploding" => Some(Self::Exploding),
            _ => None,
        }
    }

    /// Score adjustment applied by the combiner.
    pub fn bonus(&self) -> f64 {
        match self {
            Self::Exploding => 20.0,
            Self::Rising => 10.0,
            Self::Stable => 0.0,
            Self::Falling => -10.0,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["falling", "stable", "rising", "exploding"]
    }
}

/// A deduplicated cluster of raw mentions that refer to the same topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTrend {
    pub id: String,
    /// Wording of the first mention that seeded the cluster.
    pub topic: String,
    pub normalized_topic: String,
    /// Distinct sources in first-seen order.
    pub sources: Vec<String>,
    pub source_count: usize,
    pub combined_score: u8,
    pub first_seen: i64,
    pub last_seen: i64,
    pub momentum: Momentum,
    pub volume_history: Vec<VolumeSample>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    pub rank: usize,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Snapshot produced by one aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub trends: Vec<AggregatedTrend>,
    pub source_breakdown: BTreeMap<String, usize>,
    pub total_raw: usize,
    pub unique_count: usize,
    pub aggregated_at: i64,
}

impl AggregationResult {
    pub fn empty(now: i64) -> Self {
        Self {
            aggregated_at: now,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_ordering() {
        assert!(Momentum::Falling < Momentum::Stable);
        assert!(Momentum::Stable < Momentum::Rising);
        assert!(Momentum::Rising < Momentum::Exploding);
    }

    #[test]
    fn momentum_from_str_round_trips_names() {
        for name in Momentum::all_names() {
            let m = Momentum::from_str(name).unwrap();
            assert_eq!(m.as_str(), *name);
        }
        assert_eq!(Momentum::from_str("  RISING "), Some(Momentum::Rising));
        assert!(Momentum::from_str("sideways").is_none());
    }

    #[test]
    fn momentum_serializes_lowercase() {
        let json = serde_json::to_string(&Momentum::Exploding).unwrap();
        assert_eq!(json, "\"exploding\"");
    }

    #[test]
    fn raw_input_optional_fields_default() {
        let raw: RawTrendInput = serde_json::from_str(r#"{"topic": "rust 2024"}"#).unwrap();
        assert_eq!(raw.source, "unknown");
        assert!(raw.volume.is_none());
        assert!(raw.timestamp.is_none());
        assert!(raw.url.is_none());
        assert!(raw.region.is_none());
    }
}
