use serde::{Deserialize, Serialize};

use super::types::{AggregatedTrend, Momentum};

pub const DEFAULT_MIN_SOURCES: usize = 2;
pub const DEFAULT_TOP_COUNT: usize = 10;
pub const DEFAULT_MIN_SCORE: u8 = 50;

/// Keep trends whose momentum is at least `min`.
pub fn filter_by_momentum(trends: &[AggregatedTrend], min: Momentum) -> Vec<AggregatedTrend> {
    trends
        .iter()
        .filter(|t| t.momentum >= min)
        .cloned()
        .collect()
}

/// Keep trends reported by at least `min_sources` distinct sources.
pub fn filter_multi_source(trends: &[AggregatedTrend], min_sources: usize) -> Vec<AggregatedTrend> {
    trends
        .iter()
        .filter(|t| t.source_count >= min_sources)
        .cloned()
        .collect()
}

/// Keep global trends (no region recorded) and trends seen in `region`.
pub fn filter_by_region(trends: &[AggregatedTrend], region: &str) -> Vec<AggregatedTrend> {
    trends
        .iter()
        .filter(|t| t.regions.is_empty() || t.regions.iter().any(|r| r == region))
        .cloned()
        .collect()
}

/// Highest scoring `count` trends; equal scores keep their input order.
pub fn top_trends(trends: &[AggregatedTrend], count: usize) -> Vec<AggregatedTrend> {
    let mut sorted = trends.to_vec();
    sorted.sort_by(|a, b| b.combined_score.cmp(&a.combined_score));
    sorted.truncate(count);
    sorted
}

pub fn exploding_trends(trends: &[AggregatedTrend]) -> Vec<AggregatedTrend> {
    filter_by_momentum(trends, Momentum::Exploding)
}

/// Trends that clear both a score floor and a source-count floor.
pub fn high_confidence_trends(
    trends: &[AggregatedTrend],
    min_score: u8,
    min_sources: usize,
) -> Vec<AggregatedTrend> {
    trends
        .iter()
        .filter(|t| t.combined_score >= min_score && t.source_count >= min_sources)
        .cloned()
        .collect()
}

/// A composed query over an aggregation result. Unset criteria are skipped;
/// `top` is applied last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendQuery {
    pub min_momentum: Option<Momentum>,
    pub min_sources: Option<usize>,
    pub min_score: Option<u8>,
    pub region: Option<String>,
    pub top: Option<usize>,
}

impl TrendQuery {
    pub fn apply(&self, trends: &[AggregatedTrend]) -> Vec<AggregatedTrend> {
        let mut out = trends.to_vec();
        if let Some(min) = self.min_momentum {
            out = filter_by_momentum(&out, min);
        }
        if let Some(min) = self.min_sources {
            out = filter_multi_source(&out, min);
        }
        if let Some(min) = self.min_score {
            out.retain(|t| t.combined_score >= min);
        }
        if let Some(region) = &self.region {
            out = filter_by_region(&out, region);
        }
        if let Some(count) = self.top {
            out = top_trends(&out, count);
        }
        out
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
