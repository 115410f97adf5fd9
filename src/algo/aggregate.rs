//! First-fit clustering of raw trend mentions into scored, ranked trends.
//!
//! Each record is compared against the existing clusters in creation order
//! and merged into the first one whose representative topic is similar
//! enough. Clustering is therefore order dependent; callers that need
//! consistent ranks must re-run aggregation over the full raw set.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use tracing::{debug, trace};

use super::momentum::classify_momentum;
use super::normalize::normalize;
use super::score::{average_volume, combined_score};
use super::string_distance::{similarity_normalized, Metric};
use super::tokenizer;
use super::types::{AggregatedTrend, AggregationResult, RawTrendInput, VolumeSample};
use super::url_normalize;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MAX_TRENDS: usize = 100;

/// Tuning knobs for one aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Minimum similarity for a record to join an existing cluster.
    pub similarity_threshold: f64,
    /// Number of trends kept after ranking.
    pub max_trends: usize,
    pub metric: Metric,
    /// Store URLs in normalized form so tracking variants count once.
    pub canonicalize_urls: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_trends: DEFAULT_MAX_TRENDS,
            metric: Metric::Topic,
            canonicalize_urls: false,
        }
    }
}

/// Cluster state while records are still being folded in.
struct Cluster {
    topic: String,
    normalized_topic: String,
    sources: Vec<String>,
    first_seen: i64,
    last_seen: i64,
    volume_history: Vec<VolumeSample>,
    regions: Vec<String>,
    urls: Vec<String>,
}

impl Cluster {
    fn seed(record: &RawTrendInput, normalized_topic: String, ts: i64, canonical_urls: bool) -> Self {
        let mut cluster = Self {
            topic: record.topic.clone(),
            normalized_topic,
            sources: Vec::new(),
            first_seen: ts,
            last_seen: ts,
            volume_history: Vec::new(),
            regions: Vec::new(),
            urls: Vec::new(),
        };
        cluster.absorb(record, ts, canonical_urls);
        cluster
    }

    fn absorb(&mut self, record: &RawTrendInput, ts: i64, canonical_urls: bool) {
        push_unique(&mut self.sources, &record.source);
        if let Some(volume) = record.volume {
            self.volume_history.push(VolumeSample {
                timestamp: ts,
                volume,
            });
        }
        if let Some(region) = &record.region {
            push_unique(&mut self.regions, region);
        }
        if let Some(url) = &record.url {
            push_unique(&mut self.urls, &url_normalize::stored_form(url, canonical_urls));
        }
        self.last_seen = self.last_seen.max(ts);
    }

    fn finish(self, index: usize) -> AggregatedTrend {
        let momentum = classify_momentum(&self.volume_history);
        let combined_score = combined_score(
            self.sources.len(),
            average_volume(&self.volume_history),
            momentum,
        );
        AggregatedTrend {
            id: trend_id(&self.normalized_topic, index),
            keywords: tokenizer::keywords(&self.topic),
            topic: self.topic,
            normalized_topic: self.normalized_topic,
            source_count: self.sources.len(),
            sources: self.sources,
            combined_score,
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            momentum,
            volume_history: self.volume_history,
            regions: self.regions,
            urls: self.urls,
            rank: 0,
        }
    }
}

fn push_unique(set: &mut Vec<String>, value: &str) {
    if !set.iter().any(|v| v == value) {
        set.push(value.to_string());
    }
}

/// Deterministic id from the cluster's normalized topic and creation index.
pub fn trend_id(normalized_topic: &str, index: usize) -> String {
    let mut hasher = SipHasher13::new();
    normalized_topic.hash(&mut hasher);
    index.hash(&mut hasher);
    format!("trend-{:016x}", hasher.finish())
}

/// Current wall clock in unix milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Aggregate raw mentions, stamping missing timestamps with the current time.
pub fn aggregate(raw: &[RawTrendInput], opts: &AggregateOptions) -> AggregationResult {
    aggregate_at(raw, opts, now_millis())
}

/// Aggregate raw mentions with an explicit clock (`now`, unix ms) used for
/// records without a timestamp and for `aggregated_at`.
pub fn aggregate_at(raw: &[RawTrendInput], opts: &AggregateOptions, now: i64) -> AggregationResult {
    if raw.is_empty() {
        return AggregationResult::empty(now);
    }

    let normalized: Vec<String> = raw.par_iter().map(|r| normalize(&r.topic)).collect();

    let mut source_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut skipped = 0usize;

    for (record, norm) in raw.iter().zip(normalized) {
        *source_breakdown.entry(record.source.clone()).or_insert(0) += 1;

        if norm.is_empty() {
            skipped += 1;
            trace!(topic = %record.topic, source = %record.source, "topic normalizes to nothing, not clustered");
            continue;
        }

        let ts = record.timestamp.unwrap_or(now);
        let matched = clusters.iter().position(|c| {
            similarity_normalized(&norm, &c.normalized_topic, opts.metric)
                >= opts.similarity_threshold
        });

        match matched {
            Some(i) => {
                trace!(topic = %record.topic, cluster = %clusters[i].topic, "merged");
                clusters[i].absorb(record, ts, opts.canonicalize_urls);
            }
            None => clusters.push(Cluster::seed(record, norm, ts, opts.canonicalize_urls)),
        }
    }

    let cluster_count = clusters.len();
    let mut trends: Vec<AggregatedTrend> = clusters
        .into_par_iter()
        .enumerate()
        .map(|(i, c)| c.finish(i))
        .collect();

    // Stable: equal scores keep cluster creation order.
    trends.sort_by(|a, b| b.combined_score.cmp(&a.combined_score));
    for (i, trend) in trends.iter_mut().enumerate() {
        trend.rank = i + 1;
    }
    trends.truncate(opts.max_trends);

    debug!(
        total_raw = raw.len(),
        clusters = cluster_count,
        skipped,
        returned = trends.len(),
        threshold = opts.similarity_threshold,
        metric = opts.metric.as_str(),
        "aggregated trends"
    );

    AggregationResult {
        unique_count: trends.len(),
        trends,
        source_breakdown,
        total_raw: raw.len(),
        aggregated_at: now,
    }
}
