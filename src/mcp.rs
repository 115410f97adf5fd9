//! MCP (Model Context Protocol) server for trends.
//!
//! Exposes aggregation, querying and the topic helpers as MCP tools so that
//! AI assistants can invoke them over stdio JSON-RPC.
//!
//! Start with: `trends --mcp`

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRouter},
    handler::server::wrapper::Parameters,
    model::*,
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::algo::filters::{DEFAULT_MIN_SCORE, DEFAULT_MIN_SOURCES};
use crate::algo::types::Momentum;
use crate::config::TrendsConfig;
use crate::error::TrendError;
use crate::ops;

// ── Parameter structs ───────────────────────────────────────────────────────
// Each struct maps 1:1 with a CLI subcommand. Omitted options fall back to
// the server's loaded configuration.

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AggregateParams {
    /// JSON array of raw mentions: {topic, source, volume?, timestamp?, url?, region?}.
    pub records: Vec<serde_json::Value>,
    /// Similarity needed to join an existing cluster, 0-1 (default: 0.6).
    pub threshold: Option<f64>,
    /// Maximum number of trends returned (default: 100).
    pub max: Option<usize>,
    /// Metric: "topic", "levenshtein", "jaro-winkler", "cosine" (default: "topic").
    pub metric: Option<String>,
    /// Strip tracking parameters so URL variants count once.
    #[serde(default)]
    pub canonical_urls: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// An aggregation result or a JSON array of aggregated trends.
    pub trends: serde_json::Value,
    /// Lowest momentum kept: "falling", "stable", "rising", "exploding".
    pub min_momentum: Option<String>,
    /// Minimum number of distinct sources.
    pub min_sources: Option<usize>,
    /// Minimum combined score, 0-100.
    pub min_score: Option<u8>,
    /// Keep trends seen in this region plus trends with no region.
    pub region: Option<String>,
    /// Keep the N highest scoring trends.
    pub top: Option<usize>,
    /// Only exploding trends.
    #[serde(default)]
    pub exploding: bool,
    /// Score >= 50 from at least 2 sources unless overridden.
    #[serde(default)]
    pub high_confidence: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SimilarityParams {
    /// First topic.
    pub a: String,
    /// Second topic.
    pub b: String,
    /// Metric: "topic", "levenshtein", "jaro-winkler", "cosine".
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Compute all metrics at once.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NormalizeParams {
    /// Topic to normalize.
    pub topic: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MomentumParams {
    /// Volume history: JSON array of {timestamp, volume}.
    pub samples: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NormalizeUrlParams {
    /// URL to normalize.
    pub url: String,
}

fn default_metric() -> String {
    "topic".into()
}

// ── Shared helpers ──────────────────────────────────────────────────────────

fn json_text(v: &serde_json::Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn invalid(e: TrendError) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

fn join_error(e: tokio::task::JoinError) -> McpError {
    McpError::internal_error(format!("task join error: {e}"), None)
}

fn success(result: &serde_json::Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(json_text(result))])
}

// ── MCP Server ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TrendsMcp {
    config: Arc<TrendsConfig>,
    #[allow(dead_code)] // accessed at runtime by the #[tool_router] macro
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TrendsMcp {
    pub fn new(config: TrendsConfig) -> Self {
        Self {
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    // ── aggregate ───────────────────────────────────────────────────────

    #[tool(
        name = "aggregate",
        description = "Cluster raw trend mentions from many sources into ranked trends. Topics are normalized and merged when similar enough; each trend gets merged sources, volume history, momentum (falling/stable/rising/exploding) and a 0-100 combined score. Returns {trends, source_breakdown, total_raw, unique_count, aggregated_at}."
    )]
    async fn aggregate(
        &self,
        params: Parameters<AggregateParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let mut opts = self.config.aggregate.clone();
        if let Some(t) = p.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(McpError::invalid_params(
                    format!("threshold must be between 0 and 1, got {t}"),
                    None,
                ));
            }
            opts.similarity_threshold = t;
        }
        if let Some(n) = p.max {
            opts.max_trends = n;
        }
        if let Some(name) = p.metric.as_deref() {
            opts.metric = ops::parse_metric(name).map_err(invalid)?;
        }
        opts.canonicalize_urls |= p.canonical_urls;

        let result = tokio::task::spawn_blocking(move || ops::op_aggregate(&p.records, &opts))
            .await
            .map_err(join_error)?
            .map_err(invalid)?;
        Ok(success(&result))
    }

    // ── query ───────────────────────────────────────────────────────────

    #[tool(
        name = "query",
        description = "Filter aggregated trends. Accepts the output of `aggregate` (or its trends array). Filters compose: min_momentum, min_sources, min_score, region (plus region-less trends), then top N by score. `exploding` and `high_confidence` are shortcuts."
    )]
    async fn query(&self, params: Parameters<QueryParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let mut query = self.config.query.clone();
        if let Some(name) = p.min_momentum.as_deref() {
            query.min_momentum = Some(ops::parse_momentum(name).map_err(invalid)?);
        }
        if p.exploding {
            query.min_momentum = Some(Momentum::Exploding);
        }
        if p.high_confidence {
            query.min_score.get_or_insert(DEFAULT_MIN_SCORE);
            query.min_sources.get_or_insert(DEFAULT_MIN_SOURCES);
        }
        query.min_sources = p.min_sources.or(query.min_sources);
        query.min_score = p.min_score.or(query.min_score);
        query.region = p.region.or(query.region);
        query.top = p.top.or(query.top);

        let result = tokio::task::spawn_blocking(move || ops::op_query(&p.trends, &query))
            .await
            .map_err(join_error)?
            .map_err(invalid)?;
        Ok(success(&result))
    }

    // ── similarity ──────────────────────────────────────────────────────

    #[tool(
        name = "similarity",
        description = "Similarity between two topics in [0, 1]. The default `topic` metric normalizes both (lowercase, strip punctuation) and returns 1.0 for equal topics, length ratio when one contains the other, else word-set Jaccard. Also: levenshtein, jaro-winkler, cosine. Set `all: true` for every metric."
    )]
    async fn similarity(
        &self,
        params: Parameters<SimilarityParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = ops::op_similarity(&p.a, &p.b, &p.metric, p.all).map_err(invalid)?;
        Ok(success(&result))
    }

    // ── normalize ───────────────────────────────────────────────────────

    #[tool(
        name = "normalize",
        description = "Normalize a topic the way aggregation compares it (lowercase, punctuation removed, whitespace collapsed) and list its keywords."
    )]
    async fn normalize(
        &self,
        params: Parameters<NormalizeParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(success(&ops::op_normalize(&params.0.topic)))
    }

    // ── momentum ────────────────────────────────────────────────────────

    #[tool(
        name = "momentum",
        description = "Classify a volume history ({timestamp, volume} samples). Compares the mean of the newer half to the older half: ratio > 2 exploding, > 1.2 rising, < 0.5 falling, else stable. Fewer than 2 samples is stable."
    )]
    async fn momentum(
        &self,
        params: Parameters<MomentumParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = ops::op_momentum(&params.0.samples).map_err(invalid)?;
        Ok(success(&result))
    }

    // ── normalize_url ───────────────────────────────────────────────────

    #[tool(
        name = "normalize_url",
        description = "Canonicalize a URL for deduplication: lowercase host, strip www., drop fragments and tracking parameters (utm_*, fbclid, gclid, ...), sort the remaining query parameters."
    )]
    async fn normalize_url(
        &self,
        params: Parameters<NormalizeUrlParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = ops::op_normalize_url(&params.0.url).map_err(invalid)?;
        Ok(success(&result))
    }
}

// ── ServerHandler glue ──────────────────────────────────────────────────────

impl ServerHandler for TrendsMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Trend aggregation engine. Tools: aggregate, query, similarity, normalize, \
                 momentum, normalize_url. Pass raw mentions to `aggregate`, then feed its \
                 output to `query` to filter by momentum, sources, score or region."
                    .into(),
            ),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "trends".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Trends Engine".into()),
                description: Some(
                    "Trend aggregation, deduplication, and momentum scoring engine".into(),
                ),
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: Default::default(),
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let tool_context = ToolCallContext::new(self, request, context);
        async move { self.tool_router.call(tool_context).await }
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tool_router.get(name).cloned()
    }
}

// ── Entry point ─────────────────────────────────────────────────────────────

/// Start the MCP server on stdio. Called from `cli.rs` when `--mcp` is passed.
/// Configuration comes from `$TRENDS_CONFIG` or the XDG config file.
pub async fn serve_stdio() -> Result<(), Box<dyn std::error::Error>> {
    let config = TrendsConfig::load(None)?;
    info!("starting MCP server on stdio");
    let server = TrendsMcp::new(config);
    let transport = rmcp::transport::io::stdio();
    let service = server.serve(transport).await.inspect_err(|e| {
        eprintln!("MCP serve error: {e}");
    })?;
    service.waiting().await?;
    Ok(())
}
