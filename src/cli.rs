use clap::{Parser, Subcommand};
use nu_plugin_trends::algo::filters::{DEFAULT_MIN_SCORE, DEFAULT_MIN_SOURCES};
use nu_plugin_trends::algo::types::Momentum;
use nu_plugin_trends::config::TrendsConfig;
use nu_plugin_trends::error::{Result, TrendError};
use nu_plugin_trends::{logging, ops};
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "trends",
    version,
    about = "Trend aggregation, deduplication, and momentum scoring engine"
)]
struct Cli {
    /// Start as an MCP (Model Context Protocol) server on stdio.
    /// AI assistants (Claude Desktop, Cursor, etc.) connect via JSON-RPC.
    #[cfg(feature = "mcp")]
    #[arg(long, exclusive = true)]
    mcp: bool,

    /// Path to a TOML config file (default: $TRENDS_CONFIG, then
    /// $XDG_CONFIG_HOME/trends/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster raw trend mentions (JSON array on stdin) into ranked trends
    Aggregate {
        /// Similarity needed to join an existing cluster, 0-1
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Maximum number of trends returned
        #[arg(short = 'n', long)]
        max: Option<usize>,
        /// Metric: topic, levenshtein, jaro-winkler, cosine
        #[arg(short, long)]
        metric: Option<String>,
        /// Strip tracking parameters so URL variants count once
        #[arg(long)]
        canonical_urls: bool,
    },
    /// Filter an aggregation result (or a list of trends) read from stdin
    Query {
        /// Lowest momentum kept: falling, stable, rising, exploding
        #[arg(long)]
        min_momentum: Option<String>,
        /// Minimum number of distinct sources
        #[arg(long)]
        min_sources: Option<usize>,
        /// Minimum combined score
        #[arg(long)]
        min_score: Option<u8>,
        /// Keep trends seen in this region plus global ones
        #[arg(short, long)]
        region: Option<String>,
        /// Keep the N highest scoring trends
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Only exploding trends
        #[arg(short, long)]
        exploding: bool,
        /// Score >= 50 from at least 2 sources (unless overridden)
        #[arg(long)]
        high_confidence: bool,
    },
    /// Compute similarity between two topics
    Similarity {
        /// First topic
        a: String,
        /// Second topic
        b: String,
        /// Metric: topic, levenshtein, jaro-winkler, cosine
        #[arg(short, long, default_value = "topic")]
        metric: String,
        /// Compute all metrics at once
        #[arg(short, long)]
        all: bool,
    },
    /// Show the normalized form and keywords of a topic
    Normalize {
        /// Topic to normalize
        topic: String,
    },
    /// Classify a volume history ([{timestamp, volume}] on stdin)
    Momentum,
    /// Normalize a URL the way trends store them with --canonical-urls
    #[command(name = "normalize-url")]
    NormalizeUrl {
        /// URL to normalize
        url: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // ── MCP server mode ─────────────────────────────────────────────────
    #[cfg(feature = "mcp")]
    if cli.mcp {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("failed to create tokio runtime: {e}");
                std::process::exit(1);
            }
        };
        rt.block_on(async {
            if let Err(e) = nu_plugin_trends::mcp::serve_stdio().await {
                eprintln!("MCP server error: {e}");
                std::process::exit(1);
            }
        });
        return;
    }

    // ── Normal subcommand dispatch ──────────────────────────────────────
    let Some(command) = cli.command else {
        eprintln!("No subcommand provided. Run `trends --help` for usage.");
        std::process::exit(1);
    };

    if let Err(e) = run(command, cli.config.as_deref()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config_path: Option<&std::path::Path>) -> Result<()> {
    match command {
        Commands::Aggregate {
            threshold,
            max,
            metric,
            canonical_urls,
        } => {
            let config = TrendsConfig::load(config_path)?;
            let mut opts = config.aggregate;
            if let Some(t) = threshold {
                if !(0.0..=1.0).contains(&t) {
                    return Err(TrendError::InvalidInput(format!(
                        "--threshold must be between 0 and 1, got {t}"
                    )));
                }
                opts.similarity_threshold = t;
            }
            if let Some(n) = max {
                opts.max_trends = n;
            }
            if let Some(name) = metric {
                opts.metric = ops::parse_metric(&name)?;
            }
            opts.canonicalize_urls |= canonical_urls;
            debug!(?opts, "aggregate options");

            let rows = read_stdin_rows()?;
            print_json(&ops::op_aggregate(&rows, &opts)?)
        }
        Commands::Query {
            min_momentum,
            min_sources,
            min_score,
            region,
            top,
            exploding,
            high_confidence,
        } => {
            let config = TrendsConfig::load(config_path)?;
            let mut query = config.query;
            if let Some(name) = min_momentum {
                query.min_momentum = Some(ops::parse_momentum(&name)?);
            }
            if exploding {
                query.min_momentum = Some(Momentum::Exploding);
            }
            if high_confidence {
                query.min_score.get_or_insert(DEFAULT_MIN_SCORE);
                query.min_sources.get_or_insert(DEFAULT_MIN_SOURCES);
            }
            query.min_sources = min_sources.or(query.min_sources);
            query.min_score = min_score.or(query.min_score);
            query.region = region.or(query.region);
            query.top = top.or(query.top);
            debug!(?query, "query");

            let input = read_stdin_json()?;
            print_json(&ops::op_query(&input, &query)?)
        }
        Commands::Similarity { a, b, metric, all } => {
            print_json(&ops::op_similarity(&a, &b, &metric, all)?)
        }
        Commands::Normalize { topic } => print_json(&ops::op_normalize(&topic)),
        Commands::Momentum => {
            let rows = read_stdin_rows()?;
            print_json(&ops::op_momentum(&rows)?)
        }
        Commands::NormalizeUrl { url } => print_json(&ops::op_normalize_url(&url)?),
    }
}

fn read_stdin_json() -> Result<Value> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&buf)?)
}

fn read_stdin_rows() -> Result<Vec<Value>> {
    Ok(match read_stdin_json()? {
        Value::Array(arr) => arr,
        Value::Null => vec![],
        single => vec![single],
    })
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
