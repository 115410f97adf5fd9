//! Errors raised at the parsing boundary. The `algo` layer itself is total.

use thiserror::Error;

use crate::algo::string_distance::Metric;
use crate::algo::types::Momentum;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown metric '{0}'. Use: {names}", names = Metric::all_names().join(", "))]
    UnknownMetric(String),

    #[error("unknown momentum '{0}'. Use: {names}", names = Momentum::all_names().join(", "))]
    UnknownMomentum(String),

    #[error("could not parse URL: {0}")]
    InvalidUrl(String),

    #[error("config error in {path}: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = TrendError> = std::result::Result<T, E>;
