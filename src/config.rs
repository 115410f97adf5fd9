//! TOML configuration for the `trends` front ends.
//!
//! ```toml
//! [aggregate]
//! similarity_threshold = 0.6
//! max_trends = 100
//! metric = "topic"          # topic | levenshtein | jaro-winkler | cosine
//! canonicalize_urls = false
//!
//! [query]
//! min_momentum = "rising"
//! min_sources = 2
//! region = "US"
//! top = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algo::aggregate::AggregateOptions;
use crate::algo::filters::TrendQuery;
use crate::error::{Result, TrendError};

pub const CONFIG_ENV: &str = "TRENDS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendsConfig {
    pub aggregate: AggregateOptions,
    /// Defaults for `query`; command-line flags take precedence.
    pub query: TrendQuery,
}

impl TrendsConfig {
    /// Parse and validate a TOML document. `origin` names it in errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| TrendError::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| TrendError::Config {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&text, &origin)
    }

    /// Resolve configuration in this order:
    ///
    /// 1. `explicit` path (`--config`)
    /// 2. `$TRENDS_CONFIG`
    /// 3. `$XDG_CONFIG_HOME/trends/config.toml` or `~/.config/trends/config.toml`
    /// 4. built-in defaults
    ///
    /// Paths named explicitly (1, 2) must exist; the XDG file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config from --config");
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            debug!(%path, "loading config from TRENDS_CONFIG");
            return Self::from_file(Path::new(&path));
        }
        if let Some(path) = xdg_config_path().filter(|p| p.exists()) {
            debug!(path = %path.display(), "loading config from XDG config dir");
            return Self::from_file(&path);
        }
        Ok(Self::default())
    }

    fn validate(&self, origin: &str) -> Result<()> {
        let threshold = self.aggregate.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(TrendError::Config {
                path: origin.to_string(),
                message: format!("similarity_threshold must be within [0, 1], got {threshold}"),
            });
        }
        Ok(())
    }
}

fn xdg_config_path() -> Option<PathBuf> {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(config_home.join("trends/config.toml"))
}
