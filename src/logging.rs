//! stderr logging for the `trends` binary and its MCP mode.
//!
//! Stdout carries JSON results (or JSON-RPC in MCP mode), so every log line
//! goes to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "TRENDS_LOG";

/// Map a `-v` count to a default level.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Filter precedence: `$TRENDS_LOG`,
/// `$RUST_LOG`, then `nu_plugin_trends=<level>` from the verbosity count.
/// Calling it twice is harmless.
pub fn init(verbose: u8) {
    let level = level_for_verbosity(verbose);
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("nu_plugin_trends={level},trends={level}")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }
}
