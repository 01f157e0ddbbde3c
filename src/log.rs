//! Structured logging for tandem using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--debug` flag or `TANDEM_DEBUG=1` selects DEBUG
//! 2. `TANDEM_LOG` environment variable (e.g. "info", "trace")
//! 3. default to INFO
//!
//! Logs go to stderr so JSON output on stdout stays machine-readable.
//! Logging is diagnostics only; audit records are returned as values
//! by the engine operations.

use tracing::Level;

/// Initialize logging at the default level.
pub fn init() {
    init_with_debug(false);
}

/// Initialize logging with explicit debug mode setting.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_debug(debug: bool) {
    let level = resolve_level(
        debug,
        std::env::var("TANDEM_DEBUG").ok().as_deref(),
        std::env::var("TANDEM_LOG").ok().as_deref(),
    );

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_level(debug: bool, debug_env: Option<&str>, level_env: Option<&str>) -> Level {
    let env_debug = debug_env
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if debug || env_debug {
        return Level::DEBUG;
    }
    level_env.and_then(parse_level_str).unwrap_or(Level::INFO)
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
