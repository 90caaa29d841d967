//! Logging initialisation.
//!
//! Diagnostics go to stderr through `tracing`, filtered by `BLIP_LOG`
//! (`EnvFilter` syntax). Without it the level is `warn`, or `debug` when
//! `--verbose` is passed.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BLIP_LOG";

/// Filter used when `BLIP_LOG` is unset or invalid.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "blip_cli=debug,warn" } else { "warn" }
}

/// Initialise the global tracing subscriber. Call once from `main`.
pub fn init(verbose: bool, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // Keeps the first subscriber if one is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(verbose),
        )
        .try_init();
}
