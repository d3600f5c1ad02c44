//! Logging setup for the chunkwise CLI.
//!
//! Built on `tracing`. `--verbose` turns on debug output for the chunkwise
//! crates, `--quiet` keeps only errors, and otherwise `RUST_LOG` decides with
//! `info` as the fallback.
//!
//! # Example
//!
//! ```rust,no_run
//! use chunkwise_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("starting dev proxy");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "chunkwise=debug,chunkwise_core=debug,chunkwise_config=debug,chunkwise_cli=debug,tower_http=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "chunkwise=info,chunkwise_core=info,chunkwise_config=info,chunkwise_cli=info";

/// Install the global tracing subscriber.
///
/// Call once, before anything logs. `verbose` wins over `quiet`; clap already
/// rejects the combination.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global tracing subscriber with an explicit filter.
///
/// ```rust,no_run
/// use chunkwise_cli::logger::init_logger_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// init_logger_with_filter(EnvFilter::new("chunkwise_cli=trace,hyper=off"), true);
/// ```
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
