//! Structured logging setup.
//!
//! Diagnostics from the graph core go through `tracing`; user-facing progress
//! keeps using the `ProgressReporter` port. Both write to stderr so stdout
//! stays reserved for the rendered reference listing.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `--verbose` is given.
const DEFAULT_DIRECTIVE: &str = "graph_refs=warn";

/// Filter used for `--verbose`.
const VERBOSE_DIRECTIVE: &str = "graph_refs=debug";

/// Builds the env filter: `RUST_LOG` wins, otherwise verbosity decides.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_DIRECTIVE
        } else {
            DEFAULT_DIRECTIVE
        })
    })
}

/// Installs the global subscriber. Calling it twice is harmless; the second
/// call keeps the first subscriber.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
