//! Logging bootstrap for the diagnosis pipeline.
//!
//! Logs go to stderr so stdout stays free for `config show` output and the
//! batch summary. The pipeline spends most of its life inside reqwest calls,
//! so the default filter quiets hyper/reqwest internals down to warnings;
//! `RUST_LOG` overrides everything when set.

use leafscan_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing from config, with CLI overrides.
///
/// `--verbose` wins over `logging.level`, `--json-logs` over
/// `logging.format`. Must be called once, before the first pipeline step.
pub fn init(config: &Config, verbose: bool, json_logs: bool) {
    let level = if verbose { "debug" } else { &config.logging.level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs || config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
