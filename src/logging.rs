//! Tracing setup for the `gdgen` binary.
//!
//! Warnings (skipped entities, unknown option groups) are always shown.
//! `--debug` adds pipeline progress. `GDGEN_LOG` or `RUST_LOG` replace the
//! filter entirely, e.g. `GDGEN_LOG=gdscript_gen::transpiler=trace`.
//!
//! Everything goes to stderr so generated scripts can be piped from stdout.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GDGEN_LOG";

fn build_filter(debug: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        return EnvFilter::builder().parse_lossy(directives);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(if debug { "debug" } else { "warn" })
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_tracing(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time()
        .try_init();
}
