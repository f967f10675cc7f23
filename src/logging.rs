/// Log setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Installs a compact console subscriber. `RUST_LOG` overrides the
/// default `info` level. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
